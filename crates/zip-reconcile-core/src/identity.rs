//! Username extraction for the two archive naming conventions.
//!
//! The strategy is chosen by archive origin, never by looking at the name
//! itself. Both strategies return a trimmed, case-preserved username or
//! `None` when the name does not follow the convention.

use crate::model::Origin;

/// Apply the naming strategy of `origin` to `name`.
///
/// For [`Origin::A`] `name` is a file's base name, for [`Origin::B`] it is
/// the name of an enclosing folder.
pub fn username_for(origin: Origin, name: &str) -> Option<String> {
    match origin {
        Origin::A => username_from_pdf_name(name),
        Origin::B => username_from_folder_name(name),
    }
}

/// `USERNAME_CODE.pdf` -> `USERNAME`. The extension check is case-insensitive.
pub fn username_from_pdf_name(file_name: &str) -> Option<String> {
    let (stem, extension) = file_name.rsplit_once('.')?;
    if !extension.eq_ignore_ascii_case("pdf") {
        return None;
    }
    let (username, _code) = stem.split_once('_')?;
    normalize(username)
}

/// `USERNAME(NUMBER) DISPLAY NAME` -> `USERNAME`.
pub fn username_from_folder_name(folder_name: &str) -> Option<String> {
    let (username, _rest) = folder_name.split_once('(')?;
    normalize(username)
}

fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_name_basic() {
        assert_eq!(
            username_from_pdf_name("DAB7341_PLM-3001.pdf"),
            Some("DAB7341".to_string())
        );
    }

    #[test]
    fn test_pdf_name_splits_on_first_underscore() {
        assert_eq!(
            username_from_pdf_name("alice_001_final.pdf"),
            Some("alice".to_string())
        );
    }

    #[test]
    fn test_pdf_name_extension_is_case_insensitive() {
        assert_eq!(username_from_pdf_name("bob_002.PDF"), Some("bob".to_string()));
        assert_eq!(username_from_pdf_name("bob_002.Pdf"), Some("bob".to_string()));
    }

    #[test]
    fn test_pdf_name_rejects_missing_underscore_or_extension() {
        assert_eq!(username_from_pdf_name("alice.pdf"), None);
        assert_eq!(username_from_pdf_name("charlie_noext"), None);
        assert_eq!(username_from_pdf_name("alice_001.docx"), None);
        assert_eq!(username_from_pdf_name("_001.pdf"), None);
    }

    #[test]
    fn test_pdf_name_preserves_case_and_trims() {
        assert_eq!(
            username_from_pdf_name(" MixedCase _x.pdf"),
            Some("MixedCase".to_string())
        );
    }

    #[test]
    fn test_folder_name_basic() {
        assert_eq!(
            username_from_folder_name("DAB7341(47564) ANJUM SIRAJ"),
            Some("DAB7341".to_string())
        );
        assert_eq!(
            username_from_folder_name("alice (12) Alice Smith"),
            Some("alice".to_string())
        );
    }

    #[test]
    fn test_folder_name_without_paren_fails() {
        assert_eq!(username_from_folder_name("DAB7341 ANJUM SIRAJ"), None);
        assert_eq!(username_from_folder_name("(12) Nobody"), None);
        assert_eq!(username_from_folder_name("root"), None);
    }

    #[test]
    fn test_username_for_selects_by_origin() {
        // An A-style name handed to the B strategy must not match, and vice versa.
        assert_eq!(username_for(Origin::A, "alice_001.pdf"), Some("alice".to_string()));
        assert_eq!(username_for(Origin::B, "alice_001.pdf"), None);
        assert_eq!(username_for(Origin::B, "alice(12) Alice"), Some("alice".to_string()));
        assert_eq!(username_for(Origin::A, "alice(12) Alice"), None);
    }
}
