use crate::error::Error;
use config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;

const DEFAULT_NESTED_ARCHIVE_DEPTH: usize = 5;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Glob patterns matched against member paths; matches are skipped.
    pub ignore_patterns: Vec<String>,
    /// How many levels of ZIP-inside-ZIP are expanded. 0 disables expansion.
    pub nested_archive_depth: usize,
    /// Write every output member under its source folder instead of flat.
    pub preserve_folders: bool,
    /// Deflate output members; `false` stores them uncompressed.
    pub compress_output: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: vec![
                "__MACOSX/*".to_string(),
                "*/.DS_Store".to_string(),
                ".DS_Store".to_string(),
            ],
            nested_archive_depth: DEFAULT_NESTED_ARCHIVE_DEPTH,
            preserve_folders: false,
            compress_output: true,
        }
    }
}

/// Load `Config.toml` (optional) and `ZIP_RECONCILE_*` environment overrides.
pub fn load_configuration() -> Result<AppConfig, Error> {
    let config = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(
            Environment::with_prefix("ZIP_RECONCILE")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("ignore_patterns"),
        )
        .build()?;
    from_config(config)
}

fn from_config(config: Config) -> Result<AppConfig, Error> {
    Ok(config.try_deserialize::<AppConfig>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toml_source(toml: &str) -> Config {
        Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.nested_archive_depth, 5);
        assert!(!config.preserve_folders);
        assert!(config.compress_output);
        assert!(config.ignore_patterns.iter().any(|p| p == "__MACOSX/*"));
    }

    #[test]
    fn test_partial_source_keeps_defaults() {
        let config = from_config(toml_source(
            "preserve_folders = true\nnested_archive_depth = 2",
        ))
        .unwrap();
        assert!(config.preserve_folders);
        assert_eq!(config.nested_archive_depth, 2);
        assert!(config.compress_output);
        assert_eq!(config.ignore_patterns, AppConfig::default().ignore_patterns);
    }

    #[test]
    fn test_bad_value_is_a_config_error() {
        let err = from_config(toml_source("nested_archive_depth = \"deep\"")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
