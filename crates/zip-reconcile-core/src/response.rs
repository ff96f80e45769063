//! JSON envelopes handed back to whatever front end calls the engine.

use crate::engine::ReconcileResult;
use crate::error::Error;
use crate::report::Summary;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    /// Merged archive bytes, standard base64.
    pub zip_file: String,
    pub filename: String,
    pub summary: Summary,
}

impl CompareResponse {
    pub fn decode_archive(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(&self.zip_file)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<ReconcileResult> for CompareResponse {
    fn from(result: ReconcileResult) -> Self {
        Self {
            zip_file: base64::engine::general_purpose::STANDARD.encode(&result.archive),
            filename: result.filename,
            summary: result.summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        Self {
            detail: err.to_string(),
        }
    }
}
