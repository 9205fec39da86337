use serde::{Deserialize, Serialize};

use crate::MediaType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub source: String,
    pub file_id: Option<String>,
    pub media_type: MediaType,
    pub download_url: Option<String>,
    pub warning: Option<String>,
}

impl ConversionResult {
    /// The download link, or an empty string when nothing was found.
    pub fn output(&self) -> &str {
        self.download_url.as_deref().unwrap_or("")
    }
}
