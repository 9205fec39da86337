use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DriveLinkError;

/// Content hint appended to a download link as `media_type=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MediaType {
    #[default]
    #[serde(rename = "png")]
    Image,
    #[serde(rename = "mp4")]
    Video,
}

impl MediaType {
    pub const ALL: [MediaType; 2] = [MediaType::Image, MediaType::Video];

    /// Query-string token for this media type.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "png",
            MediaType::Video => "mp4",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MediaType::Image => "Image (PNG)",
            MediaType::Video => "Video (MP4)",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            MediaType::Image => MediaType::Video,
            MediaType::Video => MediaType::Image,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = DriveLinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "png" | "image" => Ok(MediaType::Image),
            "mp4" | "video" => Ok(MediaType::Video),
            other => Err(DriveLinkError::InvalidInput(format!(
                "unknown media type: {other} (expected png or mp4)"
            ))),
        }
    }
}
