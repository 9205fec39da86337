use drivelink_core::MediaType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultConfig {
    pub media_type: Option<MediaType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    pub simple: Option<bool>,
    pub copy: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DriveLinkConfig {
    pub default: DefaultConfig,
    pub output: OutputConfig,
}

impl DriveLinkConfig {
    pub const KEYS: [&'static str; 3] = ["default.media_type", "output.simple", "output.copy"];

    pub fn get(&self, key_path: &str) -> Option<String> {
        match key_path {
            "default.media_type" => self.default.media_type.map(|m| m.to_string()),
            "output.simple" => self.output.simple.map(|b| b.to_string()),
            "output.copy" => self.output.copy.map(|b| b.to_string()),
            _ => None,
        }
    }
}
