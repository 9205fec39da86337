use std::sync::LazyLock;

use drivelink_core::{ConversionResult, MediaType, validate_url};
use regex::Regex;
use tracing::{debug, trace};

const DOWNLOAD_BASE: &str = "https://drive.google.com/uc?export=download&id=";

#[allow(clippy::expect_used)]
static FILE_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/d/([A-Za-z0-9_-]+)").expect("file id regex is valid") // Static pattern, safe to panic
});

/// Returns the first Drive file identifier found after a `/d/` segment.
pub fn extract_file_id(input: &str) -> Option<&str> {
    let captures = FILE_ID_PATTERN.captures(input)?;
    captures.get(1).map(|m| m.as_str())
}

pub fn download_url(file_id: &str, media_type: MediaType) -> String {
    format!("{DOWNLOAD_BASE}{file_id}&media_type={}", media_type.as_str())
}

/// Rewrites a Drive sharing link into a direct download link.
///
/// Anything without a `/d/<id>` segment, including empty input, yields an
/// empty string.
pub fn convert(input: &str, media_type: MediaType) -> String {
    if input.is_empty() {
        return String::new();
    }
    match extract_file_id(input) {
        Some(file_id) => {
            trace!(file_id, media_type = %media_type, "file id matched");
            download_url(file_id, media_type)
        }
        None => {
            debug!(input_len = input.len(), "no file id in input");
            String::new()
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DriveConverter;

impl DriveConverter {
    pub fn convert(&self, input: &str, media_type: MediaType) -> String {
        convert(input, media_type)
    }

    pub fn convert_detailed(&self, input: &str, media_type: MediaType) -> ConversionResult {
        let output = convert(input, media_type);
        let file_id = extract_file_id(input)
            .filter(|_| !output.is_empty())
            .map(str::to_string);

        let warning = if output.is_empty() {
            Some("no Google Drive file id found".to_string())
        } else if !looks_like_drive_url(input) {
            Some("input does not look like a Google Drive link".to_string())
        } else {
            None
        };

        ConversionResult {
            source: input.to_string(),
            file_id,
            media_type,
            download_url: (!output.is_empty()).then_some(output),
            warning,
        }
    }
}

fn looks_like_drive_url(input: &str) -> bool {
    let Ok(url) = validate_url(input.trim()) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    url.host_str()
        .is_some_and(|host| host == "google.com" || host.ends_with(".google.com"))
}
