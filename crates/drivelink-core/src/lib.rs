mod error;
mod media;
mod result;

pub use error::{DriveLinkError, DriveLinkResult};
pub use media::MediaType;
pub use result::ConversionResult;

pub fn validate_url(url: &str) -> DriveLinkResult<url::Url> {
    url::Url::parse(url)
        .map_err(|err| DriveLinkError::InvalidInput(format!("invalid url: {err}")))
}
