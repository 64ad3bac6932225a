use thiserror::Error;
use url::Url;

/// Why a catalog link was refused before handing it to the browser.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LinkValidationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("URL has no host")]
    MissingHost,
    #[error("URL contains control characters")]
    ControlCharacters,
}

/// Check a link before opening it with the system handler.
///
/// Only `http` and `https` URLs with a host pass. Control characters are
/// rejected outright, since some platform openers go through a shell.
pub fn validate_link_url(url_str: &str) -> Result<Url, LinkValidationError> {
    if url_str.chars().any(char::is_control) {
        return Err(LinkValidationError::ControlCharacters);
    }

    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(LinkValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(LinkValidationError::MissingHost);
    }

    Ok(url)
}
