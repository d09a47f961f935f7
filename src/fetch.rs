//! Reading the raw document and guarding against upstream drift.

use crate::error::{Error, Result};
use log::{debug, info};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the raw document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    File(PathBuf),
}

impl Source {
    /// `http://` and `https://` locations are fetched, anything else is a file
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Source::Url(location.to_string())
        } else {
            Source::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => f.write_str(url),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Reads the raw bytes of the document.
///
/// # Errors
///
/// Returns [`Error::Fetch`] on any transport failure, non-success HTTP
/// status, or unreadable file.
pub fn fetch(source: &Source) -> Result<Vec<u8>> {
    info!("Fetching schema from {}", source);
    let fetch_error = |message: String| Error::Fetch {
        source_name: source.to_string(),
        message,
    };

    let bytes = match source {
        Source::Url(url) => {
            let client = reqwest::blocking::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()
                .map_err(|e| fetch_error(e.to_string()))?;
            let response = client
                .get(url)
                .send()
                .and_then(|r| r.error_for_status())
                .map_err(|e| fetch_error(e.to_string()))?;
            response
                .bytes()
                .map_err(|e| fetch_error(e.to_string()))?
                .to_vec()
        }
        Source::File(path) => fs::read(path).map_err(|e| fetch_error(e.to_string()))?,
    };

    debug!("Fetched {} bytes", bytes.len());
    Ok(bytes)
}

/// Hex-encoded SHA-256 of `content`
pub fn sha256_hex(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// Refuses content whose digest is not the pinned one.
///
/// Comparison is case-insensitive on the hex text. An absent pin is an
/// error too: the current digest is reported so it can be pinned once the
/// document has been reviewed.
pub fn verify_digest(content: &[u8], expected: Option<&str>) -> Result<String> {
    let actual = sha256_hex(content);
    match expected {
        None => Err(Error::DigestUnpinned { actual }),
        Some(expected) if expected.trim().eq_ignore_ascii_case(&actual) => {
            debug!("Schema digest matches pin {}", actual);
            Ok(actual)
        }
        Some(expected) => Err(Error::DigestMismatch {
            expected: expected.to_string(),
            actual,
        }),
    }
}
