// ABOUTME: Error taxonomy for the normalization pipeline.
// ABOUTME: FetchError covers transport failures, ExtractionError covers unusable markup, NormalizeError unifies both.

use thiserror::Error;

/// Errors raised while retrieving a document. Always fatal to that URL's
/// run; retry policy belongs to the scheduling collaborator.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level failure: DNS, connect, TLS, or a broken transfer.
    #[error("unreachable: {0}")]
    Unreachable(String),

    /// The bounded total timeout elapsed.
    #[error("timed out after {0}s")]
    Timeout(u64),

    /// The server answered with a non-2xx status.
    #[error("HTTP status {0}")]
    HttpStatus(u16),
}

impl FetchError {
    /// Classifies a reqwest error into the fetch taxonomy.
    pub fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout_secs)
        } else {
            FetchError::Unreachable(err.to_string())
        }
    }

    /// Returns the preserved HTTP status code, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus(code) => Some(*code),
            _ => None,
        }
    }
}

/// Errors raised when a fetched document cannot yield a usable item.
///
/// Sub-heuristic failures (malformed JSON-LD, unparseable dates, missing
/// author) are not errors; they fall through to the next strategy. Only a
/// missing required field fails the run.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),
}

/// Unified error for one URL's pipeline run.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

impl NormalizeError {
    /// Returns true if this run failed during fetch.
    pub fn is_fetch(&self) -> bool {
        matches!(self, NormalizeError::Fetch(_))
    }

    /// Returns true if this run failed during extraction.
    pub fn is_extraction(&self) -> bool {
        matches!(self, NormalizeError::Extraction(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_is_preserved() {
        let err = FetchError::HttpStatus(503);
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "HTTP status 503");
    }

    #[test]
    fn missing_field_names_the_field() {
        let err = ExtractionError::MissingRequiredField("title");
        assert_eq!(err.to_string(), "missing required field: title");
    }

    #[test]
    fn normalize_error_classification() {
        let fetch: NormalizeError = FetchError::Timeout(20).into();
        assert!(fetch.is_fetch());
        assert!(!fetch.is_extraction());

        let extract: NormalizeError = ExtractionError::MissingRequiredField("body").into();
        assert!(extract.is_extraction());
    }
}
