// ABOUTME: HTTP fetching for the pipeline: bounded timeout, redirect following, size cap, charset decoding.
// ABOUTME: Classifies failures into the FetchError taxonomy; non-2xx statuses are preserved verbatim.

use bytes::Bytes;

use crate::error::FetchError;

/// Maximum allowed response body size (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Result of a successful fetch.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    /// URL as requested.
    pub url: String,
    /// URL after redirects were followed.
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decode the body to text, honoring the charset declared in the
    /// Content-Type header and falling back to detection.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Decode body bytes using the declared charset, or chardetng detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(ct) = content_type {
        if let Some(charset) = extract_charset(ct) {
            if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
                let (decoded, _, _) = encoding.decode(body);
                return decoded.into_owned();
            }
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract the charset value from a Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        let trimmed = part.trim();
        if let Some(charset) = trimmed.strip_prefix("charset=") {
            let charset = charset.trim_matches('"').trim_matches('\'');
            return Some(charset.to_string());
        }
    }
    None
}

/// Fetch a document over HTTP.
///
/// Redirects are followed transparently by the client; the resolved URL is
/// reported in `final_url`. Non-2xx responses fail with
/// [`FetchError::HttpStatus`] carrying the original code. Network failures
/// and timeouts map to `Unreachable` and `Timeout`. No retries happen here.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    timeout_secs: u64,
) -> Result<FetchResult, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::from_reqwest(e, timeout_secs))?;

    let status = response.status();
    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    // Reject oversize bodies up front when the server declares a length.
    if let Some(len) = response.content_length() {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(FetchError::Unreachable(format!(
                "content too large: {} bytes",
                len
            )));
        }
    }

    if !status.is_success() {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| FetchError::from_reqwest(e, timeout_secs))?;

    if body.len() > MAX_CONTENT_LENGTH {
        return Err(FetchError::Unreachable(format!(
            "content too large: {} bytes",
            body.len()
        )));
    }

    Ok(FetchResult {
        status: status.as_u16(),
        url: url.to_string(),
        final_url,
        content_type,
        body,
    })
}
