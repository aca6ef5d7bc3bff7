//! Utility functions for resolving artifact filenames

use reqwest::header::{CONTENT_DISPOSITION, HeaderMap};

/// Reduce a server-supplied name to a single safe path component
///
/// Keeps only the last `/`- or `\`-separated segment and rejects empty,
/// `.` and `..` results, so a hostile name can never escape the destination.
///
/// # Examples
///
/// ```
/// use orders_dl::utils::sanitize_filename;
///
/// assert_eq!(sanitize_filename("oid/item/m1.json").as_deref(), Some("m1.json"));
/// assert_eq!(sanitize_filename("../../etc/passwd").as_deref(), Some("passwd"));
/// assert_eq!(sanitize_filename(".."), None);
/// ```
#[must_use]
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let last = raw.rsplit(['/', '\\']).next()?.trim();
    if last.is_empty() || last == "." || last == ".." {
        return None;
    }
    Some(last.to_string())
}

/// Extract the filename from a `Content-Disposition` header
///
/// Supports `filename="..."`, bare `filename=...`, and RFC 5987
/// `filename*=charset'lang'encoded`. The extended form wins when both are present.
/// The extension is kept.
pub fn filename_from_headers(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(CONTENT_DISPOSITION)?.to_str().ok()?;

    let mut plain = None;
    let mut extended = None;
    for part in value.split(';') {
        let part = part.trim();
        if let Some(encoded) = part.strip_prefix("filename*=") {
            // Format is: charset'lang'encoded-filename
            let encoded = encoded
                .rfind('\'')
                .map_or(encoded, |idx| &encoded[idx + 1..]);
            if let Ok(decoded) = urlencoding::decode(encoded.trim_matches('"')) {
                extended = sanitize_filename(&decoded);
            }
        } else if let Some(name) = part.strip_prefix("filename=") {
            plain = sanitize_filename(name.trim_matches('"'));
        }
    }

    extended.or(plain)
}

/// Last path segment of a URL, ignoring the query string
pub fn filename_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let last = parsed.path_segments()?.next_back()?;
    let decoded = urlencoding::decode(last).ok()?;
    sanitize_filename(&decoded)
}
