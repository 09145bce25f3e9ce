//! Extraction of fingerprint components from HTTP request headers.

use amora_core::fingerprint::FingerprintComponents;
use axum::http::header::{ACCEPT_ENCODING, ACCEPT_LANGUAGE, USER_AGENT};
use axum::http::{HeaderMap, HeaderName};

/// Collect the fingerprint components from request headers.
///
/// Absent or non-UTF-8 header values count as empty strings.
pub fn components_from_headers(headers: &HeaderMap) -> FingerprintComponents {
    FingerprintComponents::new(
        header_value(headers, &USER_AGENT),
        header_value(headers, &ACCEPT_LANGUAGE),
        header_value(headers, &ACCEPT_ENCODING),
    )
}

/// Shorthand for `components_from_headers(headers).hash()`.
pub fn fingerprint_hash(headers: &HeaderMap) -> String {
    components_from_headers(headers).hash()
}

fn header_value(headers: &HeaderMap, name: &HeaderName) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_the_three_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("A"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

        let components = components_from_headers(&headers);
        assert_eq!(components, FingerprintComponents::new("A", "en", "gzip"));
        assert_eq!(
            fingerprint_hash(&headers),
            FingerprintComponents::new("A", "en", "gzip").hash()
        );
    }

    #[test]
    fn missing_headers_are_empty() {
        let components = components_from_headers(&HeaderMap::new());
        assert_eq!(components, FingerprintComponents::default());
    }

    #[test]
    fn unrelated_headers_do_not_affect_hash() {
        let mut a = HeaderMap::new();
        a.insert(USER_AGENT, HeaderValue::from_static("A"));
        let mut b = a.clone();
        b.insert("x-request-id", HeaderValue::from_static("123"));
        assert_eq!(fingerprint_hash(&a), fingerprint_hash(&b));
    }
}
