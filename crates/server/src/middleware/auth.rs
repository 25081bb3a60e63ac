use axum::http::{header, HeaderMap};

/// Extract the bearer token from the `Authorization` header.
///
/// The scheme is matched case-insensitively. Checking the token itself is
/// the tool dispatcher's job.
pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get(header::AUTHORIZATION)?;
    let auth_str = auth_header.to_str().ok()?;

    let (scheme, token) = auth_str.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer(&headers("Bearer token123")).as_deref(), Some("token123"));
        assert_eq!(extract_bearer(&headers("bearer token123")).as_deref(), Some("token123"));
        assert_eq!(extract_bearer(&headers("Bearer   spaced ")).as_deref(), Some("spaced"));
    }

    #[test]
    fn test_extract_bearer_rejects_other_schemes() {
        assert!(extract_bearer(&headers("Basic dXNlcjpwYXNz")).is_none());
        assert!(extract_bearer(&headers("Bearer")).is_none());
        assert!(extract_bearer(&headers("Bearer ")).is_none());
        assert!(extract_bearer(&HeaderMap::new()).is_none());
    }
}
