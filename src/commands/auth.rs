use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use crate::constants::MIN_API_KEY_LEN;
use crate::error::ApiError;

const API_KEY_HEADER: &str = "x-api-key";

/// Reads the caller's key from `x-api-key` or `Authorization: Bearer`.
///
/// Only the shape is checked here. Whether the key is actually good is
/// decided by the gateway it is forwarded to.
pub fn extract_credential(headers: &HeaderMap) -> Result<String, ApiError> {
    let from_api_key = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let from_bearer = || {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.strip_prefix("Bearer ").unwrap_or(value).trim())
            .filter(|value| !value.is_empty())
    };

    let credential = from_api_key
        .or_else(from_bearer)
        .ok_or(ApiError::MissingCredential)?;

    if credential.chars().count() < MIN_API_KEY_LEN {
        return Err(ApiError::InvalidCredential);
    }

    Ok(credential.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(*value));
        }
        map
    }

    #[test]
    fn api_key_header_is_preferred() {
        let map = headers(&[
            ("x-api-key", "key-from-header"),
            ("authorization", "Bearer key-from-bearer"),
        ]);
        assert_eq!(extract_credential(&map).ok().as_deref(), Some("key-from-header"));
    }

    #[test]
    fn bearer_token_is_accepted() {
        let map = headers(&[("authorization", "Bearer 0123456789abcdef")]);
        assert_eq!(extract_credential(&map).ok().as_deref(), Some("0123456789abcdef"));
    }

    #[test]
    fn missing_and_short_keys() {
        assert!(matches!(
            extract_credential(&HeaderMap::new()),
            Err(ApiError::MissingCredential)
        ));
        assert!(matches!(
            extract_credential(&headers(&[("authorization", "Bearer ")])),
            Err(ApiError::MissingCredential)
        ));
        assert!(matches!(
            extract_credential(&headers(&[("x-api-key", "short")])),
            Err(ApiError::InvalidCredential)
        ));
    }
}
