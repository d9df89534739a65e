use base64::Engine as _;

pub fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// True for `data:<mime>;base64,<payload>` URIs with a non-empty payload.
pub fn is_data_uri(value: &str) -> bool {
    let Some(rest) = value.strip_prefix("data:") else {
        return false;
    };
    match rest.split_once(";base64,") {
        Some((_, payload)) => !payload.is_empty(),
        None => false,
    }
}

pub fn data_uri(mime_type: &str, data_b64: &str) -> String {
    format!("data:{mime_type};base64,{data_b64}")
}

pub fn is_base64_payload(data: &str) -> bool {
    !data.is_empty() && base64::engine::general_purpose::STANDARD.decode(data).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_data_uris() {
        assert!(is_data_uri("data:image/png;base64,AQID"));
        assert!(!is_data_uri("data:image/png;base64,"));
        assert!(!is_data_uri("data:text/plain,hello"));
        assert!(!is_data_uri("https://example.com/a.png"));
    }

    #[test]
    fn recognises_http_urls() {
        assert!(is_http_url("https://example.com/a.png"));
        assert!(is_http_url("http://example.com/a.png"));
        assert!(!is_http_url("ftp://example.com/a.png"));
    }

    #[test]
    fn base64_payload_check() {
        assert!(is_base64_payload("AQID"));
        assert!(!is_base64_payload("not base64!"));
        assert!(!is_base64_payload(""));
    }
}
