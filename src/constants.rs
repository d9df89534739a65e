pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1";
pub const DEFAULT_GENERATE_MODEL: &str = "google/gemini-2.5-flash-image";
pub const DEFAULT_EDIT_MODEL: &str = "google/gemini-3-pro-image-preview";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;
pub const DEFAULT_IMAGE_MIME: &str = "image/png";
pub const MIN_API_KEY_LEN: usize = 10;
pub const ALLOWED_REQUEST_HEADERS: [&str; 5] = [
    "authorization",
    "x-client-info",
    "apikey",
    "content-type",
    "x-api-key",
];
