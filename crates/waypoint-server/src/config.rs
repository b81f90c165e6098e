use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: &str = "1";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Upper bound for any request body, uploads included. Must admit an
    /// over-limit image so the 5 MiB check can answer with a structured
    /// error instead of a connection-level rejection.
    pub max_body_bytes: usize,
    pub max_image_bytes: usize,
    pub image_public_prefix: String,
    pub document_ttl: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 12 * 1024 * 1024,
            max_image_bytes: waypoint_store::MAX_IMAGE_BYTES,
            image_public_prefix: "/images".to_string(),
            document_ttl: Duration::from_secs(0),
        }
    }
}

pub fn validate_startup_config(api: &ApiConfig) -> Result<(), String> {
    if api.max_body_bytes == 0 || api.max_image_bytes == 0 {
        return Err("size limits must be > 0".to_string());
    }
    if api.max_image_bytes > api.max_body_bytes {
        return Err("max_image_bytes must not exceed max_body_bytes".to_string());
    }
    if !api.image_public_prefix.starts_with('/') || api.image_public_prefix.len() < 2 {
        return Err("image_public_prefix must be a non-root absolute path".to_string());
    }
    Ok(())
}
