//! Routes and form field names shared by handlers, setup and tests.

/// Transcode endpoint
pub const COMPRESS_PATH: &str = "/api/compress";

/// OpenAPI document served for the RapiDoc viewer
pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Repeated multipart file field
pub const IMAGES_FIELD: &str = "images";

/// Target format multipart field
pub const FORMAT_FIELD: &str = "format";

/// Legal page slugs
pub const LEGAL_NOTICE_SLUG: &str = "legal-notice";
pub const PRIVACY_POLICY_SLUG: &str = "privacy-policy";
