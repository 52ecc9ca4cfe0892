//! API Constants for the SUSE Manager / Uyuni JSON-over-HTTP API

/// Base API path, relative to the server URL
pub const API_BASE_PATH: &str = "/rhn/manager/api";

/// Exchange credentials for a session cookie
pub const AUTH_LOGIN: &str = "/auth/login";

/// Resolve a hostname to system ids
pub const SYSTEM_GET_ID: &str = "/system/getId";

/// Latest product migration targets for a system
pub const SYSTEM_LIST_LATEST_MIGRATIONS: &str = "/system/listLatestMigrations";

/// Schedule (or dry-run) a product migration
pub const SYSTEM_SCHEDULE_PRODUCT_MIGRATION: &str = "/system/scheduleProductMigration";

/// Standard headers for API requests
pub mod headers {
    /// Content type for JSON requests
    pub const CONTENT_TYPE_JSON: &str = "application/json";
}

/// User agent sent with every request
pub fn user_agent() -> String {
    format!("suma-migrate/{}", env!("CARGO_PKG_VERSION"))
}

/// Build full endpoint URL for an API method path
pub fn endpoint(base_url: &str, method: &str) -> String {
    format!("{}{}{}", base_url.trim_end_matches('/'), API_BASE_PATH, method)
}
