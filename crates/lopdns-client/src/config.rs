//! Client defaults.

use std::time::Duration;

/// The LopDNS API base URL, without the version segment
pub const DEFAULT_BASE_URL: &str = "https://api.lopdns.se";

/// Version segment prepended to every endpoint path
pub const API_VERSION: &str = "v2";

/// Default timeout for connecting and for the whole request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default lifetime requested for new tokens
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::from_secs(3600);

/// Default User-Agent header
#[must_use]
pub fn default_user_agent() -> String {
    format!("lopdns-api-client/{}", env!("CARGO_PKG_VERSION"))
}

/// Normalize a base URL to the versioned API root.
///
/// Trailing slashes are dropped and the version segment is appended exactly
/// once, so `https://host`, `https://host/` and `https://host/v2/` all give
/// `https://host/v2`.
#[must_use]
pub fn api_root(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    let suffix = format!("/{API_VERSION}");
    let base = trimmed.strip_suffix(&suffix).unwrap_or(trimmed);
    format!("{base}{suffix}")
}
