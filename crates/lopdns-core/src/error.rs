use thiserror::Error;

/// Result type alias for LopDNS operations
pub type Result<T> = std::result::Result<T, LopDnsError>;

/// Errors that can occur when using the LopDNS API
#[derive(Error, Debug)]
pub enum LopDnsError {
    /// The API rejected the client id or token
    #[error("authentication failed: {0}")]
    Unauthorized(String),

    /// An authenticated call was attempted without a live token
    #[error("not authenticated: no token, or the token has expired")]
    NotAuthenticated,

    /// Resource not found
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// API returned an error response
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Response body or error message from the API
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Request timed out
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Connection failed, including TLS verification failures
    #[error("connection failed: {0}")]
    Connection(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response decoded as JSON but had the wrong shape
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Invalid content or rewrite pattern
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl LopDnsError {
    /// Returns true if the error is due to authentication
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::NotAuthenticated)
    }

    /// Returns true if the error was raised before or while talking to the
    /// server, rather than by the server's answer
    #[must_use]
    pub const fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Timeout(_) | Self::Connection(_)
        )
    }

    /// Returns the HTTP status code if this is an API error
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
