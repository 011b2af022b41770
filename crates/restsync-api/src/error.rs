use thiserror::Error;

/// Top-level error type for the `restsync-api` crate.
///
/// Only transport-level failures live here. A 404 or a 500 from the device
/// is *not* an error at this layer -- it comes back as an [`ApiResponse`]
/// with the status code, and `restsync-core` decides what it means.
///
/// [`ApiResponse`]: crate::ApiResponse
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The device rejected the credentials (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// The request payload could not be encoded as JSON.
    #[error("Payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` if the device refused our credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}
