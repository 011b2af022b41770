// ── Core error types ──
//
// Errors surfaced by the reconciliation workflow. The comparison engine
// itself never fails; these cover talking to the device and interpreting
// what came back. `From<restsync_api::Error>` folds transport errors into
// the same vocabulary.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to device at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Device request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Response errors ──────────────────────────────────────────────
    /// The device answered with a status code the workflow has no rule for.
    #[error("{method} {uri} returned unexpected status {code}")]
    UnexpectedStatus {
        method: String,
        uri: String,
        code: u16,
        body: Option<String>,
    },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Invalid config query '{query}': {reason}")]
    InvalidQuery { query: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The HTTP status behind this error, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { code, .. } => Some(*code),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<restsync_api::Error> for CoreError {
    fn from(err: restsync_api::Error) -> Self {
        match err {
            restsync_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            restsync_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            restsync_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            restsync_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            restsync_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            restsync_api::Error::Serialization(e) => CoreError::Serialization(e),
        }
    }
}
