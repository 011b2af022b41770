//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use restsync_config::ConfigError;
use restsync_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const DRIFT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to device at {url}")]
    #[diagnostic(
        code(restsync::connection_failed),
        help(
            "Check that the device is reachable and RESTCONF is enabled.\n\
             URL: {url}\n\
             Self-signed certificate? Try --insecure (-k)."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(restsync::timeout),
        help("Increase the timeout with --timeout or check the device's load.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(restsync::auth_failed),
        help(
            "Verify the username and password for this profile.\n\
             Run: restsync config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(restsync::no_credentials),
        help(
            "Store one with: restsync config set-password --profile {profile}\n\
             Or set the RESTSYNC_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Device responses ─────────────────────────────────────────────
    #[error("{method} {uri} returned {code}")]
    #[diagnostic(code(restsync::not_found), help("Check the resource path."))]
    NotFound {
        method: String,
        uri: String,
        code: u16,
    },

    #[error("{method} {uri} returned unexpected status {code}")]
    #[diagnostic(code(restsync::unexpected_status))]
    UnexpectedStatus {
        method: String,
        uri: String,
        code: u16,
        #[help]
        body: Option<String>,
    },

    #[error("The device rejected the request ({code})")]
    #[diagnostic(code(restsync::request_failed), help("{body}"))]
    RequestFailed { code: u16, body: String },

    // ── Drift ────────────────────────────────────────────────────────
    #[error("Configuration differs")]
    #[diagnostic(code(restsync::drift))]
    Drift,

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(restsync::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(restsync::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: restsync config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No device configured")]
    #[diagnostic(
        code(restsync::no_config),
        help(
            "Create a profile with: restsync config init\n\
             Or pass --host. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(restsync::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(restsync::json), help("Check the JSON contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML: {0}")]
    #[diagnostic(code(restsync::yaml), help("Check the YAML contents and try again."))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(restsync::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Drift => exit_code::DRIFT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::UnexpectedStatus {
                method,
                uri,
                code,
                body,
            } => CliError::UnexpectedStatus {
                method,
                uri,
                code,
                body,
            },

            CoreError::InvalidQuery { query, reason } => CliError::Validation {
                field: "config-query".into(),
                reason: format!("'{query}': {reason}"),
            },

            CoreError::Serialization(e) => CliError::Json(e),

            CoreError::Config { message } => CliError::Validation {
                field: "connection".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other),
        }
    }
}
