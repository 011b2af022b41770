//! Shared configuration for restsync.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `restsync_core::ConnectionConfig`. The CLI adds
//! `GlobalOpts`-aware overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use restsync_core::{ConnectionConfig, DeviceCredentials, DiffMode, TlsVerification};

/// Service name under which passwords live in the system keyring.
pub const KEYRING_SERVICE: &str = "restsync";

/// Environment variable prefix for config overrides.
pub const ENV_PREFIX: &str = "RESTSYNC_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named device profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Diff backend for change records: "structural" or "none".
    #[serde(default)]
    pub diff: DiffMode,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            diff: DiffMode::default(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named device profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Device base URL (e.g., "https://10.1.1.5:8888").
    pub host: String,

    /// Username for basic auth. Without one, requests go out anonymously.
    pub username: Option<String>,

    /// Password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "restsync", "restsync").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("restsync");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, still layering defaults and environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Keyring ─────────────────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?
        .set_password(password)
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve the device password.
///
/// Order: the profile's `password_env` variable, `RESTSYNC_PASSWORD`,
/// the system keyring, then plaintext in the config file.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Env vars
    let from_env = profile
        .password_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
        .or_else(|| std::env::var(format!("{ENV_PREFIX}PASSWORD")).ok());
    if let Some(pw) = from_env {
        return Ok(SecretString::from(pw));
    }

    // 2. Keyring
    if let Ok(pw) = keyring_entry(profile_name).and_then(|entry| {
        entry
            .get_password()
            .map_err(|e| ConfigError::Keyring(e.to_string()))
    }) {
        return Ok(SecretString::from(pw));
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve device credentials, or `None` when the profile names no user.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Option<DeviceCredentials>, ConfigError> {
    let Some(username) = profile
        .username
        .clone()
        .or_else(|| std::env::var(format!("{ENV_PREFIX}USERNAME")).ok())
    else {
        return Ok(None);
    };
    let password = resolve_password(profile, profile_name)?;
    Ok(Some(DeviceCredentials { username, password }))
}

/// Pick the TLS strategy for a profile.
///
/// `insecure = true` wins; a CA file comes next; an explicit
/// `insecure = false` means the system store. Left unset, self-signed
/// certificates are accepted.
pub fn tls_for(profile: &Profile) -> TlsVerification {
    match (profile.insecure, &profile.ca_cert) {
        (Some(true), _) => TlsVerification::DangerAcceptInvalid,
        (_, Some(ca)) => TlsVerification::CustomCa(ca.clone()),
        (Some(false), None) => TlsVerification::SystemDefaults,
        (None, None) => TlsVerification::DangerAcceptInvalid,
    }
}

pub fn parse_host(host: &str) -> Result<url::Url, ConfigError> {
    host.parse().map_err(|_| ConfigError::Validation {
        field: "host".into(),
        reason: format!("invalid URL: {host}"),
    })
}

/// Build a `ConnectionConfig` from a profile, with no CLI flag overrides.
pub fn profile_to_connection_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ConnectionConfig, ConfigError> {
    Ok(ConnectionConfig {
        url: parse_host(&profile.host)?,
        credentials: resolve_credentials(profile, profile_name)?,
        tls: tls_for(profile),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        diff: defaults.diff,
    })
}
