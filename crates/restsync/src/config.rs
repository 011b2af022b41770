//! CLI configuration: thin wrapper around `restsync_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--host, --username, --insecure, --timeout).

use std::time::Duration;

use restsync_core::{ConnectionConfig, DeviceCredentials, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use restsync_config::{
    Config, Profile, config_path, load_config_or_default, save_config, store_password,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the connection for a device command from the config file,
/// the active profile, and CLI overrides.
pub fn build_connection_config(global: &GlobalOpts) -> Result<ConnectionConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    // Without a profile, --host alone is enough.
    let profile = match cfg.profiles.get(&profile_name) {
        Some(p) => p.clone(),
        None if global.host.is_some() => Profile::default(),
        None if global.profile.is_some() => {
            let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    resolve_profile(&profile, &profile_name, &cfg, global)
}

/// Translate a `Profile` plus global flags into a `ConnectionConfig`.
///
/// Flags take priority over profile values, profile values over defaults.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<ConnectionConfig, CliError> {
    // 1. Host
    let host = global.host.as_deref().unwrap_or(&profile.host);
    let url = restsync_config::parse_host(host)?;

    // 2. Credentials
    let credentials = match global.username {
        Some(ref username) => Some(DeviceCredentials {
            username: username.clone(),
            password: restsync_config::resolve_password(profile, profile_name)?,
        }),
        None => restsync_config::resolve_credentials(profile, profile_name)?,
    };

    // 3. TLS
    let tls = if global.insecure || cfg.defaults.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        restsync_config::tls_for(profile)
    };

    // 4. Timeout
    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(cfg.defaults.timeout);

    Ok(ConnectionConfig {
        url,
        credentials,
        tls,
        timeout: Duration::from_secs(timeout),
        diff: cfg.defaults.diff,
    })
}
