// ── Runtime connection configuration ──
//
// These types describe how to reach a device. They carry credential data
// and connection tuning, but never touch disk. The CLI builds a
// `ConnectionConfig` from its profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::diff::DiffMode;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. Appliances ship with self-signed certificates.
    #[default]
    DangerAcceptInvalid,
}

/// Username + password for the device.
#[derive(Debug, Clone)]
pub struct DeviceCredentials {
    pub username: String,
    pub password: SecretString,
}

/// Everything needed to open a [`Session`](crate::Session).
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Device base URL (e.g. `https://10.1.1.5:8888`).
    pub url: Url,
    /// `None` for devices that accept anonymous reads.
    pub credentials: Option<DeviceCredentials>,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// Diff backend used to annotate change records.
    pub diff: DiffMode,
}

impl ConnectionConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            credentials: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            diff: DiffMode::default(),
        }
    }
}
