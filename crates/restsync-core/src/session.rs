// ── Device session ──
//
// Binds a `RestconfClient` to a diff backend so callers can run the
// reconciliation workflow without wiring the pieces together themselves.
// A session is one device, one set of credentials; there is no background
// work and nothing to shut down.

use restsync_api::{ApiResponse, Credentials, RestconfClient, TlsMode, TransportConfig};
use secrecy::SecretString;
use tracing::debug;

use crate::config::{ConnectionConfig, TlsVerification};
use crate::diff::DiffBackend;
use crate::error::CoreError;
use crate::reconcile::{self, PostReport, ReconcileReport, ReconcileRequest};
use crate::value::Value;

pub struct Session {
    client: RestconfClient,
    diff: Box<dyn DiffBackend>,
}

impl Session {
    /// Build the HTTP client for `config`. No request is made yet.
    pub fn connect(config: &ConnectionConfig) -> Result<Self, CoreError> {
        let transport = build_transport(config);
        let credentials = config.credentials.as_ref().map(|c| Credentials {
            username: c.username.clone(),
            password: c.password.clone(),
        });
        let client = RestconfClient::new(config.url.clone(), credentials, &transport)?;
        debug!(url = %config.url, diff = %config.diff, "session ready");

        Ok(Self {
            client,
            diff: config.diff.backend(),
        })
    }

    pub async fn get(&self, uri: &str) -> Result<ApiResponse, CoreError> {
        reconcile::get(&self.client, uri).await
    }

    pub async fn reconcile(&self, request: &ReconcileRequest) -> Result<ReconcileReport, CoreError> {
        reconcile::reconcile(&self.client, request, self.diff.as_ref()).await
    }

    pub async fn post(
        &self,
        uri: &str,
        config: Option<&Value>,
        secrets: &[SecretString],
    ) -> Result<PostReport, CoreError> {
        reconcile::post(&self.client, uri, config, secrets).await
    }
}

fn build_transport(config: &ConnectionConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
