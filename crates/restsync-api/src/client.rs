// RESTCONF HTTP client
//
// Wraps `reqwest::Client` with YANG media types, basic auth and the
// `X-Auth-Token` session handshake. Stateless apart from the cached token:
// every call is a single request, and the response is handed back as-is.

use std::sync::Mutex;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::response::ApiResponse;
use crate::transport::{Method, Transport, TransportConfig};

const YANG_JSON: &str = "application/yang-data+json";
const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Username + password for HTTP basic auth.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// Raw HTTP client for a RESTCONF endpoint.
///
/// URIs are resolved against `base_url`, so both absolute paths
/// (`/restconf/data/...`) and full URLs work.
pub struct RestconfClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Option<Credentials>,
    token: Mutex<Option<SecretString>>,
    timeout_secs: u64,
}

impl RestconfClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(
        base_url: Url,
        credentials: Option<Credentials>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            credentials,
            token: Mutex::new(None),
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Wrap a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, credentials: Option<Credentials>) -> Self {
        Self {
            http,
            base_url,
            credentials,
            token: Mutex::new(None),
            timeout_secs: TransportConfig::default().timeout_secs(),
        }
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether a session token has been captured from a previous response.
    pub fn has_session_token(&self) -> bool {
        self.token.lock().is_ok_and(|t| t.is_some())
    }

    // ── Verb helpers ─────────────────────────────────────────────────

    pub async fn get(&self, uri: &str) -> Result<ApiResponse, Error> {
        self.request(Method::Get, uri, None).await
    }

    pub async fn put(&self, uri: &str, config: &serde_json::Value) -> Result<ApiResponse, Error> {
        self.request(Method::Put, uri, Some(config)).await
    }

    pub async fn patch(&self, uri: &str, config: &serde_json::Value) -> Result<ApiResponse, Error> {
        self.request(Method::Patch, uri, Some(config)).await
    }

    pub async fn post(&self, uri: &str, config: &serde_json::Value) -> Result<ApiResponse, Error> {
        self.request(Method::Post, uri, Some(config)).await
    }

    pub async fn delete(&self, uri: &str) -> Result<ApiResponse, Error> {
        self.request(Method::Delete, uri, None).await
    }

    // ── Request mechanics ────────────────────────────────────────────

    /// Issue one request and return the raw response.
    ///
    /// A cached session token is tried first; if the device answers 401
    /// the token is dropped and the request is replayed once with basic auth.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        payload: Option<&serde_json::Value>,
    ) -> Result<ApiResponse, Error> {
        let url = self.base_url.join(uri)?;
        let body = payload.map(serde_json::to_vec).transpose()?;
        debug!("{method} {url}");

        let cached = self.cached_token();
        let mut resp = self
            .send(method, &url, body.as_deref(), cached.as_ref())
            .await?;

        if resp.status() == StatusCode::UNAUTHORIZED && cached.is_some() {
            debug!("session token rejected, retrying with basic auth");
            self.store_token(None);
            resp = self.send(method, &url, body.as_deref(), None).await?;
        }

        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: format!("device rejected credentials for {method} {}", url.path()),
            });
        }

        if let Some(token) = resp
            .headers()
            .get(AUTH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            self.store_token(Some(SecretString::from(token.to_owned())));
        }

        let code = resp.status().as_u16();
        let text = resp.text().await.map_err(|e| self.map_transport(e))?;
        debug!(code, bytes = text.len(), "response received");

        Ok(ApiResponse::new(code, ApiResponse::parse_body(&text)))
    }

    async fn send(
        &self,
        method: Method,
        url: &Url,
        body: Option<&[u8]>,
        token: Option<&SecretString>,
    ) -> Result<reqwest::Response, Error> {
        let mut req = self
            .http
            .request(method.to_reqwest(), url.clone())
            .header(ACCEPT, YANG_JSON);

        if let Some(bytes) = body {
            req = req.header(CONTENT_TYPE, YANG_JSON).body(bytes.to_vec());
        }

        if let Some(token) = token {
            let mut value =
                HeaderValue::from_str(token.expose_secret()).map_err(|e| Error::Authentication {
                    message: format!("invalid session token header value: {e}"),
                })?;
            value.set_sensitive(true);
            req = req.header(AUTH_TOKEN_HEADER, value);
        } else if let Some(ref creds) = self.credentials {
            req = req.basic_auth(&creds.username, Some(creds.password.expose_secret()));
        }

        req.send().await.map_err(|e| self.map_transport(e))
    }

    fn map_transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }

    fn cached_token(&self) -> Option<SecretString> {
        self.token.lock().ok().and_then(|t| t.clone())
    }

    fn store_token(&self, token: Option<SecretString>) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = token;
        }
    }
}

impl Transport for RestconfClient {
    fn call(
        &self,
        method: Method,
        uri: &str,
        payload: Option<&serde_json::Value>,
    ) -> impl std::future::Future<Output = Result<ApiResponse, Error>> + Send {
        self.request(method, uri, payload)
    }
}
