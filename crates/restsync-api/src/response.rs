// ── RESTCONF response envelope ──
//
// Mirrors what the device hands back: a numeric status code and an
// optional JSON body. Kept deliberately loose -- the reconciliation
// layer classifies codes, this crate only transports them.

use serde::{Deserialize, Serialize};

/// A raw response from the RESTCONF API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// HTTP status code.
    pub code: u16,

    /// Parsed body. `None` for empty bodies; a body that is not JSON is
    /// carried as a JSON string so it still shows up in troubleshooting output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<serde_json::Value>,
}

impl ApiResponse {
    pub fn new(code: u16, contents: Option<serde_json::Value>) -> Self {
        Self { code, contents }
    }

    /// `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// Decode a response body as the device sent it.
    pub(crate) fn parse_body(body: &str) -> Option<serde_json::Value> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(
            serde_json::from_str(trimmed)
                .unwrap_or_else(|_| serde_json::Value::String(trimmed.to_owned())),
        )
    }
}
