// ── Reconciliation workflow ──
//
// One call per resource: GET the live tree, decide whether it is present,
// normalize both sides, compare, and then either plan (check mode) or
// write. The outcome is a report that carries everything a caller needs
// to explain what happened, including the raw device responses.

use restsync_api::{ApiResponse, Method, Transport};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use strum::{Display, EnumString};
use tracing::{debug, info, warn};

use crate::diff::{ChangeRecord, DiffBackend};
use crate::equality::trees_equal_in_place;
use crate::error::CoreError;
use crate::filter::{JmesPathQuery, TreeFilter};
use crate::normalize::normalize;
use crate::prune::prune_parallel_state;
use crate::value::Value;

/// Replacement text for secret values echoed back by the device.
pub const REDACTED: &str = "VALUE_SPECIFIED_IN_NO_LOG_PARAMETER";

// ── Request ────────────────────────────────────────────────────────

/// HTTP verb used to write a changed resource.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum WriteMethod {
    /// Replace the resource.
    #[default]
    Put,
    /// Merge into the resource.
    Patch,
}

impl From<WriteMethod> for Method {
    fn from(m: WriteMethod) -> Self {
        match m {
            WriteMethod::Put => Method::Put,
            WriteMethod::Patch => Method::Patch,
        }
    }
}

/// Whether a resource exists (or should exist).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ResourceState {
    #[default]
    Present,
    Absent,
}

/// What the caller wants done to one resource.
#[derive(Debug, Clone, Default)]
pub struct ReconcileRequest {
    /// Resource path, e.g. `/restconf/data/openconfig-system:system/ntp`.
    pub uri: String,
    /// Desired configuration. `None` means an empty mapping.
    pub config: Option<Value>,
    pub method: WriteMethod,
    pub state: ResourceState,
    /// Key names left out of the comparison.
    pub keys_ignore: Vec<String>,
    /// JMESPath expression applied to the live tree before comparing.
    pub config_query: Option<String>,
    /// Compute the change without writing.
    pub check_mode: bool,
    /// Echo the change record in the report's `diff` field.
    pub diff_mode: bool,
}

impl ReconcileRequest {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }
}

// ── Report ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRequest {
    pub method: String,
    pub uri: String,
}

/// What the device looked like before anything was written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConfigState {
    pub api_request: ApiRequest,
    pub api_response: ApiResponse,
    pub current_state: ResourceState,
    pub current_config: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesiredConfigState {
    pub desired_config: Value,
    pub desired_state: ResourceState,
}

/// Outcome of one [`reconcile`] call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileReport {
    pub changed: bool,
    /// A write was attempted and the device did not accept it.
    pub failed: bool,
    pub keys_ignore: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_query: Option<String>,
    pub current_config_state: CurrentConfigState,
    pub desired_config_state: DesiredConfigState,
    /// Serialized as `{}` when nothing changed.
    #[serde(serialize_with = "record_or_empty")]
    pub changes: Option<ChangeRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<ChangeRecord>,
    /// Last response seen. Absent in check mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_response: Option<ApiResponse>,
}

#[allow(clippy::ref_option)]
fn record_or_empty<S: Serializer>(
    record: &Option<ChangeRecord>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match record {
        Some(record) => record.serialize(serializer),
        None => serializer.collect_map(std::iter::empty::<(&str, &str)>()),
    }
}

// ── Workflow ───────────────────────────────────────────────────────

/// Bring one resource in line with `request`.
///
/// Status codes the workflow has no rule for on the initial GET are an
/// error. A rejected write is not: it is reported with `failed = true`.
pub async fn reconcile<T: Transport>(
    transport: &T,
    request: &ReconcileRequest,
    diff: &dyn DiffBackend,
) -> Result<ReconcileReport, CoreError> {
    let filter = request
        .config_query
        .as_deref()
        .filter(|q| !q.is_empty())
        .map(JmesPathQuery::compile)
        .transpose()?;

    let desired = request
        .config
        .as_ref()
        .map_or_else(Value::empty_mapping, normalize);

    let observed = transport.call(Method::Get, &request.uri, None).await?;
    let (current_state, current) = classify(&request.uri, &observed, filter.as_ref())?;
    debug!(uri = %request.uri, %current_state, desired_state = %request.state, "classified resource");

    let outcome = if request.check_mode {
        Outcome {
            change: plan(request, current_state, &current, &desired),
            response: None,
            failed: false,
        }
    } else {
        let mut outcome = apply(transport, request, current_state, &current, &desired).await?;
        outcome.response.get_or_insert_with(|| observed.clone());
        outcome
    };

    let Outcome {
        mut change,
        response,
        failed,
    } = outcome;

    if let Some(record) = change.as_mut() {
        record.annotate(diff);
    }

    Ok(ReconcileReport {
        changed: change.is_some(),
        failed,
        keys_ignore: request.keys_ignore.clone(),
        config_query: filter.map(|f| f.as_str().to_owned()),
        current_config_state: CurrentConfigState {
            api_request: ApiRequest {
                method: Method::Get.to_string(),
                uri: request.uri.clone(),
            },
            api_response: observed,
            current_state,
            current_config: current,
        },
        desired_config_state: DesiredConfigState {
            desired_config: desired,
            desired_state: request.state,
        },
        diff: request
            .diff_mode
            .then(|| change.clone().unwrap_or_default()),
        changes: change,
        api_response: response,
    })
}

struct Outcome {
    change: Option<ChangeRecord>,
    response: Option<ApiResponse>,
    failed: bool,
}

/// Turn the GET response into a presence flag and a comparable tree.
fn classify(
    uri: &str,
    response: &ApiResponse,
    filter: Option<&JmesPathQuery>,
) -> Result<(ResourceState, Value), CoreError> {
    match response.code {
        200 => {
            let contents = response
                .contents
                .clone()
                .map_or_else(Value::empty_mapping, Value::from);
            let mut current = normalize(&prune_parallel_state(contents));
            if let Some(filter) = filter {
                current = filter.apply(&current)?;
            }
            Ok((ResourceState::Present, current))
        }
        404 => Ok((ResourceState::Absent, Value::empty_mapping())),
        204 if response.contents.as_ref().is_none_or(body_is_blank) => {
            Ok((ResourceState::Absent, Value::empty_mapping()))
        }
        code => Err(CoreError::UnexpectedStatus {
            method: Method::Get.to_string(),
            uri: uri.to_owned(),
            code,
            body: response.contents.as_ref().map(ToString::to_string),
        }),
    }
}

fn body_is_blank(body: &serde_json::Value) -> bool {
    match body {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s.is_empty(),
        serde_json::Value::Array(a) => a.is_empty(),
        serde_json::Value::Object(o) => o.is_empty(),
        serde_json::Value::Bool(_) | serde_json::Value::Number(_) => false,
    }
}

/// Check mode: what would change, without touching the device.
fn plan(
    request: &ReconcileRequest,
    current_state: ResourceState,
    current: &Value,
    desired: &Value,
) -> Option<ChangeRecord> {
    match (request.state, current_state) {
        (ResourceState::Present, ResourceState::Absent) => Some(ChangeRecord::new(
            Value::empty_mapping(),
            desired.clone(),
        )),
        (ResourceState::Absent, ResourceState::Present) => Some(ChangeRecord::new(
            current.clone(),
            Value::empty_mapping(),
        )),
        (ResourceState::Present, ResourceState::Present) => {
            update_needed(request, current, desired).map(|before| ChangeRecord::new(before, desired.clone()))
        }
        (ResourceState::Absent, ResourceState::Absent) => None,
    }
}

/// The pruned live tree if it differs from `desired`, `None` if in sync.
fn update_needed(request: &ReconcileRequest, current: &Value, desired: &Value) -> Option<Value> {
    let mut before = current.clone();
    (!trees_equal_in_place(&mut before, desired, &request.keys_ignore)).then_some(before)
}

async fn apply<T: Transport>(
    transport: &T,
    request: &ReconcileRequest,
    current_state: ResourceState,
    current: &Value,
    desired: &Value,
) -> Result<Outcome, CoreError> {
    let mut outcome = Outcome {
        change: None,
        response: None,
        failed: false,
    };

    match (request.state, current_state) {
        (ResourceState::Present, _) => {
            let Some(before) = update_needed(request, current, desired) else {
                debug!(uri = %request.uri, "resource already in sync");
                return Ok(outcome);
            };
            let method = Method::from(request.method);
            let payload = serde_json::Value::from(desired);
            info!(uri = %request.uri, %method, "writing configuration");

            let response = transport.call(method, &request.uri, Some(&payload)).await?;
            if write_accepted(&response) {
                outcome.change = Some(ChangeRecord::new(before, desired.clone()));
            } else {
                warn!(uri = %request.uri, code = response.code, "device rejected {method}");
                outcome.failed = true;
            }
            outcome.response = Some(response);
        }
        (ResourceState::Absent, ResourceState::Present) => {
            info!(uri = %request.uri, "deleting resource");

            let response = transport.call(Method::Delete, &request.uri, None).await?;
            if write_accepted(&response) {
                outcome.change = Some(ChangeRecord::new(current.clone(), Value::empty_mapping()));
            } else {
                warn!(uri = %request.uri, code = response.code, "device rejected DELETE");
                outcome.failed = true;
            }
            outcome.response = Some(response);
        }
        (ResourceState::Absent, ResourceState::Absent) => {
            debug!(uri = %request.uri, "resource already absent");
        }
    }

    Ok(outcome)
}

/// Writes count only when the device answers 201 or 204.
fn write_accepted(response: &ApiResponse) -> bool {
    matches!(response.code, 201 | 204)
}

// ── Ad-hoc requests ────────────────────────────────────────────────

/// Outcome of a [`post`] call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostReport {
    /// Always `true`: a POST is assumed to act.
    pub changed: bool,
    pub failed: bool,
    pub api_response: ApiResponse,
}

/// POST `config` to `uri`, for RPC-style operations.
///
/// The payload is normalized first. Any occurrence of a secret in the
/// echoed response is replaced with [`REDACTED`].
pub async fn post<T: Transport>(
    transport: &T,
    uri: &str,
    config: Option<&Value>,
    secrets: &[SecretString],
) -> Result<PostReport, CoreError> {
    let payload = config.map(|c| serde_json::Value::from(&normalize(c)));
    info!(uri, "posting");

    let mut response = transport.call(Method::Post, uri, payload.as_ref()).await?;
    if let Some(contents) = response.contents.as_mut() {
        redact(contents, secrets);
    }

    Ok(PostReport {
        changed: true,
        failed: !response.is_success(),
        api_response: response,
    })
}

/// Fetch `uri` and return the device's answer untouched.
pub async fn get<T: Transport>(transport: &T, uri: &str) -> Result<ApiResponse, CoreError> {
    Ok(transport.call(Method::Get, uri, None).await?)
}

fn redact(value: &mut serde_json::Value, secrets: &[SecretString]) {
    match value {
        serde_json::Value::String(s) => {
            for secret in secrets {
                let secret = secret.expose_secret();
                if !secret.is_empty() && s.contains(secret) {
                    *s = s.replace(secret, REDACTED);
                }
            }
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(|v| redact(v, secrets)),
        serde_json::Value::Object(map) => map.values_mut().for_each(|v| redact(v, secrets)),
        _ => {}
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::future::Future;
    use std::sync::Mutex;

    use super::*;
    use crate::diff::{NoDiff, StructuralDiff};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const URI: &str = "/restconf/data/openconfig-lldp:lldp/config";

    type Call = (Method, String, Option<serde_json::Value>);

    /// Replays canned responses in order and records every call.
    #[derive(Default)]
    struct FakeTransport {
        responses: Mutex<VecDeque<ApiResponse>>,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeTransport {
        fn new(responses: impl IntoIterator<Item = ApiResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().collect()),
                calls: Mutex::default(),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn methods(&self) -> Vec<Method> {
            self.calls().into_iter().map(|(m, _, _)| m).collect()
        }
    }

    impl Transport for FakeTransport {
        fn call(
            &self,
            method: Method,
            uri: &str,
            payload: Option<&serde_json::Value>,
        ) -> impl Future<Output = Result<ApiResponse, restsync_api::Error>> + Send {
            self.calls
                .lock()
                .unwrap()
                .push((method, uri.to_owned(), payload.cloned()));
            let response = self.responses.lock().unwrap().pop_front().unwrap();
            std::future::ready(Ok(response))
        }
    }

    fn live(body: serde_json::Value) -> ApiResponse {
        ApiResponse::new(200, Some(body))
    }

    fn request(config: serde_json::Value) -> ReconcileRequest {
        ReconcileRequest {
            config: Some(Value::from(config)),
            ..ReconcileRequest::new(URI)
        }
    }

    fn tree(v: serde_json::Value) -> Value {
        Value::from(v)
    }

    // ── Present ──

    #[tokio::test]
    async fn in_sync_resource_is_left_alone() {
        let transport = FakeTransport::new([live(json!({"config": {"enabled": true, "tx": "10"}}))]);
        let req = request(json!({"config": {"enabled": "true", "tx": 10}}));

        let report = reconcile(&transport, &req, &NoDiff).await.unwrap();

        assert!(!report.changed);
        assert!(!report.failed);
        assert_eq!(report.changes, None);
        assert_eq!(transport.methods(), [Method::Get]);
        assert_eq!(report.api_response.unwrap().code, 200);
    }

    #[tokio::test]
    async fn drifted_resource_is_put() {
        let transport = FakeTransport::new([
            live(json!({"config": {"tx": 10}, "state": {"tx": 10, "learned": 3}})),
            ApiResponse::new(204, None),
        ]);
        let req = request(json!({"config": {"tx": 20}}));

        let report = reconcile(&transport, &req, &StructuralDiff).await.unwrap();

        assert!(report.changed);
        let calls = transport.calls();
        assert_eq!(calls[1].0, Method::Put);
        assert_eq!(calls[1].2, Some(json!({"config": {"tx": "20"}})));

        let change = report.changes.unwrap();
        assert_eq!(change.before, tree(json!({"config": {"tx": "10"}})));
        assert_eq!(change.after, tree(json!({"config": {"tx": "20"}})));
        assert!(change.diff.is_some());
        assert_eq!(report.api_response.unwrap().code, 204);
    }

    #[tokio::test]
    async fn patch_method_is_honoured() {
        let transport = FakeTransport::new([live(json!({"a": 1})), ApiResponse::new(201, None)]);
        let req = ReconcileRequest {
            method: WriteMethod::Patch,
            ..request(json!({"a": 2}))
        };

        let report = reconcile(&transport, &req, &NoDiff).await.unwrap();

        assert!(report.changed);
        assert_eq!(transport.methods(), [Method::Get, Method::Patch]);
    }

    #[tokio::test]
    async fn rejected_write_is_a_failure_not_an_error() {
        let transport = FakeTransport::new([
            live(json!({"a": 1})),
            ApiResponse::new(400, Some(json!({"errors": "bad"}))),
        ]);
        let report = reconcile(&transport, &request(json!({"a": 2})), &NoDiff)
            .await
            .unwrap();

        assert!(report.failed);
        assert!(!report.changed);
        assert_eq!(report.api_response.unwrap().code, 400);
    }

    #[tokio::test]
    async fn plain_200_write_is_not_accepted() {
        let transport = FakeTransport::new([live(json!({"a": 1})), ApiResponse::new(200, None)]);
        let report = reconcile(&transport, &request(json!({"a": 2})), &NoDiff)
            .await
            .unwrap();
        assert!(report.failed);
    }

    #[tokio::test]
    async fn ignored_keys_do_not_trigger_a_write() {
        let transport = FakeTransport::new([live(json!({"a": 1, "volatile": "x"}))]);
        let req = ReconcileRequest {
            keys_ignore: vec!["volatile".into()],
            ..request(json!({"a": 1, "volatile": "y"}))
        };

        let report = reconcile(&transport, &req, &NoDiff).await.unwrap();

        assert!(!report.changed);
        assert_eq!(
            report.current_config_state.current_config,
            tree(json!({"a": "1", "volatile": "x"}))
        );
    }

    #[tokio::test]
    async fn missing_resource_is_created() {
        let transport = FakeTransport::new([ApiResponse::new(404, None), ApiResponse::new(201, None)]);
        let report = reconcile(&transport, &request(json!({"a": 1})), &NoDiff)
            .await
            .unwrap();

        assert!(report.changed);
        assert_eq!(report.current_config_state.current_state, ResourceState::Absent);
        assert_eq!(report.changes.unwrap().before, Value::empty_mapping());
    }

    #[tokio::test]
    async fn empty_204_counts_as_absent() {
        let transport = FakeTransport::new([ApiResponse::new(204, None), ApiResponse::new(204, None)]);
        let report = reconcile(&transport, &request(json!({"a": 1})), &NoDiff)
            .await
            .unwrap();
        assert_eq!(report.current_config_state.current_state, ResourceState::Absent);
        assert!(report.changed);
    }

    #[tokio::test]
    async fn unexpected_status_is_an_error() {
        let transport = FakeTransport::new([ApiResponse::new(500, Some(json!("boom")))]);
        let err = reconcile(&transport, &request(json!({})), &NoDiff)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::UnexpectedStatus { code: 500, .. }));
    }

    #[tokio::test]
    async fn non_empty_204_is_an_error() {
        let transport = FakeTransport::new([ApiResponse::new(204, Some(json!({"a": 1})))]);
        let err = reconcile(&transport, &request(json!({})), &NoDiff)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(204));
    }

    // ── Absent ──

    #[tokio::test]
    async fn present_resource_is_deleted() {
        let transport = FakeTransport::new([live(json!({"a": 1})), ApiResponse::new(204, None)]);
        let req = ReconcileRequest {
            state: ResourceState::Absent,
            ..ReconcileRequest::new(URI)
        };

        let report = reconcile(&transport, &req, &NoDiff).await.unwrap();

        assert_eq!(transport.methods(), [Method::Get, Method::Delete]);
        let change = report.changes.unwrap();
        assert_eq!(change.before, tree(json!({"a": "1"})));
        assert_eq!(change.after, Value::empty_mapping());
    }

    #[tokio::test]
    async fn absent_resource_stays_absent() {
        let transport = FakeTransport::new([ApiResponse::new(404, None)]);
        let req = ReconcileRequest {
            state: ResourceState::Absent,
            ..ReconcileRequest::new(URI)
        };

        let report = reconcile(&transport, &req, &NoDiff).await.unwrap();

        assert!(!report.changed);
        assert_eq!(transport.methods(), [Method::Get]);
    }

    // ── Check mode ──

    #[tokio::test]
    async fn check_mode_never_writes() {
        let cases = [
            (ResourceState::Present, live(json!({"a": 1})), json!({"a": 2}), true),
            (ResourceState::Present, live(json!({"a": 1})), json!({"a": "1"}), false),
            (ResourceState::Present, ApiResponse::new(404, None), json!({"a": 2}), true),
            (ResourceState::Absent, live(json!({"a": 1})), json!({}), true),
            (ResourceState::Absent, ApiResponse::new(404, None), json!({}), false),
        ];

        for (state, observed, config, expect_change) in cases {
            let transport = FakeTransport::new([observed]);
            let req = ReconcileRequest {
                state,
                check_mode: true,
                ..request(config)
            };

            let report = reconcile(&transport, &req, &NoDiff).await.unwrap();

            assert_eq!(report.changed, expect_change, "{state}");
            assert_eq!(transport.methods(), [Method::Get]);
            assert!(report.api_response.is_none());
        }
    }

    #[tokio::test]
    async fn check_mode_delete_plan() {
        let transport = FakeTransport::new([live(json!({"a": 1}))]);
        let req = ReconcileRequest {
            state: ResourceState::Absent,
            check_mode: true,
            ..ReconcileRequest::new(URI)
        };
        let change = reconcile(&transport, &req, &NoDiff)
            .await
            .unwrap()
            .changes
            .unwrap();
        assert_eq!(change.before, tree(json!({"a": "1"})));
        assert_eq!(change.after, Value::empty_mapping());
    }

    // ── Query and diff mode ──

    #[tokio::test]
    async fn config_query_reshapes_current_tree() {
        let query = r#""f5-system-aaa:config"."last-change" | { "f5-system-aaa:config": { "last-change": @ } }"#;
        let transport = FakeTransport::new([live(json!({
            "f5-system-aaa:config": {"last-change": "2024-05-01", "role": "admin"}
        }))]);
        let req = ReconcileRequest {
            config_query: Some(query.into()),
            method: WriteMethod::Patch,
            ..request(json!({"f5-system-aaa:config": {"last-change": "2024-05-01"}}))
        };

        let report = reconcile(&transport, &req, &NoDiff).await.unwrap();

        assert!(!report.changed);
        assert_eq!(report.config_query.as_deref(), Some(query));
        assert_eq!(
            report.current_config_state.current_config,
            tree(json!({"f5-system-aaa:config": {"last-change": "2024-05-01"}}))
        );
        assert_eq!(transport.methods(), [Method::Get]);
    }

    #[tokio::test]
    async fn bad_config_query_fails_before_any_request() {
        let transport = FakeTransport::default();
        let req = ReconcileRequest {
            config_query: Some("system.".into()),
            ..request(json!({}))
        };
        let err = reconcile(&transport, &req, &NoDiff).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidQuery { .. }));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn diff_mode_echoes_change() {
        let transport = FakeTransport::new([live(json!({"a": 1})), ApiResponse::new(204, None)]);
        let req = ReconcileRequest {
            diff_mode: true,
            ..request(json!({"a": 2}))
        };
        let report = reconcile(&transport, &req, &StructuralDiff).await.unwrap();
        assert_eq!(report.diff, report.changes);
    }

    #[tokio::test]
    async fn report_serializes_empty_changes_as_mapping() {
        let transport = FakeTransport::new([live(json!({"a": 1}))]);
        let report = reconcile(&transport, &request(json!({"a": 1})), &NoDiff)
            .await
            .unwrap();
        let out = serde_json::to_value(&report).unwrap();

        assert_eq!(out["changes"], json!({}));
        assert_eq!(out["current_config_state"]["api_request"], json!({"method": "GET", "uri": URI}));
        assert_eq!(out["desired_config_state"]["desired_state"], json!("present"));
        assert!(out.get("diff").is_none());
    }

    // ── post / get ──

    #[tokio::test]
    async fn post_redacts_secrets() {
        let transport = FakeTransport::new([ApiResponse::new(
            200,
            Some(json!({"output": {"message": "user admin password hunter2 set"}})),
        )]);
        let secrets = [SecretString::from("hunter2".to_owned())];
        let config = tree(json!({"input": {"password": "hunter2", "retries": 3}}));

        let report = post(&transport, "/restconf/operations/x", Some(&config), &secrets)
            .await
            .unwrap();

        assert!(report.changed);
        assert!(!report.failed);
        assert_eq!(
            report.api_response.contents,
            Some(json!({"output": {"message": format!("user admin password {REDACTED} set")}}))
        );
        let sent = transport.calls()[0].2.clone().unwrap();
        assert_eq!(sent, json!({"input": {"password": "hunter2", "retries": "3"}}));
    }

    #[tokio::test]
    async fn post_fails_outside_2xx() {
        let transport = FakeTransport::new([ApiResponse::new(409, None)]);
        let report = post(&transport, "/restconf/operations/x", None, &[])
            .await
            .unwrap();
        assert!(report.failed);
        assert!(report.changed);
    }

    #[tokio::test]
    async fn get_returns_raw_response() {
        let transport = FakeTransport::new([live(json!({"a": 1}))]);
        let resp = get(&transport, URI).await.unwrap();
        assert_eq!(resp.contents, Some(json!({"a": 1})));
    }
}
