//! `apply`: reconcile one resource against the desired config.

use restsync_core::{ReconcileReport, ReconcileRequest, ResourceState, Session, WriteMethod};
use tracing::debug;

use crate::cli::{ApplyArgs, GlobalOpts, MethodArg, StateArg};
use crate::commands::util;
use crate::error::CliError;
use crate::output;

impl From<MethodArg> for WriteMethod {
    fn from(m: MethodArg) -> Self {
        match m {
            MethodArg::Put => WriteMethod::Put,
            MethodArg::Patch => WriteMethod::Patch,
        }
    }
}

impl From<StateArg> for ResourceState {
    fn from(s: StateArg) -> Self {
        match s {
            StateArg::Present => ResourceState::Present,
            StateArg::Absent => ResourceState::Absent,
        }
    }
}

/// Translate parsed arguments into a workflow request.
pub fn build_request(args: ApplyArgs) -> Result<ReconcileRequest, CliError> {
    let config = util::read_payload(&args.payload)?;
    if config.is_none() && matches!(args.state, StateArg::Present) {
        debug!(uri = %args.uri, "no desired config given, comparing against an empty mapping");
    }

    Ok(ReconcileRequest {
        uri: args.uri,
        config,
        method: args.method.into(),
        state: args.state.into(),
        keys_ignore: args.keys_ignore,
        config_query: args.config_query,
        check_mode: args.check,
        diff_mode: args.diff,
    })
}

pub async fn handle(session: &Session, args: ApplyArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let request = build_request(args)?;
    let report = session.reconcile(&request).await?;

    let color = output::should_color(global.color);
    let out = output::render_single(global.output, &report, |r| summary(&request, r, color))?;
    output::print_output(&out, global.quiet);

    if report.failed {
        let response = report.api_response.unwrap_or_default();
        return Err(CliError::RequestFailed {
            code: response.code,
            body: response.contents.map(|c| c.to_string()).unwrap_or_default(),
        });
    }
    Ok(())
}

/// Table-mode rendering: a status line, then the diff table if anything moved.
fn summary(request: &ReconcileRequest, report: &ReconcileReport, color: bool) -> String {
    let status = if report.failed {
        "failed".to_owned()
    } else {
        output::status_word(report.changed, color)
    };
    let action = match (report.changed, request.state) {
        (false, _) => "in sync",
        (true, ResourceState::Absent) => "delete",
        (true, ResourceState::Present)
            if report.current_config_state.current_state == ResourceState::Absent =>
        {
            "create"
        }
        (true, ResourceState::Present) => "update",
    };
    let mode = if request.check_mode && report.changed {
        ", check mode"
    } else {
        ""
    };
    let mut out = format!("{status}: {} ({action}{mode})", request.uri);

    if let Some(ref record) = report.changes {
        let table = output::render_change_table(record, color);
        if !table.is_empty() {
            out.push('\n');
            out.push_str(&table);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::PayloadArgs;

    fn args(config: Option<&str>) -> ApplyArgs {
        ApplyArgs {
            uri: "/restconf/data/openconfig-system:system/ntp".into(),
            payload: PayloadArgs {
                config_file: None,
                config: config.map(Into::into),
            },
            method: MethodArg::Patch,
            state: StateArg::Present,
            keys_ignore: vec!["last-change".into()],
            config_query: Some(r#""openconfig-system:ntp".config"#.into()),
            check: true,
            diff: false,
        }
    }

    #[test]
    fn request_carries_every_flag() {
        let request = build_request(args(Some(r#"{"config": {"enabled": "true"}}"#))).unwrap();
        assert_eq!(request.method, WriteMethod::Patch);
        assert_eq!(request.state, ResourceState::Present);
        assert_eq!(request.keys_ignore, ["last-change"]);
        assert_eq!(
            request.config_query.as_deref(),
            Some(r#""openconfig-system:ntp".config"#)
        );
        assert!(request.check_mode);
        assert!(!request.diff_mode);
        assert!(request.config.is_some());
    }

    #[test]
    fn missing_config_stays_none() {
        let request = build_request(args(None)).unwrap();
        assert!(request.config.is_none());
    }
}
