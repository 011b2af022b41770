//! `post`: send an RPC-style POST, masking secrets in the echo.

use restsync_core::Session;
use secrecy::SecretString;

use crate::cli::{GlobalOpts, PostArgs};
use crate::commands::util;
use crate::error::CliError;
use crate::output;

pub async fn handle(session: &Session, args: PostArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let payload = util::read_payload(&args.payload)?;
    let secrets: Vec<SecretString> = args.secrets.into_iter().map(SecretString::from).collect();

    let report = session.post(&args.uri, payload.as_ref(), &secrets).await?;

    let color = output::should_color(global.color);
    let out = output::render_single(global.output, &report, |r| {
        let status = if r.failed {
            "failed".to_owned()
        } else {
            output::status_word(r.changed, color)
        };
        let mut text = format!("{status}: POST {} -> {}", args.uri, r.api_response.code);
        if let Some(ref body) = r.api_response.contents {
            text.push('\n');
            text.push_str(output::render_yaml(body).unwrap_or_default().trim_end());
        }
        text
    })?;
    output::print_output(&out, global.quiet);

    if report.failed {
        return Err(CliError::RequestFailed {
            code: report.api_response.code,
            body: report
                .api_response
                .contents
                .map(|c| c.to_string())
                .unwrap_or_default(),
        });
    }
    Ok(())
}
