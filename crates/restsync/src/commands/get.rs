//! `get`: fetch a resource and print what the device returned.

use restsync_core::Session;

use crate::cli::{GetArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn handle(session: &Session, args: GetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let response = session.get(&args.uri).await?;
    if response.code == 404 {
        return Err(CliError::NotFound {
            method: "GET".into(),
            uri: args.uri,
            code: response.code,
        });
    }

    let out = output::render_single(global.output, &response, |r| {
        // Table mode: just the body, as YAML for readability.
        match r.contents {
            Some(ref body) => output::render_yaml(body).unwrap_or_else(|_| body.to_string()),
            None => format!("{} (empty body)", r.code),
        }
    })?;
    output::print_output(out.trim_end(), global.quiet);

    if response.is_success() {
        Ok(())
    } else {
        Err(CliError::RequestFailed {
            code: response.code,
            body: response
                .contents
                .map(|c| c.to_string())
                .unwrap_or_default(),
        })
    }
}
