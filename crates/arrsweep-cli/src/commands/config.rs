use crate::cli::OutputFormat;
use crate::client::{AppContext, CliResult};
use crate::output::render_config;

pub(crate) fn handle_config(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    print!("{}", render_config(&ctx.config.redacted(), format)?);
    Ok(())
}
