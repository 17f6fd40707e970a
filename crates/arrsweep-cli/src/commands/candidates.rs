use std::sync::Arc;

use anyhow::Context;
use arrsweep_core::TracingSink;
use chrono::Utc;

use crate::cli::OutputFormat;
use crate::client::{AppContext, CliError, CliResult};
use crate::commands::connect;
use crate::output::render_candidates;

pub(crate) async fn handle_candidates(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let sweeper = connect(ctx, Arc::new(TracingSink)).await?;
    let now = Utc::now();
    let candidates = sweeper
        .candidates(now)
        .await
        .context("candidate listing failed")
        .map_err(CliError::failure)?;
    println!("{}", render_candidates(&candidates, now, format)?);
    Ok(())
}
