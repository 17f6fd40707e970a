use std::sync::Arc;

use arrsweep_core::{EventSink, SweepReport, SweepStatus, TracingSink};
use chrono::Utc;

use crate::cli::OutputFormat;
use crate::client::{AppContext, CliError, CliResult};
use crate::commands::connect;
use crate::output::render_report;

pub(crate) async fn handle_run(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let report = sweep(ctx, Arc::new(TracingSink)).await?;
    println!("{}", render_report(&report, format)?);
    outcome(&report)
}

async fn sweep(ctx: &AppContext, events: Arc<dyn EventSink>) -> CliResult<SweepReport> {
    let sweeper = connect(ctx, events).await?;
    sweeper
        .run(Utc::now())
        .await
        .map_err(|err| CliError::failure(anyhow::Error::new(err)))
}

fn outcome(report: &SweepReport) -> CliResult<()> {
    match report.status() {
        SweepStatus::Clean => Ok(()),
        SweepStatus::Partial => Err(CliError::Partial(format!(
            "{} of {} candidate(s) need attention",
            report.failures(),
            report.outcomes.len()
        ))),
    }
}
