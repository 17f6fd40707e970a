//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use arrsweep_config::SweepConfig;
use arrsweep_core::{CandidateOutcome, SweepReport, SweepStatus, TorrentRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

#[derive(Serialize)]
struct ReportView<'a> {
    status: SweepStatus,
    torrents_seen: usize,
    candidates: usize,
    failures: usize,
    outcomes: &'a [CandidateOutcome],
}

#[derive(Serialize)]
struct CandidateView<'a> {
    hash: &'a str,
    name: &'a str,
    state: &'a str,
    availability_percent: f64,
    active_hours: f64,
    added_hours: f64,
}

pub(crate) fn render_report(report: &SweepReport, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(&ReportView {
            status: report.status(),
            torrents_seen: report.torrents_seen,
            candidates: report.outcomes.len(),
            failures: report.failures(),
            outcomes: &report.outcomes,
        }),
        OutputFormat::Table => {
            let mut lines = vec![format!(
                "{:<40} {:<16} {:<12} {:<13} NAME",
                "HASH", "RESOLUTION", "MARK", "REMOVAL"
            )];
            for outcome in &report.outcomes {
                lines.push(format!(
                    "{:<40} {:<16} {:<12} {:<13} {}",
                    outcome.hash,
                    outcome.resolution.label(),
                    outcome.mark.label(),
                    outcome.removal.label(),
                    outcome.name
                ));
                if let Some(error) = &outcome.lookup_error {
                    lines.push(format!("  lookup error: {error}"));
                }
            }
            lines.push(format!(
                "torrents: {}  candidates: {}  needs attention: {}  status: {}",
                report.torrents_seen,
                report.outcomes.len(),
                report.failures(),
                status_to_str(report.status())
            ));
            Ok(lines.join("\n"))
        }
    }
}

pub(crate) fn render_candidates(
    candidates: &[TorrentRecord],
    now: DateTime<Utc>,
    format: OutputFormat,
) -> CliResult<String> {
    let views: Vec<CandidateView<'_>> = candidates
        .iter()
        .map(|torrent| CandidateView {
            hash: &torrent.hash,
            name: &torrent.name,
            state: torrent.state.as_str(),
            availability_percent: torrent.availability_percent(),
            active_hours: torrent.active_hours(),
            added_hours: torrent.added_hours(now),
        })
        .collect();

    match format {
        OutputFormat::Json => to_json(&views),
        OutputFormat::Table => {
            let mut lines = vec![format!(
                "{:<40} {:<12} {:>7} {:>9} {:>9} NAME",
                "HASH", "STATE", "AVAIL", "ACTIVE_H", "ADDED_H"
            )];
            for view in &views {
                lines.push(format!(
                    "{:<40} {:<12} {:>6.2}% {:>9.2} {:>9.2} {}",
                    view.hash,
                    view.state,
                    view.availability_percent,
                    view.active_hours,
                    view.added_hours,
                    view.name
                ));
            }
            lines.push(format!("{} candidate(s)", views.len()));
            Ok(lines.join("\n"))
        }
    }
}

pub(crate) fn render_config(config: &SweepConfig, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(config).map(|text| format!("{text}\n")),
        OutputFormat::Table => serde_yaml::to_string(config)
            .map_err(|err| CliError::failure(anyhow!("failed to format YAML: {err}"))),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

pub(crate) const fn status_to_str(status: SweepStatus) -> &'static str {
    match status {
        SweepStatus::Clean => "clean",
        SweepStatus::Partial => "partial",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrsweep_core::{
        EpisodeId, HistoryRecordId, MarkState, RemovalState, Resolution, TorrentState,
    };
    use chrono::Duration;
    use serde_json::Value;

    fn outcome(mark: MarkState) -> CandidateOutcome {
        CandidateOutcome {
            hash: "abc123".into(),
            name: "Show.S01E02".into(),
            availability_percent: 10.0,
            active_hours: 30.0,
            added_hours: 48.0,
            resolution: Resolution::Episode {
                episode_id: EpisodeId::new(42).expect("id"),
                history_record_id: HistoryRecordId::new(99),
            },
            mark,
            removal: RemovalState::Removed,
            lookup_error: None,
        }
    }

    #[test]
    fn report_table_lists_outcomes_and_summary() {
        let report = SweepReport {
            torrents_seen: 3,
            outcomes: vec![outcome(MarkState::Marked)],
        };
        let text = render_report(&report, OutputFormat::Table).expect("render");
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].starts_with("HASH"));
        assert!(lines[1].contains("resolved_sonarr"));
        assert!(lines[1].contains("marked"));
        assert!(lines[1].ends_with("Show.S01E02"));
        assert_eq!(
            lines[2],
            "torrents: 3  candidates: 1  needs attention: 0  status: clean"
        );
    }

    #[test]
    fn report_json_carries_status_and_outcomes() {
        let report = SweepReport {
            torrents_seen: 1,
            outcomes: vec![outcome(MarkState::Failed {
                reason: "HTTP 500".into(),
            })],
        };
        let text = render_report(&report, OutputFormat::Json).expect("render");
        let value: Value = serde_json::from_str(&text).expect("valid JSON");
        assert_eq!(value["status"], "partial");
        assert_eq!(value["failures"], 1);
        assert_eq!(value["outcomes"][0]["mark"]["status"], "failed");
        assert_eq!(value["outcomes"][0]["resolution"]["type"], "episode");
    }

    #[test]
    fn candidate_table_shows_measurements() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).expect("timestamp");
        let torrent = TorrentRecord {
            hash: "abc123".into(),
            name: "Show.S01E02".into(),
            availability: 0.1,
            added_at: now - Duration::hours(48),
            active_seconds: 30 * 3_600,
            state: TorrentState::StalledDownload,
        };
        let text = render_candidates(&[torrent], now, OutputFormat::Table).expect("render");
        let row = text.lines().nth(1).expect("row");
        assert!(row.contains("stalledDL"));
        assert!(row.contains("10.00%"));
        assert!(row.contains("30.00"));
        assert!(row.contains("48.00"));
    }

    #[test]
    fn config_renders_as_yaml_with_secrets_redacted() {
        let mut config = SweepConfig::default();
        config.sonarr.api_key = "super-secret".into();
        let text = render_config(&config.redacted(), OutputFormat::Table).expect("render");
        assert!(text.contains("***"));
        assert!(!text.contains("super-secret"));
    }
}
