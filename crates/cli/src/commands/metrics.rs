//! Metrics window inspection commands

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use crate::client::{ApiClient, DeltaResponse, HistoryResponse, LatestResponse};
use crate::output::{
    format_latency, format_percent_delta, format_point_delta, format_success_rate,
    format_timestamp, print_warning, OutputFormat,
};

/// Row for the snapshot history table
#[derive(Tabled)]
struct SnapshotRow {
    #[tabled(rename = "Timestamp")]
    timestamp: String,
    #[tabled(rename = "Requests")]
    requests: u64,
    #[tabled(rename = "Latency")]
    latency: String,
    #[tabled(rename = "Errors")]
    errors: u64,
    #[tabled(rename = "Success")]
    success_rate: String,
}

/// Row for the delta table
#[derive(Tabled)]
struct DeltaRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Change")]
    change: String,
}

/// Show the most recent snapshot
pub async fn show_latest(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let result: LatestResponse = client.get("api/v1/metrics/latest").await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            let Some(snapshot) = &result.snapshot else {
                print_warning("No snapshots recorded yet");
                return Ok(());
            };

            if !result.connected {
                print_warning("Stream disconnected; this snapshot may be stale");
            }

            println!("{}", "Latest Snapshot".bold());
            println!("{}", "=".repeat(40));
            println!("Timestamp:    {}", format_timestamp(snapshot.timestamp));
            println!("Requests:     {}", snapshot.requests);
            println!("Latency:      {}", format_latency(snapshot.latency));
            println!("Errors:       {}", snapshot.errors);
            println!(
                "Success rate: {}",
                format_success_rate(snapshot.success_rate)
            );
        }
    }

    Ok(())
}

/// Show the change between the two most recent snapshots
pub async fn show_delta(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let result: DeltaResponse = client.get("api/v1/metrics/delta").await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            let Some(delta) = &result.delta else {
                print_warning("Not enough samples for a comparison (need at least 2)");
                return Ok(());
            };

            let rows = vec![
                DeltaRow {
                    metric: "Requests".to_string(),
                    change: format_percent_delta(delta.requests, true),
                },
                DeltaRow {
                    metric: "Latency".to_string(),
                    change: format_percent_delta(delta.latency, false),
                },
                DeltaRow {
                    metric: "Errors".to_string(),
                    change: format_percent_delta(delta.errors, false),
                },
                DeltaRow {
                    metric: "Success rate".to_string(),
                    change: format_point_delta(delta.success_rate, true),
                },
            ];

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
        }
    }

    Ok(())
}

/// Show the retained snapshot history
pub async fn show_history(
    client: &ApiClient,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let result: HistoryResponse = client.get("api/v1/metrics/history").await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            if result.samples.is_empty() {
                print_warning("No snapshots recorded yet");
                return Ok(());
            }

            let shown = limit
                .map(|n| n.min(result.samples.len()))
                .unwrap_or(result.samples.len());
            let skipped = result.samples.len() - shown;

            let rows: Vec<SnapshotRow> = result
                .samples
                .iter()
                .skip(skipped)
                .map(|s| SnapshotRow {
                    timestamp: format_timestamp(s.timestamp),
                    requests: s.requests,
                    latency: format_latency(s.latency),
                    errors: s.errors,
                    success_rate: format_success_rate(s.success_rate),
                })
                .collect();

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
            println!(
                "\nShowing {} of {} snapshots (capacity {})",
                shown,
                result.samples.len(),
                result.capacity
            );
        }
    }

    Ok(())
}
