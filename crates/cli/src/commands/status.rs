//! Feed status command

use anyhow::Result;
use colored::Colorize;

use crate::client::{ApiClient, StatusResponse};
use crate::output::{color_connected, format_timestamp, OutputFormat};

/// Show feed connection and window status
pub async fn show_status(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let result: StatusResponse = client.get("api/v1/status").await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            println!("{}", "Feed Status".bold());
            println!("{}", "=".repeat(40));
            println!("Stream:      {}", color_connected(result.connected));
            if !result.connected {
                println!(
                    "Reconnects:  {}",
                    result.reconnect_attempts.to_string().yellow()
                );
                if let Some(error) = &result.last_error {
                    println!("Last error:  {}", error.red());
                }
            }
            println!(
                "Window:      {}/{} snapshots",
                result.window.samples, result.window.capacity
            );
            if let Some(oldest) = result.window.oldest_timestamp {
                println!("Oldest:      {}", format_timestamp(oldest));
            }
            if let Some(newest) = result.window.newest_timestamp {
                println!("Newest:      {}", format_timestamp(newest));
            }
            println!("As of:       {}", format_timestamp(result.generated_at));
        }
    }

    Ok(())
}
