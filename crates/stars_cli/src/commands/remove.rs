//! `stars remove` and `stars cleanup`: unstar remotely and forget locally.

use console::style;
use serde::Serialize;
use stars::CleanupReport;
use tabled::Tabled;

use crate::commands::shared::{Manager, OutputFormat, ensure_populated, print_rows};

#[derive(Debug, Serialize, Tabled)]
struct CleanupSummary {
    #[tabled(rename = "Queued")]
    queued: usize,
    #[tabled(rename = "Removed")]
    removed: usize,
    #[tabled(rename = "Failed")]
    failed: usize,
}

/// Handle the remove command.
///
/// Every URL is attempted even if an earlier one fails.
pub(crate) async fn handle_remove(
    manager: &Manager,
    urls: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut failed = 0usize;

    for url in urls {
        match manager.remove_one(url).await {
            Ok(()) => println!("{} {}", style("✓").green(), url),
            Err(e) if e.is_consistency_warning() => {
                failed += 1;
                eprintln!(
                    "{} {}: unstarred, but the local record remains: {}",
                    style("⚠").yellow(),
                    url,
                    e
                );
            }
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {}", style("✗").red(), url, e);
            }
        }
    }

    if failed > 0 {
        return Err(format!("{failed} of {} removals failed", urls.len()).into());
    }
    Ok(())
}

/// Handle the cleanup command.
pub(crate) async fn handle_cleanup(
    manager: &Manager,
    age_months: u32,
    archived: bool,
    output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_populated(manager).await?;

    let report = manager.cleanup_sweep(age_months, archived).await?;

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            print_rows(
                &[CleanupSummary {
                    queued: report.queued,
                    removed: report.removed.len(),
                    failed: report.failures.len(),
                }],
                output,
            )?;
            print_failures(&report);
        }
    }

    if !report.is_complete() {
        return Err(format!(
            "Cleanup incomplete: {} of {} removals failed",
            report.failures.len(),
            report.queued
        )
        .into());
    }
    Ok(())
}

fn print_failures(report: &CleanupReport) {
    for failure in &report.failures {
        let marker = if failure.consistency {
            style("⚠").yellow()
        } else {
            style("✗").red()
        };
        eprintln!("{} {}: {}", marker, failure.url, failure.error);
    }
}
