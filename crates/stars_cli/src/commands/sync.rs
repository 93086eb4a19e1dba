//! `stars sync`: refresh the mirror from the remote starred list.

use console::style;
use serde::Serialize;
use stars::SyncReport;
use tabled::Tabled;

use crate::commands::shared::{Manager, OutputFormat, print_rows};

#[derive(Debug, Serialize, Tabled)]
struct SyncSummary {
    #[tabled(rename = "Pages")]
    pages: u32,
    #[tabled(rename = "Fetched")]
    fetched: usize,
    #[tabled(rename = "Saved")]
    saved: usize,
    #[tabled(rename = "Failed Records")]
    failed_records: usize,
    #[tabled(rename = "Failed Pages")]
    failed_pages: usize,
    #[tabled(rename = "Cancelled")]
    cancelled: bool,
}

impl From<&SyncReport> for SyncSummary {
    fn from(report: &SyncReport) -> Self {
        Self {
            pages: report.pages,
            fetched: report.fetched,
            saved: report.saved,
            failed_records: report.failures.len(),
            failed_pages: report.failed_pages.len(),
            cancelled: report.cancelled,
        }
    }
}

/// Handle the sync command.
///
/// Without `force` an already populated mirror is left alone.
pub(crate) async fn handle_sync(
    manager: &Manager,
    force: bool,
    output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = if force {
        manager.sync_all().await?
    } else {
        match manager.sync_if_empty().await? {
            Some(report) => report,
            None => {
                let count = manager.count().await?;
                println!("Mirror already holds {count} stars; use --force to resync.");
                return Ok(());
            }
        }
    };

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            print_rows(&[SyncSummary::from(&report)], output)?;
            print_failures(&report);
        }
    }

    if report.cancelled {
        return Err("Sync cancelled before all pages were fetched".into());
    }
    if !report.is_complete() {
        return Err(format!(
            "Sync incomplete: {} records and {} pages failed",
            report.failures.len(),
            report.failed_pages.len()
        )
        .into());
    }
    Ok(())
}

fn print_failures(report: &SyncReport) {
    for failure in &report.failed_pages {
        eprintln!(
            "{} page {}: {}",
            style("⚠").yellow(),
            failure.page,
            failure.error
        );
    }
    for failure in &report.failures {
        eprintln!("{} {}: {}", style("⚠").yellow(), failure.url, failure.error);
    }
}
