//! Progress reporting for sync and cleanup operations.
//!
//! Every event from the library is turned into a structured `tracing` record.

mod logging;

pub use logging::LoggingReporter;

use stars::ProgressCallback;

/// A library callback that forwards every event to a [`LoggingReporter`].
pub fn callback() -> ProgressCallback {
    let reporter = LoggingReporter::new();
    Box::new(move |event| reporter.handle(event))
}
