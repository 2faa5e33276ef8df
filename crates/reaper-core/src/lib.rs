pub mod cleanup;
pub mod error;
pub mod evaluate;
pub mod report;
pub mod tags;

pub use cleanup::{PassSummary, Reaper, RunSummary};
pub use error::{ReaperError, Result};
pub use evaluate::Verdict;
pub use report::{CleanupReport, ReportRow, write_report, write_reports};
