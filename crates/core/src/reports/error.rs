//! Report error types.
//!
//! Computation itself is total over its inputs; errors only arise while
//! setting up the reporting window.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while preparing report inputs.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// No prior cut-off exists for the opening date.
    #[error("Date out of range: no day before {0}")]
    DateOutOfRange(NaiveDate),
}
