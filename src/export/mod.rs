//! Downloadable documents generated from profile data
//!
//! vCard contact cards, iCalendar booking invites and CSV lead exports. These
//! are write-only formats: nothing here parses them back.

pub mod ics;
pub mod leads_csv;
pub mod vcard;

use thiserror::Error;

pub use ics::{booking_ics, BookingEvent};
pub use leads_csv::leads_csv;
pub use vcard::profile_vcard;

pub const CRLF: &str = "\r\n";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("duration must be between 1 and {max} minutes, got {got}")]
    InvalidDuration { got: u32, max: u32 },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to finish csv output: {0}")]
    Flush(String),
}
