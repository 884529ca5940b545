//! Core domain types and roster logic.
//!
//! Provides the pure parts of the check-in flow: roster grids, header
//! column location, student row matching, attendance marker handling, and
//! local timestamp computation behind a clock abstraction. Everything here
//! is side-effect free; the API and client crates depend on these types.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod models;
pub mod roster;
pub mod time;

pub use models::{CheckinOutcome, SheetId, StudentMatch};
pub use roster::{RosterColumns, RosterGrid, ATTENDED_MARKER};
pub use time::{Clock, LocalStamp, RealClock, TestClock};
