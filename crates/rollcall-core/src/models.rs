//! Domain models and strongly-typed identifiers.
//!
//! Defines the spreadsheet ID newtype, the result of a roster row match,
//! and the three-way outcome of a check-in attempt.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Strongly-typed Google spreadsheet identifier.
///
/// Wraps the opaque document ID to prevent mixing it up with sheet titles
/// or cell references in API calls.
///
/// # Example
///
/// ```
/// use rollcall_core::models::SheetId;
/// let id = SheetId::from("1SOTkqaIN3g4Spk0Cri4F1mEzdiD1xvLzR5x5KLmhrmY");
/// println!("Checking roster {}", id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SheetId(pub String);

impl SheetId {
    /// Returns the raw identifier for use in request paths.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SheetId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SheetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A student row located in a roster grid.
///
/// Carries everything the check-in flow needs from the matched row: where
/// it sits in the sheet, the resolved display fields, and the current
/// value of today's attendance cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentMatch {
    /// Zero-based index of the row within the data rows (header excluded).
    pub row_index: usize,
    /// The student identifier as it appears in the sheet, trimmed.
    pub student_id: String,
    /// Student display name; empty when the roster has no name column.
    pub name: String,
    /// Class/cohort label; `None` when the roster has no class column
    /// (callers fall back to the sheet title).
    pub class: Option<String>,
    /// Parent LINE recipient ID; `None` when the column is missing or the
    /// cell is empty.
    pub parent_line_id: Option<String>,
    /// Current value of today's attendance cell for this row.
    pub date_cell: String,
}

/// Outcome of a check-in attempt across all configured rosters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckinOutcome {
    /// Attendance was recorded just now.
    Completed {
        /// Student identifier decoded from the QR token.
        student_id: String,
        /// Student display name (may be empty).
        name: String,
        /// Class/cohort label shown on the result page.
        class: String,
        /// Local `YYYY/MM/DD HH:MM` timestamp of the check-in.
        datetime: String,
        /// Whether a parent notification was delivered.
        notified: bool,
    },
    /// The attendance cell already carried the attended marker.
    AlreadyCheckedIn {
        /// The existing cell value, e.g. `出席 08:12`.
        recorded: String,
    },
    /// No roster matched the student ID (or no roster had today's column).
    NotFound {
        /// The decoded student identifier, echoed for support purposes.
        student_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_id_display_matches_raw() {
        let id = SheetId::from("abc123");
        assert_eq!(id.to_string(), "abc123");
        assert_eq!(id.as_str(), "abc123");
    }

    #[test]
    fn sheet_id_roundtrips_through_serde() {
        let id = SheetId::from("14k7fkfiPdhrSnYPXLJ7--8s_Qk3wehI0AZDpgFw83AM");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"14k7fkfiPdhrSnYPXLJ7--8s_Qk3wehI0AZDpgFw83AM\"");
        let back: SheetId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
