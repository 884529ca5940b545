//! Roster fixtures for attendance tests.

use serde_json::{json, Value};

/// Builds the JSON value-range responses a roster double serves.
///
/// # Example
///
/// ```
/// use rollcall_testing::{RosterBuilder, TEST_TODAY};
///
/// let roster = RosterBuilder::with_standard_header(TEST_TODAY)
///     .row(&["S001", "王小明", "國中班", "U_parent_1", ""]);
/// let body = roster.values_response("Roster");
/// assert_eq!(body["values"][1][0], "S001");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RosterBuilder {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RosterBuilder {
    /// Starts a roster with the given header row.
    pub fn new(header: &[&str]) -> Self {
        Self { header: header.iter().map(|s| s.to_string()).collect(), rows: Vec::new() }
    }

    /// Starts a roster with the usual column set: 學號, 姓名, 班級,
    /// 家長LINE, and a date column for `today`.
    pub fn with_standard_header(today: &str) -> Self {
        Self::new(&["學號", "姓名", "班級", "家長LINE", today])
    }

    /// Starts an empty roster: the double will serve no `values` at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Appends a data row.
    pub fn row(mut self, cells: &[&str]) -> Self {
        self.rows.push(cells.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Renders the `values.get` response body.
    ///
    /// An empty roster omits the `values` field, which is how the API
    /// reports a blank range.
    pub fn values_response(&self, title: &str) -> Value {
        let mut body = json!({
            "range": format!("{title}!A1:Z1000"),
            "majorDimension": "ROWS",
        });

        if !self.header.is_empty() || !self.rows.is_empty() {
            let mut values = vec![self.header.clone()];
            values.extend(self.rows.iter().cloned());
            body["values"] = json!(values);
        }

        body
    }
}

/// Renders the spreadsheet metadata response for a single-tab document.
pub fn metadata_response(title: &str) -> Value {
    json!({
        "spreadsheetId": "test-spreadsheet",
        "sheets": [
            { "properties": { "sheetId": 0, "title": title, "index": 0 } }
        ]
    })
}
