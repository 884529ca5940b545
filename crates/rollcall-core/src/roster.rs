//! Roster grid parsing and column location.
//!
//! A roster is a spreadsheet tab with a header row and one data row per
//! student. Columns are located by name, not position: the student ID and
//! date columns by exact header match, the parent LINE column by an
//! ordered list of fuzzy predicates to tolerate header label variance.

use crate::models::StudentMatch;

/// Substring that marks an attendance cell as "present".
///
/// A cell reading `出席 08:12` means the student checked in at 08:12;
/// presence of this marker is the sole duplicate-check-in signal.
pub const ATTENDED_MARKER: &str = "出席";

/// Header label of the student ID column.
pub const STUDENT_ID_HEADER: &str = "學號";

/// Header label of the student name column.
pub const NAME_HEADER: &str = "姓名";

/// Header label of the class/cohort column.
pub const CLASS_HEADER: &str = "班級";

/// Highest column index addressable within the bounded read range (`A..Z`).
const MAX_COLUMNS: usize = 26;

/// A header matching rule, evaluated against every header cell in turn.
#[derive(Debug, Clone, Copy)]
pub enum HeaderPredicate {
    /// The header must equal the label exactly.
    Exact(&'static str),
    /// The header must contain the label as a substring.
    Contains(&'static str),
}

impl HeaderPredicate {
    fn matches(&self, header: &str) -> bool {
        match self {
            Self::Exact(label) => header == *label,
            Self::Contains(label) => header.contains(label),
        }
    }
}

/// Accepted spellings for the parent LINE column, in priority order.
///
/// Rosters maintained by hand label this column inconsistently; the
/// substring variants cover the observed casings and the bare `LINE`
/// header is accepted only as an exact match.
pub const PARENT_LINE_PREDICATES: &[HeaderPredicate] = &[
    HeaderPredicate::Contains("家長LINE"),
    HeaderPredicate::Contains("家長Line"),
    HeaderPredicate::Contains("家長line"),
    HeaderPredicate::Exact("LINE"),
];

/// Locates a column by evaluating predicates in priority order.
///
/// Each predicate is checked against the whole header row before falling
/// through to the next, so an exact match earlier in the list wins over a
/// fuzzy match later in it.
pub fn locate_column(header: &[String], predicates: &[HeaderPredicate]) -> Option<usize> {
    predicates
        .iter()
        .find_map(|predicate| header.iter().position(|cell| predicate.matches(cell)))
}

/// Column indices of interest for one roster, derived from its header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterColumns {
    /// Student ID column (required).
    pub student_id: usize,
    /// Today's date column (required; named `YYYY-MM-DD`).
    pub date: usize,
    /// Student name column, if present.
    pub name: Option<usize>,
    /// Class/cohort column, if present.
    pub class: Option<usize>,
    /// Parent LINE recipient column, if present (fuzzy match).
    pub parent_line: Option<usize>,
}

/// A roster tab's cell grid: header row plus data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterGrid {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RosterGrid {
    /// Builds a grid from a raw value range; `None` when there is no data.
    pub fn from_values(mut values: Vec<Vec<String>>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let header = values.remove(0);
        Some(Self { header, rows: values })
    }

    /// The header row.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Number of data rows (header excluded).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Derives the columns of interest for `today` (`YYYY-MM-DD`).
    ///
    /// Returns `None` when the student ID column or today's date column is
    /// missing; the caller skips the roster in both cases. A missing date
    /// column is the expected "no attendance form set up today" state, not
    /// an error.
    pub fn columns(&self, today: &str) -> Option<RosterColumns> {
        let student_id = self.header.iter().position(|h| h == STUDENT_ID_HEADER)?;
        let date = self.header.iter().position(|h| h == today)?;

        Some(RosterColumns {
            student_id,
            date,
            name: self.header.iter().position(|h| h == NAME_HEADER),
            class: self.header.iter().position(|h| h == CLASS_HEADER),
            parent_line: locate_column(&self.header, PARENT_LINE_PREDICATES),
        })
    }

    /// Finds the first data row whose trimmed ID cell equals `student_id`.
    pub fn find_student(&self, columns: &RosterColumns, student_id: &str) -> Option<StudentMatch> {
        self.rows.iter().enumerate().find_map(|(row_index, row)| {
            if cell(row, columns.student_id).trim() != student_id {
                return None;
            }

            let parent_line_id = columns
                .parent_line
                .map(|col| cell(row, col).trim().to_string())
                .filter(|id| !id.is_empty());

            Some(StudentMatch {
                row_index,
                student_id: student_id.to_string(),
                name: columns.name.map(|col| cell(row, col).to_string()).unwrap_or_default(),
                class: columns
                    .class
                    .map(|col| cell(row, col).to_string())
                    .filter(|class| !class.is_empty()),
                parent_line_id,
                date_cell: cell(row, columns.date).to_string(),
            })
        })
    }
}

/// Returns a row's cell by index, treating a ragged short row as empty.
fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map_or("", String::as_str)
}

/// Whether an attendance cell already carries the attended marker.
pub fn is_checked_in(date_cell: &str) -> bool {
    date_cell.contains(ATTENDED_MARKER)
}

/// Renders the attendance value written on check-in, e.g. `出席 08:12`.
pub fn attended_value(time: &str) -> String {
    format!("{ATTENDED_MARKER} {time}")
}

/// A1-style reference for a data row's cell in the given column.
///
/// `row_index` is zero-based within the data rows; the sheet row is offset
/// by the header row and one-based numbering. Returns `None` past column Z,
/// which the `A1:Z1000` read bound keeps unreachable.
pub fn cell_ref(column: usize, row_index: usize) -> Option<String> {
    if column >= MAX_COLUMNS {
        return None;
    }
    let letter = char::from(b'A' + u8::try_from(column).ok()?);
    Some(format!("{letter}{}", row_index + 2))
}
