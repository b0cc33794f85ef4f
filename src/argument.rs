//! Structured arguments attached to a step line.
//!
//! A feature document may attach either a data table or a doc string to a
//! step. The upstream parser hands that block to the dispatcher alongside the
//! line; handlers receive it through a trailing table or string parameter.

/// Rows of cells from a data table attached to a step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates a table from rows of cells.
    #[must_use]
    pub const fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Returns the rows in document order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the first row, conventionally the header.
    #[must_use]
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Returns the number of rows, header included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the table has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consumes the table, returning its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }
}

impl From<Vec<Vec<String>>> for Table {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::new(rows)
    }
}

impl<const R: usize, const C: usize> From<[[&str; C]; R]> for Table {
    fn from(rows: [[&str; C]; R]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|cell| String::from(*cell)).collect())
                .collect(),
        )
    }
}

/// The block attached to a step line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepArgument {
    /// A data table.
    Table(Table),
    /// A doc string.
    DocString(String),
}

impl StepArgument {
    /// Returns `true` when the argument occupies a handler parameter slot.
    ///
    /// Every table counts, even an empty one. An empty doc string does not.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        match self {
            Self::Table(_) => true,
            Self::DocString(text) => !text.is_empty(),
        }
    }

    /// Describes the argument's shape for diagnostics.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Table(_) => "a table",
            Self::DocString(_) => "a doc string",
        }
    }
}

impl From<Table> for StepArgument {
    fn from(table: Table) -> Self {
        Self::Table(table)
    }
}

impl From<String> for StepArgument {
    fn from(text: String) -> Self {
        Self::DocString(text)
    }
}

impl From<&str> for StepArgument {
    fn from(text: &str) -> Self {
        Self::DocString(text.to_owned())
    }
}
