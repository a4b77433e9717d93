//! Append-only observation history with a growable column schema.
//!
//! A history is an ordered list of [`ColumnGroup`]s plus the rows appended
//! during an episode. The schema only grows, one whole group at a time, and
//! a column name belongs to at most one group. Appending never grows the
//! schema implicitly: every column of a row must already be registered.
//!
//! Two recorders are provided:
//!
//! - [`FullHistory`] keeps every row in memory.
//! - [`EmptyHistory`] tracks the schema but discards rows.

mod empty;
mod full;
mod registry;

pub use empty::EmptyHistory;
pub use full::FullHistory;
pub use registry::ColumnRegistry;

use thiserror::Error;

use crate::Row;

/// A unit of schema: a single column or a list of related columns.
///
/// Groups are also the unit of visualization; each group is rendered as one
/// plot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnGroup {
    Single(String),
    Nested(Vec<String>),
}

impl ColumnGroup {
    /// Returns the column names in this group.
    #[must_use]
    pub fn names(&self) -> &[String] {
        match self {
            Self::Single(name) => std::slice::from_ref(name),
            Self::Nested(names) => names,
        }
    }
}

impl From<&str> for ColumnGroup {
    fn from(name: &str) -> Self {
        Self::Single(name.to_owned())
    }
}

impl From<String> for ColumnGroup {
    fn from(name: String) -> Self {
        Self::Single(name)
    }
}

impl<S: Into<String>> From<Vec<S>> for ColumnGroup {
    fn from(names: Vec<S>) -> Self {
        Self::Nested(names.into_iter().map(Into::into).collect())
    }
}

/// Errors raised when a schema change or append would break the schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaConflict {
    /// Some, but not all, columns of a group are already registered.
    #[error("columns {group:?} partially overlap already registered columns {existing:?}")]
    PartialOverlap {
        group: Vec<String>,
        existing: Vec<String>,
    },

    /// A column name appears more than once in the same group.
    #[error("column {0:?} appears more than once in a group")]
    DuplicateColumn(String),

    /// A row contains a column that was never registered.
    #[error("column {0:?} is not registered in the history")]
    UnknownColumn(String),
}

/// An append-only table of per-step rows.
pub trait HistoryRecorder {
    /// Returns the column groups in registration order.
    fn structured_cols(&self) -> &[ColumnGroup];

    /// Registers a new column group.
    ///
    /// Returns `Ok(true)` if the group was added and `Ok(false)` if every
    /// column is already registered, which leaves the schema unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaConflict`] if the group partially overlaps the
    /// existing columns or repeats a name.
    fn register(&mut self, group: ColumnGroup) -> Result<bool, SchemaConflict>;

    /// Removes all rows, keeping the schema.
    fn reset(&mut self);

    /// Appends one row.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaConflict::UnknownColumn`] if the row contains a column
    /// that has not been registered.
    fn append(&mut self, row: Row) -> Result<(), SchemaConflict>;

    /// Returns the stored rows, oldest first.
    fn rows(&self) -> &[Row];

    /// Returns every registered column name, flattened in group order.
    fn cols(&self) -> Vec<&str> {
        self.structured_cols()
            .iter()
            .flat_map(ColumnGroup::names)
            .map(String::as_str)
            .collect()
    }
}

impl<H: HistoryRecorder + ?Sized> HistoryRecorder for Box<H> {
    fn structured_cols(&self) -> &[ColumnGroup] {
        (**self).structured_cols()
    }

    fn register(&mut self, group: ColumnGroup) -> Result<bool, SchemaConflict> {
        (**self).register(group)
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn append(&mut self, row: Row) -> Result<(), SchemaConflict> {
        (**self).append(row)
    }

    fn rows(&self) -> &[Row] {
        (**self).rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_group_exposes_one_name() {
        let group = ColumnGroup::from("voltage");
        assert_eq!(group.names(), ["voltage"]);
    }

    #[test]
    fn nested_group_from_vec() {
        let group = ColumnGroup::from(vec!["i.a", "i.b", "i.c"]);
        assert_eq!(group.names(), ["i.a", "i.b", "i.c"]);
    }

    #[test]
    fn cols_flattens_in_group_order() {
        let mut history = FullHistory::new();
        history.register("a".into()).unwrap();
        history.register(vec!["b", "c"].into()).unwrap();

        assert_eq!(history.cols(), ["a", "b", "c"]);
    }
}
