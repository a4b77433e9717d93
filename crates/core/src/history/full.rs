use crate::Row;

use super::{ColumnGroup, ColumnRegistry, HistoryRecorder, SchemaConflict};

/// A history that keeps every appended row in memory.
#[derive(Debug, Clone, Default)]
pub struct FullHistory {
    registry: ColumnRegistry,
    rows: Vec<Row>,
}

impl FullHistory {
    /// Creates an empty history with no registered columns.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the values recorded for `name`, one entry per row.
    ///
    /// Rows that do not carry the column yield `None`.
    pub fn column<'a>(&'a self, name: &'a str) -> impl Iterator<Item = Option<f64>> + 'a {
        self.rows.iter().map(move |row| row.get(name))
    }
}

impl HistoryRecorder for FullHistory {
    fn structured_cols(&self) -> &[ColumnGroup] {
        self.registry.groups()
    }

    fn register(&mut self, group: ColumnGroup) -> Result<bool, SchemaConflict> {
        self.registry.register(group)
    }

    fn reset(&mut self) {
        self.rows.clear();
    }

    fn append(&mut self, row: Row) -> Result<(), SchemaConflict> {
        self.registry.check(&row)?;
        self.rows.push(row);
        Ok(())
    }

    fn rows(&self) -> &[Row] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> FullHistory {
        let mut history = FullHistory::new();
        history.register("y".into()).unwrap();
        history
    }

    #[test]
    fn append_stores_rows_in_order() {
        let mut history = history();
        history.append([("y", 1.0)].into_iter().collect()).unwrap();
        history.append([("y", 2.0)].into_iter().collect()).unwrap();

        let ys: Vec<_> = history.column("y").collect();
        assert_eq!(ys, [Some(1.0), Some(2.0)]);
    }

    #[test]
    fn append_never_grows_schema() {
        let mut history = history();

        let err = history
            .append([("y", 1.0), ("m", 2.0)].into_iter().collect())
            .unwrap_err();

        assert_eq!(err, SchemaConflict::UnknownColumn("m".into()));
        assert!(history.rows().is_empty());
        assert_eq!(history.cols(), ["y"]);
    }

    #[test]
    fn reset_clears_rows_but_keeps_schema() {
        let mut history = history();
        history.register(vec!["m1", "m2"].into()).unwrap();
        history.append([("y", 1.0)].into_iter().collect()).unwrap();

        history.reset();

        assert!(history.rows().is_empty());
        assert_eq!(history.structured_cols().len(), 2);
    }

    #[test]
    fn rows_may_omit_registered_columns() {
        let mut history = history();
        history.register("m".into()).unwrap();
        history.append([("y", 1.0)].into_iter().collect()).unwrap();
        history
            .append([("y", 2.0), ("m", 5.0)].into_iter().collect())
            .unwrap();

        let ms: Vec<_> = history.column("m").collect();
        assert_eq!(ms, [None, Some(5.0)]);
    }
}
