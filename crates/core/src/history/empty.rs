use crate::Row;

use super::{ColumnGroup, ColumnRegistry, HistoryRecorder, SchemaConflict};

/// A history that validates rows against the schema and then discards them.
///
/// Useful for long training runs where only the schema and the live step
/// results matter.
#[derive(Debug, Clone, Default)]
pub struct EmptyHistory {
    registry: ColumnRegistry,
}

impl EmptyHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryRecorder for EmptyHistory {
    fn structured_cols(&self) -> &[ColumnGroup] {
        self.registry.groups()
    }

    fn register(&mut self, group: ColumnGroup) -> Result<bool, SchemaConflict> {
        self.registry.register(group)
    }

    fn reset(&mut self) {}

    fn append(&mut self, row: Row) -> Result<(), SchemaConflict> {
        self.registry.check(&row)
    }

    fn rows(&self) -> &[Row] {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discards_rows_but_checks_schema() {
        let mut history = EmptyHistory::new();
        history.register("y".into()).unwrap();

        history.append([("y", 1.0)].into_iter().collect()).unwrap();
        assert!(history.rows().is_empty());

        let err = history.append([("q", 1.0)].into_iter().collect());
        assert_eq!(err, Err(SchemaConflict::UnknownColumn("q".into())));
    }
}
