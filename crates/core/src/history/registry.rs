use std::collections::HashMap;

use crate::Row;

use super::{ColumnGroup, SchemaConflict};

/// A registry mapping each column name to the group that owns it.
///
/// Groups are added whole and a name belongs to exactly one group. Rows are
/// checked against the registered names before they are stored.
#[derive(Debug, Clone, Default)]
pub struct ColumnRegistry {
    groups: Vec<ColumnGroup>,
    owner: HashMap<String, usize>,
}

impl ColumnRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the registered groups in order.
    #[must_use]
    pub fn groups(&self) -> &[ColumnGroup] {
        &self.groups
    }

    /// Returns `true` if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.owner.contains_key(name)
    }

    /// Registers a group if none of its names are known yet.
    ///
    /// A group whose names are all known is accepted without change.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaConflict::PartialOverlap`] if only some names are
    /// known, or [`SchemaConflict::DuplicateColumn`] if the group repeats a
    /// name.
    pub fn register(&mut self, group: ColumnGroup) -> Result<bool, SchemaConflict> {
        let names = group.names();
        let existing: Vec<String> = names
            .iter()
            .filter(|name| self.contains(name))
            .cloned()
            .collect();

        if existing.len() == names.len() {
            return Ok(false);
        }
        if !existing.is_empty() {
            return Err(SchemaConflict::PartialOverlap {
                group: names.to_vec(),
                existing,
            });
        }

        let id = self.groups.len();
        let mut owner = HashMap::with_capacity(names.len());
        for name in names {
            if owner.insert(name.clone(), id).is_some() {
                return Err(SchemaConflict::DuplicateColumn(name.clone()));
            }
        }

        self.owner.extend(owner);
        self.groups.push(group);
        Ok(true)
    }

    /// Checks that every column of `row` is registered.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaConflict::UnknownColumn`] naming the first unknown column.
    pub fn check(&self, row: &Row) -> Result<(), SchemaConflict> {
        match row.names().iter().find(|name| !self.contains(name)) {
            Some(name) => Err(SchemaConflict::UnknownColumn(name.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(groups: &[ColumnGroup]) -> ColumnRegistry {
        let mut registry = ColumnRegistry::new();
        for group in groups {
            registry.register(group.clone()).unwrap();
        }
        registry
    }

    #[test]
    fn disjoint_group_is_added() {
        let mut registry = registry_with(&["a".into()]);

        let added = registry.register(vec!["b", "c"].into()).unwrap();

        assert!(added);
        assert_eq!(registry.groups().len(), 2);
        assert!(registry.contains("c"));
    }

    #[test]
    fn known_group_leaves_schema_unchanged() {
        let mut registry = registry_with(&[vec!["b", "c"].into()]);

        let added = registry.register(vec!["b", "c"].into()).unwrap();

        assert!(!added);
        assert_eq!(registry.groups().len(), 1);
    }

    #[test]
    fn partial_overlap_is_rejected_without_mutation() {
        let mut registry = registry_with(&["a".into()]);

        let err = registry.register(vec!["a", "b"].into()).unwrap_err();

        assert_eq!(
            err,
            SchemaConflict::PartialOverlap {
                group: vec!["a".into(), "b".into()],
                existing: vec!["a".into()],
            }
        );
        assert_eq!(registry.groups().len(), 1);
        assert!(!registry.contains("b"));
    }

    #[test]
    fn repeated_name_in_group_is_rejected() {
        let mut registry = ColumnRegistry::new();

        let err = registry.register(vec!["x", "x"].into()).unwrap_err();

        assert_eq!(err, SchemaConflict::DuplicateColumn("x".into()));
        assert!(registry.groups().is_empty());
        assert!(!registry.contains("x"));
    }

    #[test]
    fn check_reports_unknown_column() {
        let registry = registry_with(&["a".into()]);
        let row: Row = [("a", 1.0), ("z", 2.0)].into_iter().collect();

        assert_eq!(
            registry.check(&row),
            Err(SchemaConflict::UnknownColumn("z".into()))
        );
    }
}
