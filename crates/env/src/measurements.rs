use std::collections::HashSet;

use fmugym_core::{ColumnGroup, Row, SchemaConflict};

/// Externally supplied values merged into every recorded row.
///
/// A single [`Row`] forms one column group of all its columns. A list of
/// `(group, row)` pairs registers each group separately.
#[derive(Debug, Clone, PartialEq)]
pub enum Measurements {
    Row(Row),
    Groups(Vec<(ColumnGroup, Row)>),
}

impl From<Row> for Measurements {
    fn from(row: Row) -> Self {
        Self::Row(row)
    }
}

impl From<Vec<(ColumnGroup, Row)>> for Measurements {
    fn from(groups: Vec<(ColumnGroup, Row)>) -> Self {
        Self::Groups(groups)
    }
}

impl Measurements {
    /// Returns the measurements as `(group, row)` pairs.
    pub(crate) fn into_frames(self) -> Vec<(ColumnGroup, Row)> {
        match self {
            Self::Row(row) => vec![(ColumnGroup::Nested(row.names().to_vec()), row)],
            Self::Groups(groups) => groups,
        }
    }
}

/// Returns the groups in `frames` that must be registered, in order.
///
/// Each group must be wholly new or wholly known. A column may appear only
/// once across `outputs` and all of `frames`, so every merged row has unique
/// names. Nothing is registered here, so a conflict anywhere leaves the
/// schema untouched.
pub(crate) fn plan_registration(
    known: &[&str],
    outputs: &[String],
    frames: &[(ColumnGroup, Row)],
) -> Result<Vec<ColumnGroup>, SchemaConflict> {
    let known: HashSet<&str> = known.iter().copied().collect();
    let mut taken: HashSet<&str> = outputs.iter().map(String::as_str).collect();
    let mut new_groups = Vec::new();

    for (group, row) in frames {
        let names = group.names();
        if let Some(name) = row.names().iter().find(|n| !names.contains(*n)) {
            return Err(SchemaConflict::UnknownColumn(name.clone()));
        }
        if let Some(name) = names.iter().find(|name| !taken.insert(name.as_str())) {
            return Err(SchemaConflict::DuplicateColumn(name.clone()));
        }

        let existing: Vec<String> = names
            .iter()
            .filter(|name| known.contains(name.as_str()))
            .cloned()
            .collect();

        if existing.len() == names.len() {
            continue;
        }
        if !existing.is_empty() {
            return Err(SchemaConflict::PartialOverlap {
                group: names.to_vec(),
                existing,
            });
        }
        new_groups.push(group.clone());
    }

    Ok(new_groups)
}
