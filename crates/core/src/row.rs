/// A single structured record of named values.
///
/// Column order is preserved. Observations and measurements are both rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    names: Vec<String>,
    values: Vec<f64>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a row by pairing names with values in order.
    ///
    /// Returns `None` if the lengths differ.
    #[must_use]
    pub fn from_parts(names: Vec<String>, values: Vec<f64>) -> Option<Self> {
        (names.len() == values.len()).then_some(Self { names, values })
    }

    /// Returns the value stored under `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i])
    }

    /// Appends a column to the end of the row.
    pub fn push(&mut self, name: impl Into<String>, value: f64) {
        self.names.push(name.into());
        self.values.push(value);
    }

    /// Returns a new row with the columns of `other` appended after these.
    #[must_use]
    pub fn join(&self, other: &Row) -> Row {
        let mut joined = self.clone();
        joined.extend(other.iter().map(|(n, v)| (n.to_owned(), v)));
        joined
    }

    /// Returns the column names in order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the values in column order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over `(name, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Row {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        let mut row = Row::new();
        row.extend(iter);
        row
    }
}

impl<S: Into<String>> Extend<(S, f64)> for Row {
    fn extend<T: IntoIterator<Item = (S, f64)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.push(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name() {
        let row: Row = [("a", 1.0), ("b", 2.0)].into_iter().collect();

        assert_eq!(row.get("b"), Some(2.0));
        assert_eq!(row.get("c"), None);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn join_keeps_column_order() {
        let obs: Row = [("y", 1.0)].into_iter().collect();
        let meas: Row = [("m1", 2.0), ("m2", 3.0)].into_iter().collect();

        let joined = obs.join(&meas);

        assert_eq!(joined.names(), ["y", "m1", "m2"]);
        assert_eq!(joined.values(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn from_parts_rejects_length_mismatch() {
        assert!(Row::from_parts(vec!["a".into()], vec![1.0, 2.0]).is_none());
        assert!(Row::from_parts(vec!["a".into()], vec![1.0]).is_some());
    }
}
