use crate::PlainValue;

/// One decoded row: field names in schema order, each paired with its value
/// or `None` for null.
///
/// Rows are produced by the container reader's cursor. Field order is the
/// declared column order, so two rows from the same container always agree
/// on layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, Option<PlainValue>)>,
}

impl Row {
    pub fn new(fields: Vec<(String, Option<PlainValue>)>) -> Self {
        Self { fields }
    }

    /// The number of fields in this row.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field by name and flattens nulls.
    ///
    /// Returns `None` both for an unknown field and for a field whose value
    /// is null; use [Row::entry] to distinguish the two.
    pub fn get(&self, name: &str) -> Option<&PlainValue> {
        self.entry(name).and_then(|value| value.as_ref())
    }

    /// Looks up a field by name. `Some(None)` means the field exists and is
    /// null.
    pub fn entry(&self, name: &str) -> Option<&Option<PlainValue>> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Iterates over `(name, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&PlainValue>)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    /// Consumes the row and returns its fields.
    pub fn into_fields(self) -> Vec<(String, Option<PlainValue>)> {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> Row {
        Row::new(vec![
            ("int".into(), Some(PlainValue::Int32(7))),
            ("str".into(), None),
        ])
    }

    #[test]
    fn test_get_flattens_nulls() {
        let row = sample_row();
        assert_eq!(row.get("int"), Some(&PlainValue::Int32(7)));
        assert_eq!(row.get("str"), None);
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn test_entry_distinguishes_null_from_missing() {
        let row = sample_row();
        assert_eq!(row.entry("str"), Some(&None));
        assert_eq!(row.entry("missing"), None);
    }

    #[test]
    fn test_iteration_preserves_schema_order() {
        let row = sample_row();
        let names: Vec<&str> = row.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["int", "str"]);
    }
}
