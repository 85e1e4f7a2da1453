use crate::reader::ContainerReader;
use parquetry_model::Row;

/// A forward-only cursor over the decoded rows of a container.
///
/// Each advance assembles one [Row] across all columns from the reader's
/// resident buffers. After the last row every further advance returns `None`
/// again; the cursor cannot be rewound.
pub struct RowCursor<'a> {
    reader: &'a ContainerReader,
    position: usize,
}

impl<'a> RowCursor<'a> {
    pub(crate) fn new(reader: &'a ContainerReader) -> Self {
        Self {
            reader,
            position: 0,
        }
    }

    /// The number of rows already yielded.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl Iterator for RowCursor<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        if self.position >= self.reader.num_rows() {
            return None;
        }
        let row = Row::new(
            self.reader
                .columns()
                .iter()
                .map(|(name, values)| (name.clone(), values[self.position].clone()))
                .collect(),
        );
        self.position += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.reader.num_rows() - self.position;
        (remaining, Some(remaining))
    }
}
