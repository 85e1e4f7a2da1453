use parquetry_common::CorruptionError;

/// A forward-only reader over a resident byte slice.
///
/// Every read is bounds-checked; running past the end of the slice is a
/// [CorruptionError], never a panic.
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// The number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    /// Consumes and returns the next `length` bytes.
    pub fn take(&mut self, length: usize) -> Result<&'a [u8], CorruptionError> {
        if length > self.remaining() {
            return Err(CorruptionError::msg(format!(
                "truncated data: needed {length} bytes, {} remaining",
                self.remaining()
            )));
        }
        let slice = &self.bytes[self.position..self.position + length];
        self.position += length;
        Ok(slice)
    }

    /// Consumes a fixed-size little-endian chunk.
    pub fn take_array<const N: usize>(&mut self) -> Result<[u8; N], CorruptionError> {
        let slice = self.take(N)?;
        slice
            .try_into()
            .map_err(|_| CorruptionError::msg("internal length mismatch"))
    }

    /// Consumes a little-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32, CorruptionError> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    /// Consumes a `u32` length prefix followed by that many bytes.
    pub fn read_length_prefixed(&mut self) -> Result<&'a [u8], CorruptionError> {
        let length = usize::try_from(self.read_u32()?)
            .map_err(|_| CorruptionError::msg("length prefix exceeds address space"))?;
        self.take(length)
    }
}

/// Appends a `u32` little-endian length prefix followed by `bytes`.
///
/// Fails if `bytes` is longer than a `u32` can describe.
pub(crate) fn write_length_prefixed(out: &mut Vec<u8>, bytes: &[u8]) -> Result<(), TooLongError> {
    let length = u32::try_from(bytes.len()).map_err(|_| TooLongError(bytes.len()))?;
    out.extend_from_slice(&length.to_le_bytes());
    out.extend_from_slice(bytes);
    Ok(())
}

#[derive(Debug)]
pub(crate) struct TooLongError(pub usize);

/// Appends a presence bitmap, one bit per row, LSB-first within each byte.
pub(crate) fn write_bitmap(out: &mut Vec<u8>, bits: &[bool]) {
    let mut current = 0u8;
    for (index, &bit) in bits.iter().enumerate() {
        if bit {
            current |= 1 << (index % 8);
        }
        if index % 8 == 7 {
            out.push(current);
            current = 0;
        }
    }
    if bits.len() % 8 != 0 {
        out.push(current);
    }
}

/// Reads back a presence bitmap of `num_rows` bits.
pub(crate) fn read_bitmap(
    reader: &mut ByteReader<'_>,
    num_rows: usize,
) -> Result<Vec<bool>, CorruptionError> {
    let bytes = reader.take(num_rows.div_ceil(8))?;
    Ok((0..num_rows)
        .map(|index| bytes[index / 8] & (1 << (index % 8)) != 0)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_roundtrip() {
        for len in [0_usize, 1, 7, 8, 9, 17] {
            let bits: Vec<bool> = (0..len).map(|i| i % 3 == 0).collect();
            let mut buffer = Vec::new();
            write_bitmap(&mut buffer, &bits);
            assert_eq!(buffer.len(), len.div_ceil(8));

            let mut reader = ByteReader::new(&buffer);
            assert_eq!(read_bitmap(&mut reader, len).unwrap(), bits);
            assert_eq!(reader.remaining(), 0);
        }
    }

    #[test]
    fn test_take_past_end_is_corruption() {
        let mut reader = ByteReader::new(&[1, 2, 3]);
        assert_eq!(reader.take(2).unwrap(), &[1, 2]);
        assert!(reader.take(2).is_err());
        // Position does not advance past a failed read.
        assert_eq!(reader.take(1).unwrap(), &[3]);
    }

    #[test]
    fn test_length_prefixed_roundtrip() {
        let mut buffer = Vec::new();
        write_length_prefixed(&mut buffer, b"foo").unwrap();
        let mut reader = ByteReader::new(&buffer);
        assert_eq!(reader.read_length_prefixed().unwrap(), b"foo");
    }

    #[test]
    fn test_truncated_length_prefix_is_corruption() {
        let mut buffer = Vec::new();
        write_length_prefixed(&mut buffer, b"foo").unwrap();
        let mut reader = ByteReader::new(&buffer[..buffer.len() - 1]);
        assert!(reader.read_length_prefixed().is_err());
    }
}
