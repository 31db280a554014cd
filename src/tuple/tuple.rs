use bytes::Bytes;

/// An immutable tuple payload as stored in a table page.
/// Cloning is cheap; the underlying bytes are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuple {
    data: Bytes,
}

impl Tuple {
    /// Creates a tuple taking ownership of the given payload.
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Creates a tuple by copying a payload slice.
    pub fn copy_from(data: &[u8]) -> Self {
        Self {
            data: Bytes::copy_from_slice(data),
        }
    }

    /// Returns the payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the payload length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
