use crate::common::{DbError, Lsn, PageId, Result, PAGE_BODY_SIZE, PAGE_HEADER_SIZE, PAGE_SIZE};

/// Page layout:
///
/// +------------------+
/// | Page Header      |  (PAGE_HEADER_SIZE bytes)
/// |   page_id: u32   |  (little-endian, offset 0)
/// |   lsn: u32       |  (little-endian, offset 4)
/// +------------------+
/// |                  |
/// | Body             |  (PAGE_BODY_SIZE bytes)
/// |                  |
/// +------------------+
///
/// The header always occupies the first PAGE_HEADER_SIZE bytes; the layout
/// of the body is owned by the consumer (a table page view, or raw bytes).
/// Body offsets in `read`/`write` are relative to the start of the body, so
/// body access can never touch the header.

/// Offset of the page_id field in the header
const PAGE_ID_OFFSET: usize = 0;

/// Offset of the lsn field in the header
const LSN_OFFSET: usize = 4;

/// A fixed-size page: the unit of disk I/O and buffer caching.
/// Performs no I/O of its own.
pub struct Page {
    data: [u8; PAGE_SIZE],
}

impl Page {
    /// Creates a zeroed page carrying the given page ID in its header.
    pub fn new(page_id: PageId) -> Self {
        let mut page = Self {
            data: [0u8; PAGE_SIZE],
        };
        page.set_page_id(page_id);
        page
    }

    /// Returns the page ID stored in the header.
    pub fn page_id(&self) -> PageId {
        let bytes: [u8; 4] = self.data[PAGE_ID_OFFSET..PAGE_ID_OFFSET + 4]
            .try_into()
            .unwrap();
        PageId::new(u32::from_le_bytes(bytes))
    }

    /// Sets the page ID in the header.
    pub fn set_page_id(&mut self, page_id: PageId) {
        let bytes = page_id.as_u32().to_le_bytes();
        self.data[PAGE_ID_OFFSET..PAGE_ID_OFFSET + 4].copy_from_slice(&bytes);
    }

    /// Returns the log sequence number stored in the header.
    pub fn lsn(&self) -> Lsn {
        let bytes: [u8; 4] = self.data[LSN_OFFSET..LSN_OFFSET + 4].try_into().unwrap();
        u32::from_le_bytes(bytes)
    }

    /// Sets the log sequence number in the header.
    pub fn set_lsn(&mut self, lsn: Lsn) {
        self.data[LSN_OFFSET..LSN_OFFSET + 4].copy_from_slice(&lsn.to_le_bytes());
    }

    /// Reads `len` bytes from the body starting at the body-relative `offset`.
    pub fn read(&self, offset: usize, len: usize) -> Result<&[u8]> {
        if offset + len > PAGE_BODY_SIZE {
            return Err(DbError::OutOfBounds { offset, len });
        }
        let start = PAGE_HEADER_SIZE + offset;
        Ok(&self.data[start..start + len])
    }

    /// Writes `bytes` into the body at the body-relative `offset`.
    pub fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<()> {
        if offset + bytes.len() > PAGE_BODY_SIZE {
            return Err(DbError::OutOfBounds {
                offset,
                len: bytes.len(),
            });
        }
        let start = PAGE_HEADER_SIZE + offset;
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Returns the usable body as a slice.
    pub fn body(&self) -> &[u8] {
        &self.data[PAGE_HEADER_SIZE..]
    }

    /// Returns the usable body as a mutable slice.
    pub fn body_mut(&mut self) -> &mut [u8] {
        &mut self.data[PAGE_HEADER_SIZE..]
    }

    /// Resets every byte of the page (header included) to zero.
    pub fn reset(&mut self) {
        self.data.fill(0);
    }

    /// Returns the whole page as raw bytes for disk I/O.
    pub fn as_bytes(&self) -> &[u8; PAGE_SIZE] {
        &self.data
    }

    /// Returns the whole page as mutable raw bytes for disk I/O.
    pub fn as_bytes_mut(&mut self) -> &mut [u8; PAGE_SIZE] {
        &mut self.data
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            data: [0u8; PAGE_SIZE],
        }
    }
}
