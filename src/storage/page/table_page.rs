use crate::common::{DbError, Result, SlotId, PAGE_BODY_SIZE};

use super::Page;

/// Slotted table-page layout, held entirely inside the page body so the
/// page header (id, LSN) is never touched by tuple storage:
///
/// body offset 0        +------------------------+
///                      | free_space_offset: u16 |  (start of tuple bytes)
/// body offset 2        | slot_count: u16        |
/// body offset 4        +------------------------+
///                      | Slot Directory         |  (grows forward)
///                      | [slot 0] [slot 1] ...  |
///                      +------------------------+
///                      |                        |
///                      | Free Space             |
///                      |                        |
///                      +------------------------+
///                      | Tuple Data             |  (grows backward)
///                      | [tuple n] ... [tuple 0]|
/// body end             +------------------------+
///
/// Each slot entry is 4 bytes: tuple offset (u16, body-relative) followed by
/// tuple length (u16), both little-endian. An all-zero entry marks a deleted
/// slot. The directory never shrinks and slot indices are never reused:
/// inserts always append a new entry.

/// Body offset of the free-space pointer
const FREE_SPACE_OFFSET: usize = 0;

/// Body offset of the slot count
const SLOT_COUNT_OFFSET: usize = 2;

/// Body offset where the slot directory begins
const SLOTS_OFFSET: usize = 4;

/// Size of each slot entry in bytes
const SLOT_SIZE: usize = 4;

/// A slot directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotEntry {
    /// Body-relative offset of the tuple bytes
    pub offset: u16,
    /// Length of the tuple (0 together with offset 0 = deleted slot)
    pub length: u16,
}

impl SlotEntry {
    pub fn new(offset: u16, length: u16) -> Self {
        Self { offset, length }
    }

    pub fn empty() -> Self {
        Self {
            offset: 0,
            length: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.offset == 0 && self.length == 0
    }
}

fn read_u16(body: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([body[offset], body[offset + 1]])
}

fn write_u16(body: &mut [u8], offset: usize, value: u16) {
    body[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn slot_entry_at(body: &[u8], slot: u16) -> SlotEntry {
    let at = SLOTS_OFFSET + (slot as usize) * SLOT_SIZE;
    SlotEntry::new(read_u16(body, at), read_u16(body, at + 2))
}

/// Mutable view interpreting a page body as a slotted table page.
pub struct TablePage<'a> {
    page: &'a mut Page,
}

impl<'a> TablePage<'a> {
    pub fn new(page: &'a mut Page) -> Self {
        Self { page }
    }

    /// Initializes an empty slotted page: no slots, free-space pointer at
    /// the end of the body.
    pub fn init(&mut self) {
        self.page.body_mut().fill(0);
        self.set_free_space_offset(PAGE_BODY_SIZE as u16);
        self.set_slot_count(0);
    }

    /// Returns the body offset where tuple bytes currently begin.
    pub fn free_space_offset(&self) -> u16 {
        read_u16(self.page.body(), FREE_SPACE_OFFSET)
    }

    fn set_free_space_offset(&mut self, offset: u16) {
        write_u16(self.page.body_mut(), FREE_SPACE_OFFSET, offset);
    }

    /// Returns the number of slots in the directory (deleted ones included).
    pub fn slot_count(&self) -> u16 {
        read_u16(self.page.body(), SLOT_COUNT_OFFSET)
    }

    fn set_slot_count(&mut self, count: u16) {
        write_u16(self.page.body_mut(), SLOT_COUNT_OFFSET, count);
    }

    /// Returns the slot entry for `slot_id`, or None if out of range.
    pub fn get_slot(&self, slot_id: SlotId) -> Option<SlotEntry> {
        if slot_id.as_u16() >= self.slot_count() {
            return None;
        }
        Some(slot_entry_at(self.page.body(), slot_id.as_u16()))
    }

    fn set_slot(&mut self, slot_id: SlotId, entry: SlotEntry) {
        let at = SLOTS_OFFSET + (slot_id.as_u16() as usize) * SLOT_SIZE;
        let body = self.page.body_mut();
        write_u16(body, at, entry.offset);
        write_u16(body, at + 2, entry.length);
    }

    /// Returns the free region size between the end of the slot directory
    /// and the start of tuple bytes.
    pub fn free_space(&self) -> usize {
        let dir_end = SLOTS_OFFSET + (self.slot_count() as usize) * SLOT_SIZE;
        (self.free_space_offset() as usize).saturating_sub(dir_end)
    }

    /// Inserts a tuple, appending a new slot entry, and returns its slot ID.
    /// The page is left unchanged when there is not enough room for the
    /// tuple bytes plus the new directory entry.
    pub fn insert_tuple(&mut self, tuple: &[u8]) -> Result<SlotId> {
        let tuple_size = tuple.len();

        if self.free_space() < tuple_size + SLOT_SIZE {
            return Err(DbError::PageOverflow {
                tuple_size,
                available: self.free_space().saturating_sub(SLOT_SIZE),
            });
        }

        let slot_count = self.slot_count();
        let tuple_offset = self.free_space_offset() - tuple_size as u16;

        self.page.write(tuple_offset as usize, tuple)?;

        let slot_id = SlotId::new(slot_count);
        self.set_slot_count(slot_count + 1);
        self.set_slot(slot_id, SlotEntry::new(tuple_offset, tuple_size as u16));
        self.set_free_space_offset(tuple_offset);

        Ok(slot_id)
    }

    /// Returns the tuple bytes stored at `slot_id`.
    pub fn get_tuple(&self, slot_id: SlotId) -> Result<&[u8]> {
        let entry = self
            .get_slot(slot_id)
            .ok_or(DbError::InvalidSlotId(slot_id.as_u16()))?;

        if entry.is_empty() {
            return Err(DbError::EmptySlot(slot_id.as_u16()));
        }

        self.page.read(entry.offset as usize, entry.length as usize)
    }

    /// Marks the slot deleted by zeroing its entry. The tuple bytes stay in
    /// place but become unreachable; deleting an already-deleted slot is a
    /// no-op.
    pub fn delete_tuple(&mut self, slot_id: SlotId) -> Result<()> {
        let entry = self
            .get_slot(slot_id)
            .ok_or(DbError::InvalidSlotId(slot_id.as_u16()))?;

        if entry.is_empty() {
            return Ok(());
        }

        self.set_slot(slot_id, SlotEntry::empty());
        Ok(())
    }
}

/// Read-only view interpreting a page body as a slotted table page.
pub struct TablePageRef<'a> {
    page: &'a Page,
}

impl<'a> TablePageRef<'a> {
    pub fn new(page: &'a Page) -> Self {
        Self { page }
    }

    /// Returns the number of slots in the directory (deleted ones included).
    pub fn slot_count(&self) -> u16 {
        read_u16(self.page.body(), SLOT_COUNT_OFFSET)
    }

    /// Returns the body offset where tuple bytes currently begin.
    pub fn free_space_offset(&self) -> u16 {
        read_u16(self.page.body(), FREE_SPACE_OFFSET)
    }

    /// Returns the slot entry for `slot_id`, or None if out of range.
    pub fn get_slot(&self, slot_id: SlotId) -> Option<SlotEntry> {
        if slot_id.as_u16() >= self.slot_count() {
            return None;
        }
        Some(slot_entry_at(self.page.body(), slot_id.as_u16()))
    }

    /// Returns the tuple bytes stored at `slot_id`.
    pub fn get_tuple(&self, slot_id: SlotId) -> Result<&'a [u8]> {
        let entry = self
            .get_slot(slot_id)
            .ok_or(DbError::InvalidSlotId(slot_id.as_u16()))?;

        if entry.is_empty() {
            return Err(DbError::EmptySlot(slot_id.as_u16()));
        }

        self.page.read(entry.offset as usize, entry.length as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PageId;

    fn fresh_page() -> Page {
        let mut page = Page::new(PageId::new(1));
        TablePage::new(&mut page).init();
        page
    }

    #[test]
    fn test_init_layout() {
        let mut page = fresh_page();
        let tp = TablePage::new(&mut page);

        assert_eq!(tp.slot_count(), 0);
        assert_eq!(tp.free_space_offset() as usize, PAGE_BODY_SIZE);
        assert_eq!(tp.free_space(), PAGE_BODY_SIZE - SLOTS_OFFSET);
    }

    #[test]
    fn test_insert_appends_backward() {
        let mut page = fresh_page();
        let mut tp = TablePage::new(&mut page);

        let s0 = tp.insert_tuple(b"aaaa").unwrap();
        let s1 = tp.insert_tuple(b"bb").unwrap();

        assert_eq!(s0, SlotId::new(0));
        assert_eq!(s1, SlotId::new(1));
        assert_eq!(tp.slot_count(), 2);

        // Tuple bytes grow backward from the end of the body
        let e0 = tp.get_slot(s0).unwrap();
        let e1 = tp.get_slot(s1).unwrap();
        assert_eq!(e0.offset as usize, PAGE_BODY_SIZE - 4);
        assert_eq!(e1.offset as usize, PAGE_BODY_SIZE - 6);

        assert_eq!(tp.get_tuple(s0).unwrap(), b"aaaa");
        assert_eq!(tp.get_tuple(s1).unwrap(), b"bb");
    }

    #[test]
    fn test_deleted_slot_index_never_reused() {
        let mut page = fresh_page();
        let mut tp = TablePage::new(&mut page);

        let s0 = tp.insert_tuple(b"one").unwrap();
        tp.delete_tuple(s0).unwrap();

        let s1 = tp.insert_tuple(b"two").unwrap();
        assert_eq!(s1, SlotId::new(1));
        assert_eq!(tp.slot_count(), 2);
        assert!(matches!(tp.get_tuple(s0), Err(DbError::EmptySlot(0))));
        assert_eq!(tp.get_tuple(s1).unwrap(), b"two");
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut page = fresh_page();
        let mut tp = TablePage::new(&mut page);

        let slot = tp.insert_tuple(b"x").unwrap();
        tp.delete_tuple(slot).unwrap();
        tp.delete_tuple(slot).unwrap();

        assert!(matches!(
            tp.delete_tuple(SlotId::new(9)),
            Err(DbError::InvalidSlotId(9))
        ));
    }

    #[test]
    fn test_full_page_rejects_insert() {
        let mut page = fresh_page();
        let mut tp = TablePage::new(&mut page);

        // Each insert consumes tuple bytes plus one directory entry
        let big = vec![7u8; 1000];
        while tp.free_space() >= big.len() + SLOT_SIZE {
            tp.insert_tuple(&big).unwrap();
        }

        let before_count = tp.slot_count();
        let before_free = tp.free_space_offset();
        assert!(matches!(
            tp.insert_tuple(&big),
            Err(DbError::PageOverflow { .. })
        ));

        // Failed insert leaves the page untouched
        assert_eq!(tp.slot_count(), before_count);
        assert_eq!(tp.free_space_offset(), before_free);
    }

    #[test]
    fn test_read_only_view_matches() {
        let mut page = fresh_page();
        let slot = {
            let mut tp = TablePage::new(&mut page);
            tp.insert_tuple(b"shared").unwrap()
        };

        let view = TablePageRef::new(&page);
        assert_eq!(view.slot_count(), 1);
        assert_eq!(view.get_tuple(slot).unwrap(), b"shared");
        assert!(matches!(
            view.get_tuple(SlotId::new(5)),
            Err(DbError::InvalidSlotId(5))
        ));
    }
}
