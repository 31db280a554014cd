use std::sync::Arc;

use crate::buffer::BufferPoolManager;
use crate::common::{DbError, PageId, Result, Rid, SlotId};
use crate::tuple::Tuple;

use super::page::{TablePage, TablePageRef};

/// TableHeap stores a table's tuples in a single slotted page.
///
/// Tuples are addressed by Rid (page id + slot id). Slot ids are append-only:
/// deleting a tuple tombstones its slot but never frees the slot id for
/// reuse, so a Rid handed out once never silently points at another tuple.
pub struct TableHeap {
    buffer_pool: Arc<BufferPoolManager>,
    first_page_id: PageId,
}

impl TableHeap {
    /// Creates a new table heap backed by a freshly allocated page.
    pub fn create(buffer_pool: Arc<BufferPoolManager>) -> Result<Self> {
        let mut guard = buffer_pool.new_page()?;
        let first_page_id = guard.page_id();
        let mut table_page = TablePage::new(guard.page_mut());
        table_page.init();
        drop(guard);

        Ok(Self {
            buffer_pool,
            first_page_id,
        })
    }

    /// Inserts a tuple and returns the Rid it now lives at.
    /// Fails with PageOverflow when the page cannot fit the tuple.
    pub fn insert(&self, tuple_data: &[u8]) -> Result<Rid> {
        let mut guard = self.buffer_pool.write_page(self.first_page_id)?;
        let mut table_page = TablePage::new(guard.page_mut());
        let slot_id = table_page.insert_tuple(tuple_data)?;
        Ok(Rid::new(self.first_page_id, slot_id))
    }

    /// Retrieves a copy of the tuple at the given Rid.
    pub fn get(&self, rid: Rid) -> Result<Tuple> {
        if rid.page_id != self.first_page_id {
            return Err(DbError::InvalidPageId(rid.page_id));
        }

        let guard = self.buffer_pool.read_page(rid.page_id)?;
        let table_page = TablePageRef::new(guard.page());
        let data = table_page.get_tuple(rid.slot_id)?;
        Ok(Tuple::copy_from(data))
    }

    /// Tombstones the tuple at the given Rid. Deleting an already deleted
    /// slot is a no-op; a slot id past the slot count is an error.
    pub fn delete(&self, rid: Rid) -> Result<()> {
        if rid.page_id != self.first_page_id {
            return Err(DbError::InvalidPageId(rid.page_id));
        }

        let mut guard = self.buffer_pool.write_page(rid.page_id)?;
        let mut table_page = TablePage::new(guard.page_mut());
        table_page.delete_tuple(rid.slot_id)
    }

    /// Returns all live tuples in slot order, skipping tombstones.
    pub fn scan(&self) -> Result<Vec<(Rid, Tuple)>> {
        let guard = self.buffer_pool.read_page(self.first_page_id)?;
        let table_page = TablePageRef::new(guard.page());

        let mut tuples = Vec::new();
        for slot in 0..table_page.slot_count() {
            let slot_id = SlotId::new(slot);
            match table_page.get_tuple(slot_id) {
                Ok(data) => {
                    tuples.push((Rid::new(self.first_page_id, slot_id), Tuple::copy_from(data)));
                }
                Err(DbError::EmptySlot(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(tuples)
    }

    /// Returns the page id backing this heap.
    pub fn first_page_id(&self) -> PageId {
        self.first_page_id
    }
}
