use std::collections::{HashMap, LinkedList};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::common::{DbError, FrameId, PageId, Result, INVALID_PAGE_ID, PAGE_SIZE};
use crate::storage::disk::{DiskManager, DiskScheduler};

use super::{FrameHeader, LruReplacer, ReadPageGuard, WritePageGuard};

/// Internal state that can be shared across threads
struct BufferPoolState {
    /// The buffer pool frames
    frames: Vec<Arc<FrameHeader>>,
    /// Page table: maps page IDs to frame IDs
    page_table: Mutex<HashMap<PageId, FrameId>>,
    /// Free list: frames that are not currently in use
    free_list: Mutex<LinkedList<FrameId>>,
    /// LRU replacer for eviction decisions
    replacer: LruReplacer,
}

/// Decrements a page's pin count, folding in the dirty flag.
/// Returns false if the page is not resident or its pin count is already 0.
/// When the count reaches 0 the frame becomes evictable.
fn release_page(state: &BufferPoolState, page_id: PageId, is_dirty: bool) -> bool {
    let page_table = state.page_table.lock();

    if let Some(&frame_id) = page_table.get(&page_id) {
        let frame = &state.frames[frame_id.as_usize()];
        match frame.unpin() {
            Some(remaining) => {
                if is_dirty {
                    frame.set_dirty(true);
                }
                if remaining == 0 {
                    state.replacer.mark_accessible(frame_id);
                }
                true
            }
            None => false,
        }
    } else {
        false
    }
}

/// BufferPoolManager is responsible for fetching database pages from disk
/// and storing them in memory. It manages a fixed number of frames and uses
/// the LRU replacement policy to decide which pages to evict.
///
/// Dirty pages are written back lazily: eviction and explicit flush are the
/// only paths that reach disk, so repeated pin/unpin cycles on a hot page
/// cost no I/O.
pub struct BufferPoolManager {
    /// Number of frames in the buffer pool
    pool_size: usize,
    /// Shared state
    state: Arc<BufferPoolState>,
    /// Disk scheduler for background I/O
    disk_scheduler: DiskScheduler,
}

impl BufferPoolManager {
    /// Creates a new BufferPoolManager with the given pool size and disk manager.
    pub fn new(pool_size: usize, disk_manager: Arc<DiskManager>) -> Self {
        let mut frames = Vec::with_capacity(pool_size);
        let mut free_list = LinkedList::new();

        for i in 0..pool_size {
            let frame_id = FrameId::new(i as u32);
            frames.push(Arc::new(FrameHeader::new(frame_id)));
            free_list.push_back(frame_id);
        }

        let state = Arc::new(BufferPoolState {
            frames,
            page_table: Mutex::new(HashMap::new()),
            free_list: Mutex::new(free_list),
            replacer: LruReplacer::new(),
        });

        Self {
            pool_size,
            state,
            disk_scheduler: DiskScheduler::new(disk_manager),
        }
    }

    /// Allocates a fresh page and returns a write guard over it.
    /// The page is zero-initialized apart from its header and stays pinned
    /// until the guard is dropped.
    pub fn new_page(&self) -> Result<WritePageGuard> {
        let frame_id = self.get_free_frame()?;
        let frame = &self.state.frames[frame_id.as_usize()];

        // Allocate a new page on disk
        let page_id = self.disk_scheduler.disk_manager().allocate_page()?;

        // Initialize the frame; the header must reach disk eventually, so
        // the frame starts out dirty.
        frame.reset();
        frame.set_page_id(page_id);
        frame.data.write().set_page_id(page_id);
        frame.set_dirty(true);
        frame.pin();

        // Update page table
        self.state.page_table.lock().insert(page_id, frame_id);
        self.state.replacer.mark_pinned(frame_id);

        Ok(self.make_write_guard(page_id, frame_id))
    }

    /// Fetches a page for read access. The page stays pinned until the
    /// returned guard is dropped.
    pub fn read_page(&self, page_id: PageId) -> Result<ReadPageGuard> {
        if page_id == INVALID_PAGE_ID {
            return Err(DbError::InvalidPageId(page_id));
        }

        let frame_id = self.fetch_page(page_id)?;
        let frame = Arc::clone(&self.state.frames[frame_id.as_usize()]);

        // Clone state for the callback
        let state = Arc::clone(&self.state);

        let guard = unsafe {
            ReadPageGuard::new(
                page_id,
                frame,
                Box::new(move |pid, is_dirty| {
                    release_page(&state, pid, is_dirty);
                }),
            )
        };

        Ok(guard)
    }

    /// Fetches a page for write access. The page stays pinned until the
    /// returned guard is dropped.
    pub fn write_page(&self, page_id: PageId) -> Result<WritePageGuard> {
        if page_id == INVALID_PAGE_ID {
            return Err(DbError::InvalidPageId(page_id));
        }

        let frame_id = self.fetch_page(page_id)?;
        Ok(self.make_write_guard(page_id, frame_id))
    }

    /// Explicitly unpins a page, folding in the dirty flag.
    /// Returns false if the page is not resident or was not pinned.
    pub fn unpin_page(&self, page_id: PageId, is_dirty: bool) -> bool {
        release_page(&self.state, page_id, is_dirty)
    }

    /// Flushes a specific page to disk and clears its dirty flag.
    /// Flushing a page that is not resident is an error.
    pub fn flush_page(&self, page_id: PageId) -> Result<()> {
        if page_id == INVALID_PAGE_ID {
            return Err(DbError::InvalidPageId(page_id));
        }

        let page_table = self.state.page_table.lock();

        if let Some(&frame_id) = page_table.get(&page_id) {
            let frame = &self.state.frames[frame_id.as_usize()];

            let mut data = Box::new([0u8; PAGE_SIZE]);
            frame.copy_to(&mut data[..]);

            // Write to disk
            self.disk_scheduler.schedule_write_sync(page_id, data)?;

            // Clear dirty flag
            frame.set_dirty(false);

            Ok(())
        } else {
            Err(DbError::PageNotResident(page_id))
        }
    }

    /// Flushes all dirty pages in the buffer pool to disk.
    pub fn flush_all_pages(&self) -> Result<()> {
        let page_table = self.state.page_table.lock();

        for (&page_id, &frame_id) in page_table.iter() {
            let frame = &self.state.frames[frame_id.as_usize()];

            if frame.is_dirty() {
                let mut data = Box::new([0u8; PAGE_SIZE]);
                frame.copy_to(&mut data[..]);

                self.disk_scheduler.schedule_write_sync(page_id, data)?;
                frame.set_dirty(false);
            }
        }

        Ok(())
    }

    /// Returns the pin count for a page, or None if it is not resident.
    pub fn get_pin_count(&self, page_id: PageId) -> Option<u32> {
        let page_table = self.state.page_table.lock();

        page_table
            .get(&page_id)
            .map(|&frame_id| self.state.frames[frame_id.as_usize()].pin_count())
    }

    /// Returns the pool size.
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Returns the number of free frames.
    pub fn free_frame_count(&self) -> usize {
        self.state.free_list.lock().len()
    }

    /// Returns a reference to the underlying DiskManager.
    pub fn disk_manager(&self) -> &Arc<DiskManager> {
        self.disk_scheduler.disk_manager()
    }

    /// Builds a write guard for a page already pinned in the given frame.
    fn make_write_guard(&self, page_id: PageId, frame_id: FrameId) -> WritePageGuard {
        let frame = Arc::clone(&self.state.frames[frame_id.as_usize()]);
        let state = Arc::clone(&self.state);

        unsafe {
            WritePageGuard::new(
                page_id,
                frame,
                Box::new(move |pid, is_dirty| {
                    release_page(&state, pid, is_dirty);
                }),
            )
        }
    }

    /// Fetches a page into the buffer pool, pins it, and returns its frame ID.
    /// If the page is already in the pool, pins its current frame.
    /// Otherwise, evicts a page if necessary and reads the page from disk.
    fn fetch_page(&self, page_id: PageId) -> Result<FrameId> {
        // Check if page is already in the buffer pool
        {
            let page_table = self.state.page_table.lock();
            if let Some(&frame_id) = page_table.get(&page_id) {
                let frame = &self.state.frames[frame_id.as_usize()];
                frame.pin();
                self.state.replacer.mark_pinned(frame_id);
                return Ok(frame_id);
            }
        }

        // Need to fetch from disk - get a free frame first
        let frame_id = self.get_free_frame()?;
        let frame = &self.state.frames[frame_id.as_usize()];

        // Read the page from disk
        let data = self.disk_scheduler.schedule_read_sync(page_id)?;

        // Initialize the frame
        frame.set_page_id(page_id);
        frame.copy_from(&data[..]);
        frame.set_dirty(false);
        frame.pin();

        // Update page table
        self.state.page_table.lock().insert(page_id, frame_id);
        self.state.replacer.mark_pinned(frame_id);

        Ok(frame_id)
    }

    /// Gets a free frame, either from the free list or by evicting a page.
    fn get_free_frame(&self) -> Result<FrameId> {
        // Try to get from free list first
        {
            let mut free_list = self.state.free_list.lock();
            if let Some(frame_id) = free_list.pop_front() {
                return Ok(frame_id);
            }
        }

        // Need to evict a page
        if let Some(frame_id) = self.state.replacer.select_victim() {
            let frame = &self.state.frames[frame_id.as_usize()];
            let old_page_id = frame.page_id();

            // If the page is dirty, flush it to disk first
            if frame.is_dirty() {
                let mut data = Box::new([0u8; PAGE_SIZE]);
                frame.copy_to(&mut data[..]);
                self.disk_scheduler.schedule_write_sync(old_page_id, data)?;
            }

            // Remove from page table
            self.state.page_table.lock().remove(&old_page_id);

            // Reset the frame
            frame.reset();

            Ok(frame_id)
        } else {
            Err(DbError::BufferPoolFull)
        }
    }
}
