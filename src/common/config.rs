/// Size of a page in bytes (4 KB)
pub const PAGE_SIZE: usize = 4096;

/// Size of the fixed page header: page id (4 bytes) + LSN (4 bytes)
pub const PAGE_HEADER_SIZE: usize = 8;

/// Usable body size of a page, after the fixed header
pub const PAGE_BODY_SIZE: usize = PAGE_SIZE - PAGE_HEADER_SIZE;

/// Invalid page ID constant
pub const INVALID_PAGE_ID: PageId = PageId(u32::MAX);

/// Invalid frame ID constant
pub const INVALID_FRAME_ID: FrameId = FrameId(u32::MAX);

/// Default buffer pool size (number of frames)
pub const DEFAULT_BUFFER_POOL_SIZE: usize = 32;

/// Default B+ tree order (max keys per node before a split)
pub const DEFAULT_BTREE_ORDER: usize = 128;

/// Capacity of the disk scheduler's request queue
pub const DISK_QUEUE_DEPTH: usize = 128;

use super::types::{FrameId, PageId};
