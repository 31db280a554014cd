use thiserror::Error;

use super::types::PageId;

/// Database error types
#[derive(Error, Debug)]
pub enum DbError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("page body access out of bounds: offset {offset}, len {len}")]
    OutOfBounds { offset: usize, len: usize },

    #[error("buffer pool is full, no evictable frames available")]
    BufferPoolFull,

    #[error("page {0} is not resident in the buffer pool")]
    PageNotResident(PageId),

    #[error("invalid page ID: {0}")]
    InvalidPageId(PageId),

    #[error("disk scheduler error: {0}")]
    Scheduler(String),

    #[error("page overflow: tuple size {tuple_size} exceeds available space {available}")]
    PageOverflow { tuple_size: usize, available: usize },

    #[error("invalid slot ID: {0}")]
    InvalidSlotId(u16),

    #[error("slot {0} is empty")]
    EmptySlot(u16),

    #[error("expected {expected} values, got {got}")]
    ColumnCountMismatch { expected: usize, got: usize },

    #[error("invalid literal: '{0}'")]
    InvalidLiteral(String),

    #[error("truncated payload: expected {expected} bytes, got {got}")]
    TruncatedPayload { expected: usize, got: usize },

    #[error("table '{0}' already exists")]
    TableAlreadyExists(String),

    #[error("table '{0}' not found")]
    TableNotFound(String),

    #[error("duplicate key: {0}")]
    DuplicateKey(i32),
}

pub type Result<T> = std::result::Result<T, DbError>;
