//! MiniSQL - a single-node, on-disk relational storage engine in Rust
//!
//! This crate provides the core components for a small disk-oriented database:
//! fixed-size pages cached in a bounded buffer pool, a slotted heap-file format
//! for tuples, a B+ tree index mapping integer keys to row locators, and a
//! catalog binding table names to their schema, heap, and index.
//!
//! # Architecture
//!
//! The system is organized into layers, leaf-first:
//!
//! - **Storage Layer** (`storage`): Disk I/O and page organization
//!   - `DiskManager`: Reads and writes pages to/from a single backing file
//!   - `DiskScheduler`: Background disk I/O scheduling over a request queue
//!   - `Page`/`TablePage`: Fixed-size page with a slotted tuple directory
//!   - `TableHeap`: Tuple storage addressed by RID
//!
//! - **Buffer Pool** (`buffer`): Memory management for database pages
//!   - `BufferPoolManager`: Fetches pages from disk and caches them in memory
//!   - `LruReplacer`: Least-recently-used page replacement policy
//!   - `FrameHeader`: Per-frame metadata and data storage
//!   - `ReadPageGuard`/`WritePageGuard`: RAII guards for page access
//!
//! - **Tuple Codec** (`tuple`): Fixed-width binary encoding between typed
//!   column values and raw payloads, driven by a `Schema`
//!
//! - **Index** (`index`): B+ tree keyed by `i32`, with `RidIndex` mapping
//!   keys to row locators
//!
//! - **Catalog** (`catalog`): Registry of tables and their per-table state
//!
//! - **Execution** (`execution`): Text command parsing and dispatch
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use minisql::buffer::BufferPoolManager;
//! use minisql::catalog::Catalog;
//! use minisql::execution::{parse, ExecutionEngine};
//! use minisql::storage::disk::DiskManager;
//!
//! // Open (or create) a database file
//! let disk_manager = Arc::new(DiskManager::new("test.db").unwrap());
//!
//! // Create a buffer pool with 32 frames
//! let bpm = Arc::new(BufferPoolManager::new(32, disk_manager));
//!
//! // Wire up the catalog and execution engine
//! let mut engine = ExecutionEngine::new(Catalog::new(bpm));
//!
//! let stmt = parse("CREATE TABLE users (id int, name char(8))").unwrap();
//! assert_eq!(engine.execute(stmt).unwrap(), "Table created");
//!
//! let stmt = parse("INSERT INTO users VALUES (1, 'alice')").unwrap();
//! assert_eq!(engine.execute(stmt).unwrap(), "Inserted");
//!
//! let stmt = parse("SELECT * FROM users WHERE id = 1").unwrap();
//! assert_eq!(engine.execute(stmt).unwrap(), "1 alice");
//! ```

pub mod buffer;
pub mod catalog;
pub mod common;
pub mod execution;
pub mod index;
pub mod storage;
pub mod tuple;

// Re-export commonly used types at the crate root
pub use common::{DbError, PageId, Result, Rid, SlotId};
