pub mod disk;
pub mod page;
mod table_heap;

pub use table_heap::TableHeap;
