mod page;
mod table_page;

pub use page::*;
pub use table_page::*;
