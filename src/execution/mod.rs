mod executor;
mod parser;
mod statement;

pub use executor::ExecutionEngine;
pub use parser::parse;
pub use statement::Statement;
