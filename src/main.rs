use std::io::{self, BufRead, Write};
use std::sync::Arc;

use minisql::buffer::BufferPoolManager;
use minisql::catalog::Catalog;
use minisql::common::DEFAULT_BUFFER_POOL_SIZE;
use minisql::execution::{parse, ExecutionEngine};
use minisql::storage::disk::DiskManager;

fn main() {
    let db_path = "mydb.data";

    let disk_manager = Arc::new(DiskManager::new(db_path).expect("Failed to open database file"));
    let bpm = Arc::new(BufferPoolManager::new(
        DEFAULT_BUFFER_POOL_SIZE,
        disk_manager,
    ));
    let mut engine = ExecutionEngine::new(Catalog::new(Arc::clone(&bpm)));

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    print!("Mini-SQL> ");
    stdout.flush().expect("Failed to flush stdout");

    for line in stdin.lock().lines() {
        let line = line.expect("Failed to read input");

        match parse(&line) {
            Some(statement) => match engine.execute(statement) {
                Ok(result) => {
                    if !result.is_empty() {
                        println!("{}", result);
                    }
                }
                Err(e) => println!("Error: {}", e),
            },
            None => println!("parse error"),
        }

        print!("Mini-SQL> ");
        stdout.flush().expect("Failed to flush stdout");
    }

    bpm.flush_all_pages().expect("Failed to flush pages");
}
