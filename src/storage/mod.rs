// storage/mod.rs
// Database operations module

pub mod insert;
pub mod pool;
pub mod query;
pub mod schema;
#[cfg(test)]
pub mod test_helpers;

// Re-export commonly used items
pub use insert::{HeaderTable, LoadReport};
pub use pool::{expand_tilde, Store};
pub use query::{
    check_where_clause, ColumnInfo, DatabaseDescription, JsonRow, TableDescription, UpdateResult,
};
pub use schema::ensure_schema;
