//! Infrastructure Layer
//!
//! Row API client and an in-memory store with the same scoping rules.

pub mod memory;
pub mod postgrest;

pub use memory::InMemoryRecords;
pub use postgrest::PostgrestRecords;
