pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager, Stores};
pub use repository::{EntryFilter, Record, Repository};
