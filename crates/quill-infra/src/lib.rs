//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All backends enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `mongodb` - MongoDB document store
//! - `postgres` - PostgreSQL database support via SeaORM

pub mod database;

pub use database::{DataStore, DatabaseConfig, InMemoryStore, Repositories};
