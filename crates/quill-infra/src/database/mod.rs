//! Database connection management and repository implementations.

mod connections;
mod memory;
mod store;

#[cfg(feature = "mongodb")]
mod mongo_base;
#[cfg(feature = "mongodb")]
mod mongo_filter;
#[cfg(feature = "mongodb")]
pub mod mongo_repo;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

pub use connections::{Backend, ConnectionState, DatabaseConfig, ManagedConnection};
pub use memory::InMemoryStore;
pub use store::{DataStore, Repositories};

#[cfg(feature = "mongodb")]
pub use mongo_base::MongoConnection;
#[cfg(feature = "mongodb")]
pub use mongo_repo::{MongoBlogRepository, MongoCategoryRepository, MongoUserRepository};

#[cfg(feature = "postgres")]
pub use postgres_base::PostgresConnection;
#[cfg(feature = "postgres")]
pub use postgres_repo::{PostgresBlogRepository, PostgresCategoryRepository, PostgresUserRepository};
