//! Backend selection and lifecycle for the configured data store.

use std::sync::Arc;

use quill_core::error::RepoError;
use quill_core::ports::{BlogRepository, CategoryRepository, UserRepository};

use super::connections::{Backend, DatabaseConfig};
use super::memory::InMemoryStore;

#[cfg(feature = "mongodb")]
use super::mongo_base::MongoConnection;
#[cfg(feature = "mongodb")]
use super::mongo_repo::{
    BLOGS, CATEGORIES, MongoBlogRepository, MongoCategoryRepository, MongoUserRepository, USERS,
};

#[cfg(feature = "postgres")]
use super::postgres_base::PostgresConnection;
#[cfg(feature = "postgres")]
use super::postgres_repo::{
    PostgresBlogRepository, PostgresCategoryRepository, PostgresUserRepository,
};

/// Repository handles for one backend.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub blogs: Arc<dyn BlogRepository>,
}

/// The configured backend and its connection.
#[derive(Clone)]
pub enum DataStore {
    InMemory(Arc<InMemoryStore>),
    #[cfg(feature = "mongodb")]
    Mongo(Arc<MongoConnection>),
    #[cfg(feature = "postgres")]
    Postgres(Arc<PostgresConnection>),
}

impl DataStore {
    /// Pick a backend from the database URL scheme. Without a configuration the
    /// in-memory store is used. No connection is opened here.
    pub fn from_config(config: Option<&DatabaseConfig>) -> Result<Self, RepoError> {
        let Some(config) = config else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Ok(Self::InMemory(Arc::new(InMemoryStore::new())));
        };

        match config.backend() {
            Some(Backend::Mongo) => Self::mongo(config),
            Some(Backend::Postgres) => Self::postgres(config),
            None => Err(RepoError::Connection(
                "unsupported database URL scheme".to_string(),
            )),
        }
    }

    #[cfg(feature = "mongodb")]
    fn mongo(config: &DatabaseConfig) -> Result<Self, RepoError> {
        Ok(Self::Mongo(Arc::new(MongoConnection::new(config.clone()))))
    }

    #[cfg(not(feature = "mongodb"))]
    fn mongo(_config: &DatabaseConfig) -> Result<Self, RepoError> {
        Err(RepoError::Connection(
            "MongoDB support is not compiled in".to_string(),
        ))
    }

    #[cfg(feature = "postgres")]
    fn postgres(config: &DatabaseConfig) -> Result<Self, RepoError> {
        Ok(Self::Postgres(Arc::new(PostgresConnection::new(
            config.clone(),
        ))))
    }

    #[cfg(not(feature = "postgres"))]
    fn postgres(_config: &DatabaseConfig) -> Result<Self, RepoError> {
        Err(RepoError::Connection(
            "PostgreSQL support is not compiled in".to_string(),
        ))
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::InMemory(_) => "in-memory",
            #[cfg(feature = "mongodb")]
            Self::Mongo(_) => "mongodb",
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => "postgres",
        }
    }

    /// Connection state label; the in-memory store is always available.
    pub fn state(&self) -> &'static str {
        match self {
            Self::InMemory(_) => "in-memory",
            #[cfg(feature = "mongodb")]
            Self::Mongo(conn) => conn.state().as_str(),
            #[cfg(feature = "postgres")]
            Self::Postgres(conn) => conn.state().as_str(),
        }
    }

    /// Open the connection if it is not open yet. Safe to call repeatedly.
    pub async fn ensure_connected(&self) -> Result<(), RepoError> {
        match self {
            Self::InMemory(_) => Ok(()),
            #[cfg(feature = "mongodb")]
            Self::Mongo(conn) => conn.database().await.map(|_| ()),
            #[cfg(feature = "postgres")]
            Self::Postgres(conn) => conn.db().await.map(|_| ()),
        }
    }

    pub fn repositories(&self) -> Repositories {
        match self {
            Self::InMemory(store) => Repositories {
                users: store.clone(),
                categories: store.clone(),
                blogs: store.clone(),
            },
            #[cfg(feature = "mongodb")]
            Self::Mongo(conn) => Repositories {
                users: Arc::new(MongoUserRepository::new(conn.clone(), USERS)),
                categories: Arc::new(MongoCategoryRepository::new(conn.clone(), CATEGORIES)),
                blogs: Arc::new(MongoBlogRepository::new(conn.clone(), BLOGS)),
            },
            #[cfg(feature = "postgres")]
            Self::Postgres(conn) => Repositories {
                users: Arc::new(PostgresUserRepository::new(conn.clone())),
                categories: Arc::new(PostgresCategoryRepository::new(conn.clone())),
                blogs: Arc::new(PostgresBlogRepository::new(conn.clone())),
            },
        }
    }

    pub async fn close(&self) {
        match self {
            Self::InMemory(_) => {}
            #[cfg(feature = "mongodb")]
            Self::Mongo(conn) => conn.close().await,
            #[cfg(feature = "postgres")]
            Self::Postgres(conn) => conn.close().await,
        }
    }
}
