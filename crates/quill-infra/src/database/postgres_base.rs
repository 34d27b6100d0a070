use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ConnectOptions, Database, DbConn, EntityTrait, PrimaryKeyTrait};

use quill_core::domain::ObjectId;
use quill_core::error::RepoError;
use quill_core::ports::BaseRepository;

use super::connections::{ConnectionState, DatabaseConfig, ManagedConnection};

/// PostgreSQL connection pool shared by every relational repository.
///
/// The pool is held behind an `Arc`: `DbConn` is not `Clone` when SeaORM's
/// `mock` feature is enabled.
pub struct PostgresConnection {
    config: DatabaseConfig,
    pool: ManagedConnection<Arc<DbConn>>,
}

impl PostgresConnection {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            pool: ManagedConnection::new(),
        }
    }

    /// Wrap an already open connection (e.g. a SeaORM mock).
    pub fn from_connection(config: DatabaseConfig, conn: DbConn) -> Self {
        Self {
            config,
            pool: ManagedConnection::connected(Arc::new(conn)),
        }
    }

    pub async fn db(&self) -> Result<Arc<DbConn>, RepoError> {
        self.pool.ensure_connected(|| connect(&self.config)).await
    }

    pub fn state(&self) -> ConnectionState {
        self.pool.state()
    }

    pub async fn close(&self) {
        self.pool
            .close(|conn| async move {
                match Arc::try_unwrap(conn) {
                    Ok(conn) => {
                        if let Err(e) = conn.close().await {
                            tracing::warn!(error = %e, "Error while closing PostgreSQL pool");
                        }
                    }
                    Err(_) => {
                        tracing::warn!("PostgreSQL pool still in use, dropping without close");
                    }
                }
            })
            .await;
    }
}

async fn connect(config: &DatabaseConfig) -> Result<Arc<DbConn>, RepoError> {
    let opts = ConnectOptions::new(&config.url)
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .idle_timeout(std::time::Duration::from_secs(300))
        .sqlx_logging(true)
        .to_owned();

    let conn = Database::connect(opts)
        .await
        .map_err(|e| RepoError::Connection(e.to_string()))?;
    tracing::info!(pool = config.max_connections, "PostgreSQL connected");
    Ok(Arc::new(conn))
}

/// Generic PostgreSQL repository implementation.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) conn: Arc<PostgresConnection>,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(conn: Arc<PostgresConnection>) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E, T> BaseRepository<T, ObjectId> for PostgresBaseRepository<E>
where
    E: EntityTrait,
    E::Model: Sync + Send,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<String>,
    T: TryFrom<E::Model, Error = RepoError> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<T>, RepoError> {
        let db = self.conn.db().await?;
        let result = E::find_by_id(id.to_hex())
            .one(db.as_ref())
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        result.map(T::try_from).transpose()
    }
}
