use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use serde::de::DeserializeOwned;

use quill_core::domain::ObjectId;
use quill_core::error::RepoError;
use quill_core::ports::BaseRepository;

use super::connections::{ConnectionState, DatabaseConfig, ManagedConnection};

/// MongoDB client shared by every document repository.
pub struct MongoConnection {
    config: DatabaseConfig,
    client: ManagedConnection<Client>,
}

impl MongoConnection {
    /// Nothing is dialed until the first [`database`](Self::database) call.
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            client: ManagedConnection::new(),
        }
    }

    /// The configured database, connecting first if needed.
    pub async fn database(&self) -> Result<Database, RepoError> {
        let client = self
            .client
            .ensure_connected(|| connect(&self.config))
            .await?;
        Ok(client.database(&self.config.database_name))
    }

    pub fn state(&self) -> ConnectionState {
        self.client.state()
    }

    pub async fn close(&self) {
        self.client
            .close(|client| async move { client.shutdown().await })
            .await;
    }
}

async fn connect(config: &DatabaseConfig) -> Result<Client, RepoError> {
    let mut options = ClientOptions::parse(&config.url)
        .await
        .map_err(|e| RepoError::Connection(e.to_string()))?;
    options.max_pool_size = Some(config.max_connections);
    options.min_pool_size = Some(config.min_connections);
    options.connect_timeout = Some(config.connect_timeout);
    options.server_selection_timeout = Some(config.connect_timeout);

    let client =
        Client::with_options(options).map_err(|e| RepoError::Connection(e.to_string()))?;

    client
        .database(&config.database_name)
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| RepoError::Connection(e.to_string()))?;

    tracing::info!(
        database = %config.database_name,
        pool = config.max_connections,
        "MongoDB reachable"
    );
    Ok(client)
}

/// Generic MongoDB repository over one collection of `D` documents.
pub struct MongoBaseRepository<D> {
    pub(crate) conn: Arc<MongoConnection>,
    collection: &'static str,
    _document: PhantomData<D>,
}

impl<D> MongoBaseRepository<D>
where
    D: Send + Sync,
{
    pub fn new(conn: Arc<MongoConnection>, collection: &'static str) -> Self {
        Self {
            conn,
            collection,
            _document: PhantomData,
        }
    }

    pub(crate) async fn collection(&self) -> Result<Collection<D>, RepoError> {
        Ok(self.conn.database().await?.collection::<D>(self.collection))
    }
}

#[async_trait]
impl<D, T> BaseRepository<T, ObjectId> for MongoBaseRepository<D>
where
    D: DeserializeOwned + Send + Sync + Unpin + 'static,
    T: From<D> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<T>, RepoError> {
        let found = self
            .collection()
            .await?
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(found.map(Into::into))
    }
}
