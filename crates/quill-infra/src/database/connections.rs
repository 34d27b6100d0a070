use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;

/// Configuration for the backing database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Database name for document stores. Relational URLs carry their own.
    pub database_name: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database_name: "quill".to_string(),
            max_connections: 100,
            min_connections: 10,
            connect_timeout: Duration::from_secs(10),
        }
    }

    pub fn backend(&self) -> Option<Backend> {
        Backend::detect(&self.url)
    }
}

/// Store backends selectable by URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Mongo,
    Postgres,
}

impl Backend {
    pub fn detect(url: &str) -> Option<Self> {
        let scheme = url.split_once("://")?.0.to_ascii_lowercase();
        match scheme.as_str() {
            "mongodb" | "mongodb+srv" => Some(Self::Mongo),
            "postgres" | "postgresql" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Readiness of a managed connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    Disconnected = 0,
    Connected = 1,
    Connecting = 2,
    Disconnecting = 3,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connected => "connected",
            Self::Connecting => "connecting",
            Self::Disconnecting => "disconnecting",
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Connected,
            2 => Self::Connecting,
            3 => Self::Disconnecting,
            _ => Self::Disconnected,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lazily established, shareable connection handle.
///
/// [`ensure_connected`](Self::ensure_connected) may be called on every request:
/// it hands out the existing handle once connected, waits on an attempt that is
/// already in flight, and retries after a failed attempt.
pub struct ManagedConnection<C> {
    handle: RwLock<Option<C>>,
    state: AtomicU8,
}

impl<C: Clone> ManagedConnection<C> {
    pub fn new() -> Self {
        Self {
            handle: RwLock::new(None),
            state: AtomicU8::new(ConnectionState::Disconnected as u8),
        }
    }

    /// Wrap a handle that is already open.
    pub fn connected(handle: C) -> Self {
        Self {
            handle: RwLock::new(Some(handle)),
            state: AtomicU8::new(ConnectionState::Connected as u8),
        }
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.store(state as u8, Ordering::Release);
    }

    pub async fn ensure_connected<F, Fut, E>(&self, connect: F) -> Result<C, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<C, E>>,
        E: fmt::Display,
    {
        if let Some(handle) = self.handle.read().await.as_ref() {
            tracing::trace!("Already connected");
            return Ok(handle.clone());
        }

        if self.state() == ConnectionState::Connecting {
            tracing::debug!("Connecting");
        }

        let mut slot = self.handle.write().await;
        if let Some(handle) = slot.as_ref() {
            return Ok(handle.clone());
        }

        self.set_state(ConnectionState::Connecting);
        tracing::info!("Connecting to database");

        match connect().await {
            Ok(handle) => {
                *slot = Some(handle.clone());
                self.set_state(ConnectionState::Connected);
                tracing::info!("Connected to database");
                Ok(handle)
            }
            Err(e) => {
                self.set_state(ConnectionState::Disconnected);
                tracing::error!(error = %e, "Database connection failed");
                Err(e)
            }
        }
    }

    /// Release the handle, passing it to `shutdown`. A no-op when disconnected.
    pub async fn close<F, Fut>(&self, shutdown: F)
    where
        F: FnOnce(C) -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut slot = self.handle.write().await;
        if let Some(handle) = slot.take() {
            self.set_state(ConnectionState::Disconnecting);
            shutdown(handle).await;
            tracing::info!("Database connection closed");
        }
        self.set_state(ConnectionState::Disconnected);
    }
}

impl<C: Clone> Default for ManagedConnection<C> {
    fn default() -> Self {
        Self::new()
    }
}
