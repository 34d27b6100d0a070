//! Application state - shared across all handlers.

use quill_core::services::BlogService;
use quill_infra::{DataStore, Repositories};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blogs: BlogService,
    pub store: DataStore,
    pub max_page_size: u64,
}

impl AppState {
    /// Build the application state over the store's own repositories.
    pub fn new(store: DataStore, max_page_size: u64) -> Self {
        let repositories = store.repositories();
        Self::with_repositories(store, repositories, max_page_size)
    }

    pub fn with_repositories(
        store: DataStore,
        repositories: Repositories,
        max_page_size: u64,
    ) -> Self {
        let blogs = BlogService::new(
            repositories.users,
            repositories.categories,
            repositories.blogs,
        );

        tracing::info!(
            backend = store.backend_name(),
            max_page_size,
            "Application state initialized"
        );

        Self {
            blogs,
            store,
            max_page_size,
        }
    }
}
