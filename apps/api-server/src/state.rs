//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::listing::ListingConfig;
use quill_core::ports::{CategoryRepository, CommentRepository, PostRepository, UserRepository};
use quill_infra::database::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresPostRepository,
    PostgresUserRepository,
};
use quill_infra::{
    InMemoryCategoryRepository, InMemoryCommentRepository, InMemoryPostRepository,
    InMemoryUserRepository, MemoryStore,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub listing: ListingConfig,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let listing = ListingConfig {
            page_size: config.page_size,
        };

        if let Some(db_config) = &config.database {
            match quill_infra::connect(db_config).await {
                Ok(conn) => {
                    let conn = Arc::new(conn);
                    tracing::info!("Application state initialized (postgres)");
                    return Self {
                        users: Arc::new(PostgresUserRepository::new(conn.clone())),
                        categories: Arc::new(PostgresCategoryRepository::new(conn.clone())),
                        posts: Arc::new(PostgresPostRepository::new(conn.clone())),
                        comments: Arc::new(PostgresCommentRepository::new(conn)),
                        listing,
                    };
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }

        Self::in_memory(listing)
    }

    /// In-memory state, used without a database and by tests.
    pub fn in_memory(listing: ListingConfig) -> Self {
        let store = MemoryStore::new();

        Self {
            users: Arc::new(InMemoryUserRepository::new(store.clone())),
            categories: Arc::new(InMemoryCategoryRepository::new(store.clone())),
            posts: Arc::new(InMemoryPostRepository::new(store.clone())),
            comments: Arc::new(InMemoryCommentRepository::new(store)),
            listing,
        }
    }
}
