//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! SeaORM/Postgres repositories, in-memory repositories for database-less
//! operation and tests, and the JWT/Argon2 authentication services.

pub mod auth;
pub mod database;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::memory::{
    InMemoryCategoryRepository, InMemoryCommentRepository, InMemoryPostRepository,
    InMemoryUserRepository, MemoryStore,
};
pub use database::{connect, DatabaseConfig};
