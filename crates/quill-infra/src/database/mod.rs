//! Database access: Postgres repositories and in-memory fallbacks.

mod connections;
pub mod entity;
pub mod memory;
mod postgres_base;
pub mod postgres_repo;

pub use connections::{connect, DatabaseConfig};
pub use postgres_repo::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresPostRepository,
    PostgresUserRepository,
};

#[cfg(test)]
mod tests;
