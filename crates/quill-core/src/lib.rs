//! # Quill Core
//!
//! The domain layer of the Quill blogging platform.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, the content visibility rules, the ownership guard, the listing
//! composition, and the ports that infrastructure must implement.

pub mod domain;
pub mod error;
pub mod guard;
pub mod listing;
pub mod ports;
pub mod visibility;

pub use error::DomainError;
