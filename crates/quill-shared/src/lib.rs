//! # Quill Shared
//!
//! Request/response types shared between the Quill backend and any client.
//! In a full-stack Rust setup, this crate is compiled for both server and WASM.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
