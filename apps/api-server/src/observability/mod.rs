//! Observability - request IDs for log correlation.

mod request_id;

pub use request_id::RequestIdMiddleware;
