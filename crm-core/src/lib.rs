//! crm-core: Shared infrastructure for the mini-crm workspace.
pub mod error;
pub mod middleware;
pub mod observability;

pub use axum;
pub use tracing;
