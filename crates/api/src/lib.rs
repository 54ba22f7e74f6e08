//! HTTP API layer for faved.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: favorite and list actions, target link data, dashboard
//! - **Extractors**: authentication
//! - **Middleware**: bearer-token auth
//! - **Response**: the `{success, data, notices}` envelope and the
//!   redirect transport for traditional form submissions
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
