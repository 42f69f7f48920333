//! API module
//!
//! HTTP API endpoints, middleware and shared state.

pub mod middleware;
pub mod proxy;
pub mod routes;
mod state;

pub use routes::{create_public_router, create_router};
pub use state::AppState;
