//! # nextscope API
//!
//! HTTP surface over the page analyzer:
//! - `POST /api/analyze` runs one analysis and returns the result JSON
//! - `GET /health` reports liveness and version

pub mod error;
pub mod http;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use http::{
    handlers::{validate_url, AnalyzeRequest},
    routes::create_router,
};
pub use server::{ApiServer, ServerConfig};
pub use state::AppState;
