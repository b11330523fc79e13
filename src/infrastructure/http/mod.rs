//! HTTP Layer - RESTful API

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiJson, ApiPath};
pub use routes::create_routes;
pub use server::{build_router, HttpServer, ServerConfig, UPLOADS_ROUTE};
pub use state::AppState;
