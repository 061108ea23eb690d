// HTTP server setup (Axum + callable/trigger routes)
pub mod app;
pub mod middleware;
pub mod routes;

pub use app::*;
