mod config;
mod http_api;
mod routes;

pub use config::ServerConfig;
pub use routes::{build_engine, router, serve, AppState};
