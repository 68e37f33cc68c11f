//! REST route resolution.
//!
//! Turns an HTTP request (method, override field/header, path) into a
//! controller name and method name following REST conventions.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{ResolvedRoute, RestResolver, RouteRequest, Router};
