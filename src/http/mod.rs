//! HTTP integration subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, timeout + trace layers)
//!     → middleware.rs (peek override field, build RouteRequest,
//!                      resolve, attach ResolvedRoute to extensions)
//!     → handler (reports the resolution; a real dispatcher would
//!                invoke controller/method here)
//! ```

pub mod middleware;
pub mod server;

pub use middleware::resolve_route;
pub use server::{AppState, HttpServer};
