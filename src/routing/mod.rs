//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, override field/header, path)
//!     → request.rs (RouteRequest)
//!     → router.rs (pick REST or path strategy)
//!     → resolver.rs (verb → cache → segment → pattern)
//!     → Return: ResolvedRoute or NoMatch
//!
//! Route Compilation (at startup / reload):
//!     RouteSettings
//!     → Build RouteCache (frozen)
//!     → Build PatternTable (standard, optionally with configured rules)
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routers compiled at startup, immutable at runtime
//! - No regex in hot path
//! - Deterministic: same input always resolves to the same target
//! - First matching pattern wins

pub mod cache;
pub mod pattern;
pub mod request;
pub mod resolver;
pub mod router;
pub mod segment;
pub mod verb;

pub use cache::{CachedTarget, RouteCache};
pub use pattern::{Action, PatternError, PatternTable, Rule};
pub use request::RouteRequest;
pub use resolver::{ResolvedRoute, RestResolver, RouteSource};
pub use router::{PathResolver, RouteResolver, Router};
pub use segment::Segments;
pub use verb::{Verb, VerbSource};
