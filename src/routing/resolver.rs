//! REST resolution of requests into controller/method targets.
//!
//! # Data Flow
//! ```text
//! RouteRequest
//!     → trim one trailing slash
//!     → VerbSource::extract (effective verb)
//!     → RouteCache hit?  → (controller, method) as stored, verb ignored
//!     → segment()        → controller + tail
//!     → PatternTable     → action
//!     → ResolvedRoute
//! ```
//!
//! Resolution is total: every request yields a target. Unknown
//! controllers are the dispatcher's problem.

use std::sync::Arc;

use serde::Serialize;

use crate::observability::metrics;
use crate::routing::cache::RouteCache;
use crate::routing::pattern::{Action, PatternTable};
use crate::routing::request::RouteRequest;
use crate::routing::segment::{segment, trim_trailing_slash, DEFAULT_SEPARATOR};
use crate::routing::verb::{Verb, VerbSource};

/// Which stage produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteSource {
    Cache,
    Pattern,
    Path,
}

impl RouteSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteSource::Cache => "cache",
            RouteSource::Pattern => "pattern",
            RouteSource::Path => "path",
        }
    }
}

/// Handler identity a request resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRoute {
    /// Namespace-style controller name; empty means the default controller.
    #[serde(rename = "controller")]
    pub controller_name: String,
    #[serde(rename = "method")]
    pub method_name: String,
    /// Effective verb of the request.
    #[serde(serialize_with = "serialize_verb")]
    pub verb: Verb,
    /// Trailing identifier for item actions.
    pub identifier: Option<String>,
    pub source: RouteSource,
}

fn serialize_verb<S: serde::Serializer>(verb: &Verb, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(verb.as_str())
}

impl ResolvedRoute {
    pub fn is_get(&self) -> bool {
        self.verb.is_get()
    }

    pub fn is_options(&self) -> bool {
        self.verb.is_options()
    }

    pub fn is_head(&self) -> bool {
        self.verb.is_head()
    }

    pub fn is_post(&self) -> bool {
        self.verb.is_post()
    }

    pub fn is_delete(&self) -> bool {
        self.verb.is_delete()
    }

    pub fn is_put(&self) -> bool {
        self.verb.is_put()
    }

    pub fn is_patch(&self) -> bool {
        self.verb.is_patch()
    }
}

/// Resolves requests using verb overrides, the route cache and the pattern table.
#[derive(Debug, Clone)]
pub struct RestResolver {
    verbs: VerbSource,
    patterns: PatternTable,
    cache: Arc<RouteCache>,
    separator: String,
}

impl RestResolver {
    pub fn new(verbs: VerbSource, patterns: PatternTable, cache: Arc<RouteCache>) -> Self {
        Self {
            verbs,
            patterns,
            cache,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn resolve(&self, request: &RouteRequest) -> ResolvedRoute {
        let path = trim_trailing_slash(&request.path);
        let verb = self.verbs.extract(request);

        if let Some(target) = self.cache.get(path) {
            tracing::trace!(path = %path, verb = %verb, "Route cache hit");
            metrics::record_resolution(RouteSource::Cache.as_str());
            return ResolvedRoute {
                controller_name: target.controller.clone(),
                method_name: target.method.clone(),
                verb,
                identifier: None,
                source: RouteSource::Cache,
            };
        }

        let segments = segment(path, &self.separator);
        let has_identifier = segments.has_identifier();
        let action = self.patterns.lookup(&verb, has_identifier);

        // The identifier is handed on as sent, without capitalization.
        let identifier = (has_identifier && (action.is_item() || action == Action::Options))
            .then(|| path.rsplit('/').next().unwrap_or_default().to_string());

        tracing::trace!(
            path = %path,
            verb = %verb,
            controller = %segments.controller,
            action = %action,
            "Route resolved by pattern"
        );
        metrics::record_resolution(RouteSource::Pattern.as_str());

        ResolvedRoute {
            controller_name: segments.controller,
            method_name: action.as_str().to_string(),
            verb,
            identifier,
            source: RouteSource::Pattern,
        }
    }
}

impl Default for RestResolver {
    fn default() -> Self {
        Self::new(
            VerbSource::default(),
            PatternTable::standard(),
            Arc::new(RouteCache::default()),
        )
    }
}
