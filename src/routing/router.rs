//! Route lookup and strategy composition.
//!
//! # Responsibilities
//! - Hold the optional REST strategy next to the generic path strategy
//! - Pick the strategy for a request by path prefix
//! - Return a resolution or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Reloads build a new Router and swap it in whole
//! - REST resolution never fails; only the path strategy can return None

use std::path::Path;
use std::sync::Arc;

use crate::config::schema::RouteConfig;
use crate::config::validation::ValidationError;
use crate::config::ConfigError;
use crate::observability::metrics;
use crate::routing::cache::RouteCache;
use crate::routing::pattern::{PatternTable, Rule};
use crate::routing::request::RouteRequest;
use crate::routing::resolver::{ResolvedRoute, RestResolver, RouteSource};
use crate::routing::segment::{segment, trim_trailing_slash, DEFAULT_SEPARATOR};
use crate::routing::verb::VerbSource;

/// A strategy turning a request into a handler identity.
pub trait RouteResolver: Send + Sync + std::fmt::Debug {
    /// Returns the resolution, or None if this strategy cannot route the request.
    fn resolve(&self, request: &RouteRequest) -> Option<ResolvedRoute>;
}

impl RouteResolver for RestResolver {
    fn resolve(&self, request: &RouteRequest) -> Option<ResolvedRoute> {
        Some(RestResolver::resolve(self, request))
    }
}

/// Generic strategy: the last path segment names the method.
#[derive(Debug, Clone)]
pub struct PathResolver {
    verbs: VerbSource,
    cache: Arc<RouteCache>,
    separator: String,
}

impl PathResolver {
    pub fn new(verbs: VerbSource, cache: Arc<RouteCache>) -> Self {
        Self {
            verbs,
            cache,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new(VerbSource::default(), Arc::new(RouteCache::default()))
    }
}

impl RouteResolver for PathResolver {
    fn resolve(&self, request: &RouteRequest) -> Option<ResolvedRoute> {
        let path = trim_trailing_slash(&request.path);
        let verb = self.verbs.extract(request);

        if let Some(target) = self.cache.get(path) {
            metrics::record_resolution(RouteSource::Cache.as_str());
            return Some(ResolvedRoute {
                controller_name: target.controller.clone(),
                method_name: target.method.clone(),
                verb,
                identifier: None,
                source: RouteSource::Cache,
            });
        }

        if path.is_empty() {
            return None;
        }

        let segments = segment(path, &self.separator);
        metrics::record_resolution(RouteSource::Path.as_str());
        Some(ResolvedRoute {
            controller_name: segments.controller,
            method_name: segments.tail,
            verb,
            identifier: None,
            source: RouteSource::Path,
        })
    }
}

/// Composes the REST strategy with the generic fallback.
#[derive(Debug)]
pub struct Router {
    rest: Option<RestResolver>,
    rest_prefixes: Vec<String>,
    fallback: PathResolver,
}

impl Router {
    pub fn new(fallback: PathResolver) -> Self {
        Self {
            rest: None,
            rest_prefixes: Vec::new(),
            fallback,
        }
    }

    /// Compile a router from `[route]` configuration.
    pub fn from_config(config: &RouteConfig) -> Result<Self, ConfigError> {
        let mut builder = RouteCache::builder();
        if let Some(file) = &config.cache_file {
            let loaded = RouteCache::load_from_file(Path::new(file)).map_err(|source| {
                ConfigError::CacheFile {
                    path: file.clone(),
                    source,
                }
            })?;
            builder = builder.extend(&loaded);
        }
        // Inline entries override the cache file.
        for (path, (controller, method)) in &config.cache {
            builder = builder.insert(path, controller.clone(), method.clone());
        }
        let cache = Arc::new(builder.build());
        metrics::record_cache_size(cache.len());

        let rest = &config.rest;
        let verbs = VerbSource::new(&rest.method_param, &rest.override_header);
        let fallback = PathResolver::new(verbs.clone(), cache.clone())
            .with_separator(&config.namespace_separator);
        let mut router = Router::new(fallback);

        if rest.enabled {
            let patterns = if rest.apply_rules {
                let mut rules = Vec::with_capacity(rest.rules.len());
                for (index, rule) in rest.rules.iter().enumerate() {
                    let parsed = Rule::parse(&rule.pattern, &rule.action).map_err(|source| {
                        ConfigError::Validation(vec![ValidationError::InvalidRule { index, source }])
                    })?;
                    rules.push(parsed);
                }
                PatternTable::with_overrides(rules)
            } else {
                if !rest.rules.is_empty() {
                    tracing::warn!(
                        rules = rest.rules.len(),
                        "route.rest.rules present but apply_rules is off; using the standard table"
                    );
                }
                PatternTable::standard()
            };

            let resolver = RestResolver::new(verbs, patterns, cache.clone())
                .with_separator(&config.namespace_separator);
            router = router.with_rest(resolver, rest.prefixes.clone());
        }

        tracing::info!(
            rest_enabled = rest.enabled,
            cached_paths = cache.len(),
            custom_rules = rest.apply_rules && !rest.rules.is_empty(),
            "Router compiled"
        );
        Ok(router)
    }

    /// Enable REST resolution for paths under `prefixes` (empty = all paths).
    pub fn with_rest(mut self, rest: RestResolver, prefixes: Vec<String>) -> Self {
        self.rest = Some(rest);
        self.rest_prefixes = prefixes;
        self
    }

    pub fn rest(&self) -> Option<&RestResolver> {
        self.rest.as_ref()
    }

    /// Override names shared by both strategies.
    pub fn verb_source(&self) -> &VerbSource {
        &self.fallback.verbs
    }

    /// Prefixes match whole path segments: `/api` covers `/api/users` but not `/apiary`.
    fn rest_applies(&self, path: &str) -> bool {
        self.rest_prefixes.is_empty()
            || self.rest_prefixes.iter().any(|prefix| {
                let prefix = prefix.trim_end_matches('/');
                path.strip_prefix(prefix)
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
            })
    }

    /// Resolve a request; None only when neither strategy can route it.
    pub fn match_request(&self, request: &RouteRequest) -> Option<ResolvedRoute> {
        match &self.rest {
            Some(rest) if self.rest_applies(&request.path) => Some(rest.resolve(request)),
            _ => self.fallback.resolve(request),
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(PathResolver::default())
    }
}

impl RouteResolver for Router {
    fn resolve(&self, request: &RouteRequest) -> Option<ResolvedRoute> {
        self.match_request(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RuleConfig;

    #[test]
    fn test_path_resolver_uses_tail_as_method() {
        let route = PathResolver::default()
            .resolve(&RouteRequest::new("/user/profile/edit/"))
            .unwrap();
        assert_eq!(route.controller_name, "User\\Profile");
        assert_eq!(route.method_name, "Edit");
        assert_eq!(route.source, RouteSource::Path);
    }

    #[test]
    fn test_path_resolver_empty_path_is_no_match() {
        assert!(PathResolver::default().resolve(&RouteRequest::new("/")).is_none());
    }

    #[test]
    fn test_path_resolver_cache() {
        let cache = Arc::new(RouteCache::builder().insert("", "Home", "index").build());
        let route = PathResolver::new(VerbSource::default(), cache)
            .resolve(&RouteRequest::new("/"))
            .unwrap();
        assert_eq!(route.controller_name, "Home");
        assert_eq!(route.source, RouteSource::Cache);
    }

    #[test]
    fn test_router_without_rest_uses_fallback() {
        let router = Router::default();
        let route = router.match_request(&RouteRequest::new("/users/1")).unwrap();
        assert_eq!(route.method_name, "1");
        assert!(router.rest().is_none());
    }

    #[test]
    fn test_router_rest_for_all_paths() {
        let router = Router::default().with_rest(RestResolver::default(), Vec::new());
        let route = router
            .match_request(&RouteRequest::new("/users/1").with_declared_method("DELETE"))
            .unwrap();
        assert_eq!(route.method_name, "delete");
        assert_eq!(route.source, RouteSource::Pattern);

        // REST is total, so even the root resolves.
        let route = router.match_request(&RouteRequest::new("/")).unwrap();
        assert_eq!(route.method_name, "index");
    }

    #[test]
    fn test_router_rest_prefixes() {
        let router = Router::default().with_rest(RestResolver::default(), vec!["/api".into()]);

        let route = router
            .match_request(&RouteRequest::new("/api/users/4").with_declared_method("GET"))
            .unwrap();
        assert_eq!(route.controller_name, "Api\\Users");
        assert_eq!(route.method_name, "view");
        assert_eq!(route.identifier.as_deref(), Some("4"));

        let route = router
            .match_request(&RouteRequest::new("/site/about").with_declared_method("POST"))
            .unwrap();
        assert_eq!(route.controller_name, "Site");
        assert_eq!(route.method_name, "About");
        assert_eq!(route.source, RouteSource::Path);

        let route = router.match_request(&RouteRequest::new("/apiary/hives")).unwrap();
        assert_eq!(route.controller_name, "Apiary");
        assert_eq!(route.method_name, "Hives");
        assert_eq!(route.source, RouteSource::Path);

        let route = router.match_request(&RouteRequest::new("/api")).unwrap();
        assert_eq!(route.source, RouteSource::Pattern);
        assert_eq!(route.method_name, "index");
    }

    #[test]
    fn test_from_config_defaults() {
        let router = Router::from_config(&RouteConfig::default()).unwrap();
        assert!(router.rest().is_some());
        let route = router
            .match_request(&RouteRequest::new("/users/2").with_form_method("patch"))
            .unwrap();
        assert_eq!(route.method_name, "update");
    }

    #[test]
    fn test_from_config_cache_and_rules() {
        let mut config = RouteConfig::default();
        config
            .cache
            .insert("/login/".into(), ("Auth".into(), "login".into()));
        config.rest.rules.push(RuleConfig {
            pattern: "POST {id}".into(),
            action: "update".into(),
        });

        // Rules are ignored until apply_rules is set.
        let router = Router::from_config(&config).unwrap();
        let req = RouteRequest::new("/users/2").with_declared_method("POST");
        assert_eq!(router.match_request(&req).unwrap().method_name, "options");
        let login = router.match_request(&RouteRequest::new("/login")).unwrap();
        assert_eq!(login.controller_name, "Auth");
        assert_eq!(login.source, RouteSource::Cache);

        config.rest.apply_rules = true;
        let router = Router::from_config(&config).unwrap();
        assert_eq!(router.match_request(&req).unwrap().method_name, "update");
    }

    #[test]
    fn test_from_config_rest_disabled() {
        let mut config = RouteConfig::default();
        config.rest.enabled = false;
        config.namespace_separator = "::".into();
        let router = Router::from_config(&config).unwrap();
        assert!(router.rest().is_none());
        let route = router.match_request(&RouteRequest::new("/a/b/c")).unwrap();
        assert_eq!(route.controller_name, "A::B");
        assert_eq!(route.method_name, "C");
    }

    #[test]
    fn test_from_config_missing_cache_file() {
        let mut config = RouteConfig::default();
        config.cache_file = Some("/no/such/cache.json".into());
        assert!(matches!(
            Router::from_config(&config),
            Err(ConfigError::CacheFile { .. })
        ));
    }

    #[test]
    fn test_router_as_trait_object() {
        let strategy: Box<dyn RouteResolver> =
            Box::new(Router::default().with_rest(RestResolver::default(), Vec::new()));
        let route = strategy.resolve(&RouteRequest::new("/users")).unwrap();
        assert_eq!(route.method_name, "index");
    }
}
