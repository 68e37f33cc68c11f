//! Pre-resolved path lookups.
//!
//! The cache is filled once at bootstrap (from config or a JSON file) and
//! frozen. A hit is authoritative: it bypasses verb and pattern matching.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::routing::segment::trim_trailing_slash;

/// Target stored for a cached path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedTarget {
    pub controller: String,
    pub method: String,
}

impl CachedTarget {
    pub fn new(controller: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            method: method.into(),
        }
    }
}

/// Immutable path → target map. Share it through `Arc`.
#[derive(Debug, Clone, Default)]
pub struct RouteCache {
    entries: HashMap<String, CachedTarget>,
}

impl RouteCache {
    pub fn builder() -> RouteCacheBuilder {
        RouteCacheBuilder::default()
    }

    /// Load a JSON object of `"path": ["Controller", "method"]` entries.
    pub fn load_from_file(path: &Path) -> std::io::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let map: HashMap<String, (String, String)> = serde_json::from_reader(reader)?;

        let mut builder = Self::builder();
        for (key, (controller, method)) in map {
            builder = builder.insert(key, controller, method);
        }
        let cache = builder.build();
        tracing::info!(path = ?path, entries = cache.len(), "Loaded route cache file");
        Ok(cache)
    }

    pub fn get(&self, path: &str) -> Option<&CachedTarget> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Bootstrap-time builder for [`RouteCache`].
#[derive(Debug, Default)]
pub struct RouteCacheBuilder {
    entries: HashMap<String, CachedTarget>,
}

impl RouteCacheBuilder {
    /// Add an entry. Keys are stored with one trailing slash trimmed so they
    /// line up with the paths resolution looks up. Later inserts win.
    pub fn insert(
        mut self,
        path: impl AsRef<str>,
        controller: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        let key = trim_trailing_slash(path.as_ref()).to_string();
        self.entries.insert(key, CachedTarget::new(controller, method));
        self
    }

    /// Merge every entry of an already built cache.
    pub fn extend(mut self, other: &RouteCache) -> Self {
        self.entries
            .extend(other.entries.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn build(self) -> RouteCache {
        RouteCache {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_lookup() {
        let cache = RouteCache::builder()
            .insert("/login", "Auth", "login")
            .insert("/admin/", "Admin\\Dashboard", "show")
            .build();

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("/login"), Some(&CachedTarget::new("Auth", "login")));
        assert_eq!(
            cache.get("/admin").map(|t| t.method.as_str()),
            Some("show")
        );
        assert!(cache.get("/logout").is_none());
    }

    #[test]
    fn test_later_insert_wins() {
        let cache = RouteCache::builder()
            .insert("/a", "A", "one")
            .insert("/a", "A", "two")
            .build();
        assert_eq!(cache.get("/a").unwrap().method, "two");
    }

    #[test]
    fn test_extend_merges() {
        let base = RouteCache::builder().insert("/a", "A", "x").build();
        let cache = RouteCache::builder()
            .insert("/b", "B", "y")
            .extend(&base)
            .build();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("rest_route_cache_test.json");
        std::fs::write(&path, r#"{"/status": ["Health", "check"], "/x/": ["X", "y"]}"#).unwrap();

        let cache = RouteCache::load_from_file(&path).unwrap();
        assert_eq!(cache.get("/status"), Some(&CachedTarget::new("Health", "check")));
        assert!(cache.get("/x").is_some());

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_load_from_file_rejects_bad_json() {
        let path = std::env::temp_dir().join("rest_route_cache_bad.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(RouteCache::load_from_file(&path).is_err());
        std::fs::remove_file(&path).unwrap_or_default();
    }
}
