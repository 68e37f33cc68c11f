//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::routing::segment::DEFAULT_SEPARATOR;
use crate::routing::verb::{DEFAULT_METHOD_PARAM, DEFAULT_OVERRIDE_HEADER};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,

    /// Route resolution settings.
    pub route: RouteConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Largest form body inspected for a verb override, in bytes.
    pub max_form_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_form_bytes: 64 * 1024,
            request_timeout_secs: 30,
        }
    }
}

/// Route resolution configuration (`[route]`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Separator between controller namespace parts.
    pub namespace_separator: String,

    /// REST strategy settings.
    pub rest: RestConfig,

    /// Pre-resolved paths: `"/login" = ["Auth", "login"]`.
    pub cache: BTreeMap<String, (String, String)>,

    /// Optional JSON file with additional cache entries.
    pub cache_file: Option<String>,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            namespace_separator: DEFAULT_SEPARATOR.to_string(),
            rest: RestConfig::default(),
            cache: BTreeMap::new(),
            cache_file: None,
        }
    }
}

/// REST strategy configuration (`[route.rest]`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RestConfig {
    /// Enable REST resolution. When off, only the path strategy runs.
    pub enabled: bool,

    /// POST field carrying a verb override.
    pub method_param: String,

    /// Header carrying a verb override.
    pub override_header: String,

    /// Path prefixes handled by REST resolution (empty = all paths).
    pub prefixes: Vec<String>,

    /// Evaluate `rules` ahead of the standard table.
    pub apply_rules: bool,

    /// Additional pattern rules.
    pub rules: Vec<RuleConfig>,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            method_param: DEFAULT_METHOD_PARAM.to_string(),
            override_header: DEFAULT_OVERRIDE_HEADER.to_string(),
            prefixes: Vec::new(),
            apply_rules: false,
            rules: Vec::new(),
        }
    }
}

/// A configured pattern rule, e.g. `pattern = "PUT,PATCH {id}"`, `action = "update"`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RuleConfig {
    pub pattern: String,
    pub action: String,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
