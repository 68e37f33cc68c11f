//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check override names are usable (non-empty field, valid header)
//! - Check configured rules and cache entries
//! - Check listener addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;
use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::routing::pattern::{PatternError, Rule};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route.rest.method_param must not be empty")]
    EmptyMethodParam,

    #[error("route.rest.override_header '{0}' is not a valid header name")]
    InvalidOverrideHeader(String),

    #[error("route.namespace_separator must not be empty")]
    EmptySeparator,

    #[error("route.rest.prefixes entry '{0}' must start with '/'")]
    InvalidPrefix(String),

    #[error("route.rest.rules[{index}]: {source}")]
    InvalidRule { index: usize, source: PatternError },

    #[error("route.cache entry '{0}' has an empty method")]
    EmptyCachedMethod(String),

    #[error("{field} '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let rest = &config.route.rest;

    if rest.method_param.is_empty() {
        errors.push(ValidationError::EmptyMethodParam);
    }
    if HeaderName::from_bytes(rest.override_header.as_bytes()).is_err() {
        errors.push(ValidationError::InvalidOverrideHeader(rest.override_header.clone()));
    }
    if config.route.namespace_separator.is_empty() {
        errors.push(ValidationError::EmptySeparator);
    }
    for prefix in &rest.prefixes {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::InvalidPrefix(prefix.clone()));
        }
    }
    for (index, rule) in rest.rules.iter().enumerate() {
        if let Err(source) = Rule::parse(&rule.pattern, &rule.action) {
            errors.push(ValidationError::InvalidRule { index, source });
        }
    }
    for (path, (_, method)) in &config.route.cache {
        if method.is_empty() {
            errors.push(ValidationError::EmptyCachedMethod(path.clone()));
        }
    }

    check_address(&mut errors, "server.bind_address", &config.server.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
