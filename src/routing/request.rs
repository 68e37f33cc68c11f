//! Routing-relevant view of an incoming request.
//!
//! # Responsibilities
//! - Carry the four inputs resolution depends on (override field,
//!   override header, declared method, path)
//! - Extract them from HTTP request parts
//!
//! # Design Decisions
//! - Read-only once built; resolution never mutates the request
//! - Body decoding happens upstream; only decoded form pairs are accepted here

use axum::http::request::Parts;

use crate::routing::verb::VerbSource;

/// Inputs consumed by route resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteRequest {
    /// Value of the verb-override POST field, if sent.
    pub form_method: Option<String>,
    /// Value of the verb-override header, if sent.
    pub override_header: Option<String>,
    /// Transport-level method.
    pub declared_method: Option<String>,
    /// Server-relative, URL-decoded path.
    pub path: String,
}

impl RouteRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_form_method(mut self, value: impl Into<String>) -> Self {
        self.form_method = Some(value.into());
        self
    }

    pub fn with_override_header(mut self, value: impl Into<String>) -> Self {
        self.override_header = Some(value.into());
        self
    }

    pub fn with_declared_method(mut self, value: impl Into<String>) -> Self {
        self.declared_method = Some(value.into());
        self
    }

    /// Build from HTTP request parts plus already-decoded form pairs.
    pub fn from_http(parts: &Parts, form: Option<&[(String, String)]>, source: &VerbSource) -> Self {
        let form_method = form.and_then(|pairs| {
            pairs
                .iter()
                .find(|(name, _)| *name == source.method_param)
                .map(|(_, value)| value.clone())
        });

        // Non-UTF-8 header values are treated as absent.
        let override_header = parts
            .headers
            .get(source.override_header.as_str())
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let raw_path = parts.uri.path();
        let path = urlencoding::decode(raw_path)
            .map(|p| p.into_owned())
            .unwrap_or_else(|_| raw_path.to_string());

        Self {
            form_method,
            override_header,
            declared_method: Some(parts.method.as_str().to_string()),
            path,
        }
    }
}

/// Decode an `application/x-www-form-urlencoded` body into pairs.
pub fn parse_form(body: &[u8]) -> Vec<(String, String)> {
    url::form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
