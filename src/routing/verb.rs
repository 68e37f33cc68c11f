//! HTTP verbs and effective-verb extraction.
//!
//! # Responsibilities
//! - Normalize verb tokens to uppercase
//! - Determine the effective verb of a request, honoring overrides
//!
//! # Design Decisions
//! - Unknown tokens are kept (uppercased) instead of rejected
//! - Extraction never fails; the fallback is GET

use std::fmt;

use crate::routing::request::RouteRequest;

/// Default name of the POST field that overrides the verb.
pub const DEFAULT_METHOD_PARAM: &str = "_method";

/// Default header that overrides the verb.
pub const DEFAULT_OVERRIDE_HEADER: &str = "X-HTTP-Method-Override";

/// An HTTP verb, normalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Verb {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    /// Any token outside the supported set, uppercased.
    Other(String),
}

impl Verb {
    /// The supported verbs in canonical order.
    pub const ALL: [Verb; 7] = [
        Verb::Get,
        Verb::Post,
        Verb::Put,
        Verb::Patch,
        Verb::Delete,
        Verb::Head,
        Verb::Options,
    ];

    /// Parse a verb token, case-insensitively. Never fails.
    pub fn parse(token: &str) -> Self {
        let upper = token.to_ascii_uppercase();
        match upper.as_str() {
            "GET" => Verb::Get,
            "POST" => Verb::Post,
            "PUT" => Verb::Put,
            "PATCH" => Verb::Patch,
            "DELETE" => Verb::Delete,
            "HEAD" => Verb::Head,
            "OPTIONS" => Verb::Options,
            _ => Verb::Other(upper),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
            Verb::Head => "HEAD",
            Verb::Options => "OPTIONS",
            Verb::Other(token) => token,
        }
    }

    pub fn is_get(&self) -> bool {
        *self == Verb::Get
    }

    pub fn is_options(&self) -> bool {
        *self == Verb::Options
    }

    pub fn is_head(&self) -> bool {
        *self == Verb::Head
    }

    pub fn is_post(&self) -> bool {
        *self == Verb::Post
    }

    pub fn is_delete(&self) -> bool {
        *self == Verb::Delete
    }

    pub fn is_put(&self) -> bool {
        *self == Verb::Put
    }

    pub fn is_patch(&self) -> bool {
        *self == Verb::Patch
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names of the override channels consulted when extracting a verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbSource {
    /// POST field carrying an override (e.g. `_method`).
    pub method_param: String,
    /// Header carrying an override.
    pub override_header: String,
}

impl VerbSource {
    pub fn new(method_param: impl Into<String>, override_header: impl Into<String>) -> Self {
        Self {
            method_param: method_param.into(),
            override_header: override_header.into(),
        }
    }

    /// Effective verb of a request.
    ///
    /// Order: override form field, override header, declared method, then `GET`.
    /// A present value wins even when empty.
    pub fn extract(&self, request: &RouteRequest) -> Verb {
        request
            .form_method
            .as_deref()
            .or(request.override_header.as_deref())
            .or(request.declared_method.as_deref())
            .map(Verb::parse)
            .unwrap_or_default()
    }
}

impl Default for VerbSource {
    fn default() -> Self {
        Self::new(DEFAULT_METHOD_PARAM, DEFAULT_OVERRIDE_HEADER)
    }
}
