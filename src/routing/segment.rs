//! Path segmentation.
//!
//! Splits a raw path into a namespace-style controller name and the
//! trailing segment:
//!
//! ```text
//! "/users/profile/7" → controller "Users\Profile", tail "7"
//! "/users"           → controller "",              tail "Users"
//! ""                 → controller "",              tail ""
//! ```

/// Default separator between controller namespace parts.
pub const DEFAULT_SEPARATOR: &str = "\\";

/// Result of splitting a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segments {
    /// Capitalized prefix segments joined by the separator.
    pub controller: String,
    /// The popped last segment (capitalized).
    pub tail: String,
}

impl Segments {
    /// True when a non-empty segment follows a non-empty controller path.
    pub fn has_identifier(&self) -> bool {
        !self.controller.is_empty() && !self.tail.is_empty()
    }
}

/// Strip exactly one trailing `/`, if any.
pub fn trim_trailing_slash(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

/// Split `path` into controller name and tail segment.
///
/// The path is expected to be trimmed already (see [`trim_trailing_slash`]).
pub fn segment(path: &str, separator: &str) -> Segments {
    let mut parts: Vec<String> = path.split('/').map(capitalize).collect();
    // split always yields at least one element
    let tail = parts.pop().unwrap_or_default();

    let joined = parts.join(separator);
    let controller = if separator.is_empty() {
        joined
    } else {
        joined.trim_start_matches(separator).to_string()
    };

    Segments { controller, tail }
}

/// Uppercase the first character if it is ASCII.
fn capitalize(segment: &str) -> String {
    let mut out = segment.to_string();
    if let Some(first) = out.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    out
}
