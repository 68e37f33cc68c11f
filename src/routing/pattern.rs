//! Verb/shape pattern table.
//!
//! # Standard Table
//! ```text
//! PUT,PATCH {id} → update
//! DELETE {id}    → delete
//! GET,HEAD {id}  → view
//! POST           → create
//! GET,HEAD       → index
//! {id}           → options
//! (empty)        → options
//! ```
//!
//! # Design Decisions
//! - First matching rule wins
//! - Lookup is total: anything unmatched resolves to `options`

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::routing::verb::Verb;

/// Placeholder marking a rule that requires a trailing identifier.
const ID_TOKEN: &str = "{id}";

/// Canonical REST actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Index,
    View,
    Create,
    Update,
    Delete,
    Options,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Index => "index",
            Action::View => "view",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Options => "options",
        }
    }

    /// True for actions addressing a single resource.
    pub fn is_item(&self) -> bool {
        matches!(self, Action::View | Action::Update | Action::Delete)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "index" => Ok(Action::Index),
            "view" => Ok(Action::View),
            "create" => Ok(Action::Create),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            "options" => Ok(Action::Options),
            other => Err(PatternError::UnknownAction(other.to_string())),
        }
    }
}

/// Errors raised while parsing configured rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("unsupported verb '{verb}' in pattern '{pattern}'")]
    UnsupportedVerb { pattern: String, verb: String },

    #[error("malformed pattern '{0}'")]
    Malformed(String),
}

/// One row of the pattern table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Verbs this rule applies to; empty means any verb.
    pub verbs: Vec<Verb>,
    /// `Some(true)`: identifier required. `Some(false)`: identifier forbidden.
    /// `None`: either.
    pub needs_identifier: Option<bool>,
    pub action: Action,
}

impl Rule {
    pub fn new(verbs: Vec<Verb>, needs_identifier: Option<bool>, action: Action) -> Self {
        Self {
            verbs,
            needs_identifier,
            action,
        }
    }

    /// Parse a rule written as `"VERB[,VERB] [{id}]"`.
    ///
    /// `"{id}"` alone matches any verb with an identifier, and `""` matches
    /// everything.
    pub fn parse(pattern: &str, action: &str) -> Result<Self, PatternError> {
        let action = action.parse::<Action>()?;
        let mut tokens = pattern.split_whitespace();

        let (verb_list, id) = match (tokens.next(), tokens.next(), tokens.next()) {
            (None, _, _) => return Ok(Self::new(Vec::new(), None, action)),
            (Some(ID_TOKEN), None, _) => return Ok(Self::new(Vec::new(), Some(true), action)),
            (Some(verbs), None, _) => (verbs, false),
            (Some(verbs), Some(ID_TOKEN), None) => (verbs, true),
            _ => return Err(PatternError::Malformed(pattern.to_string())),
        };

        let mut verbs = Vec::new();
        for token in verb_list.split(',').filter(|t| !t.is_empty()) {
            match Verb::parse(token) {
                Verb::Other(verb) => {
                    return Err(PatternError::UnsupportedVerb {
                        pattern: pattern.to_string(),
                        verb,
                    })
                }
                verb => verbs.push(verb),
            }
        }
        if verbs.is_empty() {
            return Err(PatternError::Malformed(pattern.to_string()));
        }

        Ok(Self::new(verbs, Some(id), action))
    }

    pub fn matches(&self, verb: &Verb, has_identifier: bool) -> bool {
        let verb_ok = self.verbs.is_empty() || self.verbs.contains(verb);
        let shape_ok = self.needs_identifier.is_none_or(|needed| needed == has_identifier);
        verb_ok && shape_ok
    }
}

/// Ordered list of rules; first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTable {
    rules: Vec<Rule>,
}

impl PatternTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The fixed REST table.
    pub fn standard() -> Self {
        Self::new(vec![
            Rule::new(vec![Verb::Put, Verb::Patch], Some(true), Action::Update),
            Rule::new(vec![Verb::Delete], Some(true), Action::Delete),
            Rule::new(vec![Verb::Get, Verb::Head], Some(true), Action::View),
            Rule::new(vec![Verb::Post], Some(false), Action::Create),
            Rule::new(vec![Verb::Get, Verb::Head], Some(false), Action::Index),
            Rule::new(Vec::new(), Some(true), Action::Options),
            Rule::new(Vec::new(), None, Action::Options),
        ])
    }

    /// Standard table with `overrides` evaluated first.
    pub fn with_overrides(overrides: Vec<Rule>) -> Self {
        let mut rules = overrides;
        rules.extend(Self::standard().rules);
        Self::new(rules)
    }

    pub fn lookup(&self, verb: &Verb, has_identifier: bool) -> Action {
        self.rules
            .iter()
            .find(|rule| rule.matches(verb, has_identifier))
            .map(|rule| rule.action)
            .unwrap_or(Action::Options)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::standard()
    }
}
