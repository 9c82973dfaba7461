//! Configuration-layer error type.
//!
//! Sub-crates define their own error enums (`SourceError`, `GraphError`);
//! `CoreError` covers region configuration and selector resolution only.

use thiserror::Error;

/// Errors raised while loading or querying the region registry.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown region selector {selector:?}{}", suggestion_hint(.suggestion))]
    UnknownSelector {
        selector:   String,
        suggestion: Option<String>,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("region file parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// `true` for errors the operator caused through the invocation itself
    /// (as opposed to a broken environment).
    pub fn is_usage_error(&self) -> bool {
        matches!(self, CoreError::UnknownSelector { .. } | CoreError::Config(_) | CoreError::Toml(_))
    }
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean {s:?}?)"),
        None => String::new(),
    }
}

/// Shorthand result type for `rg-core`.
pub type CoreResult<T> = Result<T, CoreError>;
