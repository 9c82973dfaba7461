//! Acquisition error type.

use thiserror::Error;

use rg_core::SourceId;

/// Errors produced while acquiring a raw network.  Any of them aborts the
/// extraction for the affected region.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("network source returned no nodes for region {region:?}")]
    EmptyNetwork { region: String },

    #[error("edge references unknown node {0}")]
    UnknownNode(SourceId),

    #[error("node {0} appears more than once")]
    DuplicateNode(SourceId),

    #[error("parallel edges {from} -> {to} share key {key}")]
    DuplicateEdgeKey { from: SourceId, to: SourceId, key: u32 },

    #[error("malformed network data: {0}")]
    Malformed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("raw network JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

pub type SourceResult<T> = Result<T, SourceError>;
