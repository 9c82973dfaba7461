//! The canonical graph document consumed by the pathfinding client.
//!
//! ```json
//! {
//!   "nodes": { "<nodeId>": { "id": "<nodeId>", "position": {"lat": 0.0, "lng": 0.0},
//!                            "neighbors": ["<edgeId>"] } },
//!   "edges": { "<edgeId>": { "id": "<edgeId>", "from": "<nodeId>", "to": "<nodeId>",
//!                            "weight": 0.0, "geometry": [{"lat": 0.0, "lng": 0.0}] } }
//! }
//! ```
//!
//! Both collections are keyed maps.  `BTreeMap` gives them a fixed key order
//! so identical models serialize to identical bytes; consumers must not rely
//! on that order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::GraphResult;

/// Output coordinate, already rounded to the run's precision.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanonicalNode {
    pub id:        String,
    pub position:  LatLng,
    /// Ids of this node's outgoing edges, in source enumeration order.
    pub neighbors: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEdge {
    /// `"<from>-<to>-<key>"`.
    pub id:       String,
    pub from:     String,
    pub to:       String,
    /// Metres, rounded to centimetres.  `0.0` when the source had no length.
    pub weight:   f64,
    /// At least two points, in direction of travel.
    pub geometry: Vec<LatLng>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: BTreeMap<String, CanonicalNode>,
    pub edges: BTreeMap<String, CanonicalEdge>,
}

impl GraphDocument {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Compact JSON encoding of the whole document.
    pub fn to_json_vec(&self) -> GraphResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_json_slice(bytes: &[u8]) -> GraphResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
