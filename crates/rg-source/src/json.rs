//! Pre-extracted raw networks stored as JSON.
//!
//! # Format
//!
//! ```json
//! {
//!   "nodes": [ { "id": 123, "lat": 49.0, "lng": -123.0 } ],
//!   "edges": [ { "from": 123, "to": 456, "key": 0, "length": 12.5,
//!                "geometry": [[-123.0, 49.0], [-123.1, 49.1]] } ]
//! }
//! ```
//!
//! - `id`, `from`, `to`: JSON integers or strings, kept as opaque tokens.
//! - `key`: defaults to `0`.
//! - `length` (metres) and `geometry` are optional.  Geometry points are
//!   `[lng, lat]` pairs in direction of travel.
//!
//! File order is enumeration order for both nodes and edges.

use std::io::Read;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use rg_core::{GeoPoint, Region, SourceId};

use crate::network::{RawNetwork, RawNetworkBuilder};
use crate::source::NetworkSource;
use crate::{SourceError, SourceResult};

/// Placeholder in a [`JsonSource`] path template replaced by the region id.
pub const REGION_PLACEHOLDER: &str = "{region}";

// ── Serde records ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Signed(i64),
    Unsigned(u64),
    Text(String),
}

impl From<RawId> for SourceId {
    fn from(id: RawId) -> Self {
        match id {
            RawId::Signed(n)   => SourceId::from(n),
            RawId::Unsigned(n) => SourceId::from(n),
            RawId::Text(s)     => SourceId::from(s),
        }
    }
}

#[derive(Deserialize)]
struct NodeRecord {
    id:  RawId,
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:     RawId,
    to:       RawId,
    #[serde(default)]
    key:      u32,
    #[serde(default)]
    length:   Option<f64>,
    #[serde(default)]
    geometry: Option<Vec<[f64; 2]>>,
}

#[derive(Deserialize)]
struct NetworkRecord {
    nodes: Vec<NodeRecord>,
    #[serde(default)]
    edges: Vec<EdgeRecord>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a raw network from a JSON file.
pub fn load_raw_network(path: &Path) -> SourceResult<RawNetwork> {
    let file = std::fs::File::open(path)?;
    load_raw_network_reader(std::io::BufReader::new(file))
}

/// Like [`load_raw_network`] but accepts any `Read` source.
pub fn load_raw_network_reader<R: Read>(reader: R) -> SourceResult<RawNetwork> {
    let record: NetworkRecord = serde_json::from_reader(reader)?;

    let mut builder = RawNetworkBuilder::with_capacity(record.nodes.len(), record.edges.len());
    for n in record.nodes {
        builder.add_node(n.id.into(), GeoPoint::new(n.lat, n.lng))?;
    }

    for e in record.edges {
        let from: SourceId = e.from.into();
        let to: SourceId = e.to.into();
        let from_idx = builder.lookup(&from).ok_or(SourceError::UnknownNode(from))?;
        let to_idx = builder.lookup(&to).ok_or(SourceError::UnknownNode(to))?;
        let polyline = e
            .geometry
            .map(|pts| pts.into_iter().map(|[lng, lat]| GeoPoint::new(lat, lng)).collect());
        builder.add_edge(from_idx, to_idx, e.key, e.length, polyline);
    }

    builder.build()
}

/// Network Source backed by raw-network JSON files, one per region.
pub struct JsonSource {
    template: String,
}

impl JsonSource {
    /// `template` may contain `{region}`, replaced by the region id on each
    /// fetch (e.g. `raw/{region}.json`).  Without the placeholder every
    /// region reads the same file.
    pub fn new(template: impl Into<String>) -> Self {
        Self { template: template.into() }
    }

    pub fn path_for(&self, region: &Region) -> PathBuf {
        PathBuf::from(self.template.replace(REGION_PLACEHOLDER, &region.id))
    }
}

impl NetworkSource for JsonSource {
    fn name(&self) -> &str {
        "json"
    }

    fn fetch(&self, region: &Region) -> SourceResult<RawNetwork> {
        let path = self.path_for(region);
        debug!("reading raw network for {} from {}", region.id, path.display());

        let network = load_raw_network(&path)?;
        if network.is_empty() {
            return Err(SourceError::EmptyNetwork { region: region.id.clone() });
        }
        debug!(
            "raw network for {}: {} nodes, {} edges",
            region.id,
            network.node_count(),
            network.edge_count()
        );
        Ok(network)
    }
}
