//! Raw multigraph → canonical document.
//!
//! # Policies
//!
//! | Concern   | Rule                                                            |
//! |-----------|-----------------------------------------------------------------|
//! | Node id   | Source id, verbatim                                             |
//! | Edge id   | `"{from}-{to}-{key}"`                                           |
//! | Weight    | Precomputed length, else `0.0`; rounded to 2 decimals once      |
//! | Geometry  | Explicit polyline, else straight from-node → to-node segment    |
//! | Rounding  | Every coordinate at one [`CoordPrecision`] per run              |
//!
//! The missing-length and missing-polyline cases are defaults, not errors:
//! a zero weight tells the consumer that length data was absent.

use log::debug;

use rg_core::{EdgeIdx, GeoPoint, SourceId};
use rg_source::{RawEdge, RawNetwork};

use crate::model::{CanonicalEdge, CanonicalNode, GraphDocument, LatLng};
use crate::GraphError;

/// Decimal places kept on edge weights (centimetres).
pub const WEIGHT_DECIMALS: u32 = 2;

/// Weight assigned to edges without a precomputed length.
pub const DEFAULT_WEIGHT_M: f64 = 0.0;

// ── CoordPrecision ────────────────────────────────────────────────────────────

/// Decimal places kept on every output coordinate.
///
/// Five places (≈ 1.1 m of latitude) is the default; six can be selected
/// explicitly.  One value applies to all nodes and edges of a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum CoordPrecision {
    #[default]
    Five,
    Six,
}

impl CoordPrecision {
    pub fn decimals(self) -> u32 {
        match self {
            CoordPrecision::Five => 5,
            CoordPrecision::Six  => 6,
        }
    }

    pub fn round(self, p: GeoPoint) -> LatLng {
        LatLng {
            lat: round_to(p.lat, self.decimals()),
            lng: round_to(p.lng, self.decimals()),
        }
    }
}

impl TryFrom<u8> for CoordPrecision {
    type Error = GraphError;

    fn try_from(decimals: u8) -> Result<Self, Self::Error> {
        match decimals {
            5 => Ok(CoordPrecision::Five),
            6 => Ok(CoordPrecision::Six),
            n => Err(GraphError::Precision(n)),
        }
    }
}

// ── Value policies ────────────────────────────────────────────────────────────

/// Round to `decimals` places from the exact binary value of `value`.
///
/// Goes through the correctly rounded decimal formatter: scaling by
/// `10^decimals` first can land on an artificial `.5` and round the wrong way
/// (`2687.285` is stored as `2687.28499…` and must become `2687.28`).
pub fn round_to(value: f64, decimals: u32) -> f64 {
    format!("{value:.prec$}", prec = decimals as usize)
        .parse()
        .unwrap_or(value)
}

pub fn edge_id(from: &SourceId, to: &SourceId, key: u32) -> String {
    format!("{from}-{to}-{key}")
}

/// Stored weight of an edge with the given precomputed length.
pub fn resolve_weight(length_m: Option<f64>) -> f64 {
    round_to(length_m.unwrap_or(DEFAULT_WEIGHT_M), WEIGHT_DECIMALS)
}

// ── Canonicalizer ─────────────────────────────────────────────────────────────

/// Turns a [`RawNetwork`] into a [`GraphDocument`].
///
/// Canonicalization is total: every validated raw network has a canonical
/// form, so this never fails.
#[derive(Copy, Clone, Debug, Default)]
pub struct Canonicalizer {
    precision: CoordPrecision,
}

impl Canonicalizer {
    pub fn new(precision: CoordPrecision) -> Self {
        Self { precision }
    }

    pub fn canonicalize(&self, net: &RawNetwork) -> GraphDocument {
        // Edge ids by EdgeIdx; reused for the neighbor lists.
        let ids: Vec<String> = (0..net.edge_count())
            .map(|i| {
                edge_id(
                    &net.node_id[net.edge_from[i].index()],
                    &net.node_id[net.edge_to[i].index()],
                    net.edge_key[i],
                )
            })
            .collect();

        let mut doc = GraphDocument::default();

        for (i, id) in ids.iter().enumerate() {
            let edge = net.edge(EdgeIdx(i as u32));
            let canonical = CanonicalEdge {
                id:       id.clone(),
                from:     net.source_id(edge.from).to_string(),
                to:       net.source_id(edge.to).to_string(),
                weight:   resolve_weight(edge.length_m),
                geometry: self.resolve_geometry(net, &edge),
            };
            doc.edges.insert(id.clone(), canonical);
        }

        for n in net.nodes() {
            let id = net.source_id(n).to_string();
            let node = CanonicalNode {
                id:        id.clone(),
                position:  self.precision.round(net.position(n)),
                neighbors: net.out_edges(n).map(|e| ids[e.index()].clone()).collect(),
            };
            doc.nodes.insert(id, node);
        }

        debug!(
            "canonicalized {} nodes, {} edges at {} decimal places",
            doc.node_count(),
            doc.edge_count(),
            self.precision.decimals()
        );
        doc
    }

    /// Explicit polyline if present, else the straight from → to segment.
    pub fn resolve_geometry(&self, net: &RawNetwork, edge: &RawEdge<'_>) -> Vec<LatLng> {
        match edge.polyline {
            Some(line) => line.iter().map(|&p| self.precision.round(p)).collect(),
            None => vec![
                self.precision.round(net.position(edge.from)),
                self.precision.round(net.position(edge.to)),
            ],
        }
    }
}
