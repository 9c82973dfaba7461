//! Raw directed multigraph and its builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeIdx n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_*[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Edges are grouped by source node with a **stable** sort, so within one
//! node's range they keep the order in which the Network Source enumerated
//! them.  That order is what the canonical `neighbors` list reproduces.
//!
//! Node positions are kept in source enumeration order as well; nothing is
//! renumbered in a way that leaks into output.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use rg_core::{EdgeIdx, GeoPoint, NodeIdx, SourceId};

use crate::{SourceError, SourceResult};

// ── RawNetwork ────────────────────────────────────────────────────────────────

/// Directed road multigraph as returned by a Network Source.
///
/// All fields are `pub` for direct indexed access.  Do not construct
/// directly; use [`RawNetworkBuilder`], which enforces the Source contract
/// (known endpoints, unique parallel-edge keys, well-formed numbers).
#[derive(Debug)]
pub struct RawNetwork {
    // ── Node data (indexed by NodeIdx) ────────────────────────────────────
    /// Stable source identifier of each node.
    pub node_id: Vec<SourceId>,

    /// Geographic position of each node.
    pub node_pos: Vec<GeoPoint>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing edges of node `n` are at EdgeIdx
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeIdx = position in grouped order) ────────
    pub edge_from: Vec<NodeIdx>,

    pub edge_to: Vec<NodeIdx>,

    /// Parallel-edge disambiguation key, unique per `(from, to)` pair.
    pub edge_key: Vec<u32>,

    /// Precomputed length in metres, if the source supplied one.
    pub edge_length_m: Vec<Option<f64>>,

    /// Explicit polyline in direction of travel, if the source supplied one.
    /// Always at least two points when present.
    pub edge_polyline: Vec<Option<Vec<GeoPoint>>>,
}

/// Borrowed view of one directed edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RawEdge<'a> {
    pub from:     NodeIdx,
    pub to:       NodeIdx,
    pub key:      u32,
    pub length_m: Option<f64>,
    pub polyline: Option<&'a [GeoPoint]>,
}

impl RawNetwork {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Iterator over node indices in source enumeration order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        (0..self.node_count()).map(|i| NodeIdx(i as u32))
    }

    #[inline]
    pub fn source_id(&self, node: NodeIdx) -> &SourceId {
        &self.node_id[node.index()]
    }

    #[inline]
    pub fn position(&self, node: NodeIdx) -> GeoPoint {
        self.node_pos[node.index()]
    }

    pub fn edge(&self, e: EdgeIdx) -> RawEdge<'_> {
        let i = e.index();
        RawEdge {
            from:     self.edge_from[i],
            to:       self.edge_to[i],
            key:      self.edge_key[i],
            length_m: self.edge_length_m[i],
            polyline: self.edge_polyline[i].as_deref(),
        }
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeIdx`s of all outgoing edges from `node`, in
    /// the source's enumeration order.
    ///
    /// This is a contiguous index range; no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeIdx) -> impl Iterator<Item = EdgeIdx> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeIdx(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeIdx) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }
}

// ── RawNetworkBuilder ─────────────────────────────────────────────────────────

/// Construct a [`RawNetwork`] incrementally, then call [`build`](Self::build).
///
/// Nodes must be added before the edges that reference them; edges may be
/// added in any node order.
///
/// # Example
///
/// ```
/// use rg_core::{GeoPoint, SourceId};
/// use rg_source::RawNetworkBuilder;
///
/// let mut b = RawNetworkBuilder::new();
/// let a = b.add_node(SourceId::from(1_i64), GeoPoint::new(49.0, -123.0)).unwrap();
/// let c = b.add_node(SourceId::from(2_i64), GeoPoint::new(49.1, -123.1)).unwrap();
/// b.add_edge(a, c, 0, Some(13_500.0), None);
/// b.add_edge(c, a, 0, Some(13_500.0), None);
/// let net = b.build().unwrap();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2);
/// ```
pub struct RawNetworkBuilder {
    ids:       Vec<SourceId>,
    nodes:     Vec<GeoPoint>,
    lookup:    FxHashMap<SourceId, NodeIdx>,
    raw_edges: Vec<PendingEdge>,
}

struct PendingEdge {
    from:     NodeIdx,
    to:       NodeIdx,
    key:      u32,
    length_m: Option<f64>,
    polyline: Option<Vec<GeoPoint>>,
}

impl RawNetworkBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            ids:       Vec::with_capacity(nodes),
            nodes:     Vec::with_capacity(nodes),
            lookup:    FxHashMap::with_capacity_and_hasher(nodes, Default::default()),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its `NodeIdx` (sequential from 0).
    ///
    /// # Errors
    ///
    /// [`SourceError::DuplicateNode`] if `id` was already added.
    pub fn add_node(&mut self, id: SourceId, pos: GeoPoint) -> SourceResult<NodeIdx> {
        if self.lookup.contains_key(&id) {
            return Err(SourceError::DuplicateNode(id));
        }
        let idx = NodeIdx(self.nodes.len() as u32);
        self.lookup.insert(id.clone(), idx);
        self.ids.push(id);
        self.nodes.push(pos);
        Ok(idx)
    }

    /// Index of a node added earlier.
    pub fn lookup(&self, id: &SourceId) -> Option<NodeIdx> {
        self.lookup.get(id).copied()
    }

    /// Add a **directed** edge from `from` to `to`.
    ///
    /// `polyline`, when given, must run from `from` to `to`.
    pub fn add_edge(
        &mut self,
        from: NodeIdx,
        to: NodeIdx,
        key: u32,
        length_m: Option<f64>,
        polyline: Option<Vec<GeoPoint>>,
    ) {
        self.raw_edges.push(PendingEdge { from, to, key, length_m, polyline });
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Validate and consume the builder, producing a [`RawNetwork`].
    ///
    /// # Errors
    ///
    /// - [`SourceError::Malformed`] for non-finite coordinates, negative or
    ///   non-finite lengths, polylines shorter than two points, or edge
    ///   endpoints that were never added.
    /// - [`SourceError::DuplicateEdgeKey`] if two edges share `(from, to, key)`.
    /// - [`SourceError::Malformed`] if two edges with different endpoints
    ///   render to the same `"{from}-{to}-{key}"` label (possible with
    ///   textual ids containing `-`).
    pub fn build(self) -> SourceResult<RawNetwork> {
        let node_count = self.nodes.len();

        if let Some(i) = self.nodes.iter().position(|p| !p.is_finite()) {
            return Err(SourceError::Malformed(format!(
                "node {} has a non-finite coordinate",
                self.ids[i]
            )));
        }

        // Rendered label → endpoints of the first edge that produced it.
        let mut seen: FxHashMap<String, (NodeIdx, NodeIdx)> =
            FxHashMap::with_capacity_and_hasher(self.raw_edges.len(), Default::default());
        for e in &self.raw_edges {
            if e.from.index() >= node_count || e.to.index() >= node_count {
                return Err(SourceError::Malformed(format!(
                    "edge endpoint {} -> {} is out of range",
                    e.from, e.to
                )));
            }
            let label = || format!("{}-{}-{}", self.ids[e.from.index()], self.ids[e.to.index()], e.key);
            if let Some(len) = e.length_m {
                if !len.is_finite() || len < 0.0 {
                    return Err(SourceError::Malformed(format!(
                        "edge {} has invalid length {len}",
                        label()
                    )));
                }
            }
            if let Some(line) = &e.polyline {
                if line.len() < 2 {
                    return Err(SourceError::Malformed(format!(
                        "edge {} has a polyline with {} point(s)",
                        label(),
                        line.len()
                    )));
                }
                if line.iter().any(|p| !p.is_finite()) {
                    return Err(SourceError::Malformed(format!(
                        "edge {} has a non-finite polyline coordinate",
                        label()
                    )));
                }
            }
            match seen.entry(label()) {
                Entry::Vacant(slot) => {
                    slot.insert((e.from, e.to));
                }
                Entry::Occupied(prev) if *prev.get() == (e.from, e.to) => {
                    return Err(SourceError::DuplicateEdgeKey {
                        from: self.ids[e.from.index()].clone(),
                        to:   self.ids[e.to.index()].clone(),
                        key:  e.key,
                    });
                }
                Entry::Occupied(prev) => {
                    let (pf, pt) = *prev.get();
                    return Err(SourceError::Malformed(format!(
                        "edges {} -> {} and {} -> {} both render as {:?}",
                        self.ids[pf.index()],
                        self.ids[pt.index()],
                        self.ids[e.from.index()],
                        self.ids[e.to.index()],
                        prev.key()
                    )));
                }
            }
        }

        // Stable: per-node order stays the source's enumeration order.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        let mut edge_from     = Vec::with_capacity(raw.len());
        let mut edge_to       = Vec::with_capacity(raw.len());
        let mut edge_key      = Vec::with_capacity(raw.len());
        let mut edge_length_m = Vec::with_capacity(raw.len());
        let mut edge_polyline = Vec::with_capacity(raw.len());
        for e in raw {
            edge_from.push(e.from);
            edge_to.push(e.to);
            edge_key.push(e.key);
            edge_length_m.push(e.length_m);
            edge_polyline.push(e.polyline);
        }

        Ok(RawNetwork {
            node_id: self.ids,
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_key,
            edge_length_m,
            edge_polyline,
        })
    }
}

impl Default for RawNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
