//! OSM PBF extraction, enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use rg_core::RegionRegistry;
//! use rg_source::{NetworkSource, PbfSource};
//!
//! let source = PbfSource::new("british-columbia-latest.osm.pbf");
//! let registry = RegionRegistry::builtin();
//! let network = source.fetch(registry.get("vancouver").unwrap())?;
//! ```
//!
//! # What is produced
//!
//! - Only `highway=*` ways accepted by the region's [`NetworkType`] are read.
//! - Ways are truncated to the bounding box: every maximal run of in-box
//!   nodes becomes a separate piece.
//! - The network is topologically simplified.  Graph nodes are piece
//!   endpoints and nodes shared by two or more pieces; the points between
//!   two graph nodes collapse into one edge whose length is the haversine
//!   sum and whose polyline is kept when it has interior points.
//! - One-way roads add a single directed edge; two-way roads add both
//!   directions, the reverse edge carrying the reversed polyline.
//!
//! # Memory note
//!
//! Coordinates of every in-box OSM node are buffered in an `FxHashMap`
//! during the read pass, since ways reference nodes by OSM id.  The map is
//! freed once the network is built.

use std::path::{Path, PathBuf};

use log::debug;
use osmpbf::{Element, ElementReader};
use rustc_hash::{FxHashMap, FxHashSet};

use rg_core::{BoundingBox, GeoPoint, NetworkType, NodeIdx, Region, SourceId};

use crate::network::{RawNetwork, RawNetworkBuilder};
use crate::source::NetworkSource;
use crate::{SourceError, SourceResult};

// ── PbfSource ─────────────────────────────────────────────────────────────────

/// Network Source reading a local `.osm.pbf` extract.
///
/// The file is re-read on every fetch; nothing is cached between regions.
pub struct PbfSource {
    path: PathBuf,
}

impl PbfSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl NetworkSource for PbfSource {
    fn name(&self) -> &str {
        "osm-pbf"
    }

    fn fetch(&self, region: &Region) -> SourceResult<RawNetwork> {
        let (coords, ways) = read_pbf(&self.path, &region.bbox, region.network_type)?;
        debug!(
            "{}: {} in-box OSM nodes, {} {} ways",
            region.id,
            coords.len(),
            ways.len(),
            region.network_type
        );

        let network = simplify(&coords, &ways, &region.bbox)?;
        if network.is_empty() {
            return Err(SourceError::EmptyNetwork { region: region.id.clone() });
        }
        debug!(
            "{}: simplified to {} nodes, {} edges",
            region.id,
            network.node_count(),
            network.edge_count()
        );
        Ok(network)
    }
}

// ── Internal types ────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Forward,
    Backward,
    Both,
}

pub(crate) struct OsmWay {
    pub(crate) refs:      Vec<i64>,
    pub(crate) direction: Direction,
}

// ── Phase 1: read ─────────────────────────────────────────────────────────────

fn read_pbf(
    path: &Path,
    bbox: &BoundingBox,
    network_type: NetworkType,
) -> SourceResult<(FxHashMap<i64, GeoPoint>, Vec<OsmWay>)> {
    let reader = ElementReader::from_path(path).map_err(|e| SourceError::Osm(e.to_string()))?;

    let mut coords: FxHashMap<i64, GeoPoint> = FxHashMap::default();
    let mut ways: Vec<OsmWay> = Vec::new();

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                let p = GeoPoint::new(n.lat(), n.lon());
                if bbox.contains(p) {
                    coords.insert(n.id(), p);
                }
            }
            Element::DenseNode(n) => {
                let p = GeoPoint::new(n.lat(), n.lon());
                if bbox.contains(p) {
                    coords.insert(n.id(), p);
                }
            }
            Element::Way(w) => {
                // Collect tags eagerly so &str lifetimes don't escape the closure.
                let tags: Vec<(&str, &str)> = w.tags().collect();
                if let Some(direction) = classify_way(&tags, network_type) {
                    ways.push(OsmWay { refs: w.refs().collect(), direction });
                }
            }
            _ => {}
        })
        .map_err(|e| SourceError::Osm(e.to_string()))?;

    Ok((coords, ways))
}

// ── Phase 2: truncate + simplify ──────────────────────────────────────────────

/// Build the simplified multigraph from buffered coordinates and ways.
///
/// `coords` must only hold nodes inside `bbox`; anything else is treated as
/// outside the region.
pub(crate) fn simplify(
    coords: &FxHashMap<i64, GeoPoint>,
    ways: &[OsmWay],
    bbox: &BoundingBox,
) -> SourceResult<RawNetwork> {
    // Split each way into runs of consecutive in-box nodes.
    let mut pieces: Vec<(Vec<i64>, Direction)> = Vec::new();
    for way in ways {
        let mut run: Vec<i64> = Vec::new();
        for &r in &way.refs {
            match coords.get(&r) {
                Some(p) if bbox.contains(*p) => {
                    if run.last() != Some(&r) {
                        run.push(r);
                    }
                }
                _ => flush_run(&mut run, way.direction, &mut pieces),
            }
        }
        flush_run(&mut run, way.direction, &mut pieces);
    }

    // A node is kept when it ends a piece or is shared.
    let mut uses: FxHashMap<i64, u32> = FxHashMap::default();
    let mut ends: FxHashSet<i64> = FxHashSet::default();
    for (refs, _) in &pieces {
        ends.insert(refs[0]);
        ends.insert(refs[refs.len() - 1]);
        for &r in refs {
            *uses.entry(r).or_insert(0) += 1;
        }
    }
    let is_graph_node = |r: i64| ends.contains(&r) || uses.get(&r).copied().unwrap_or(0) >= 2;

    let mut emitter = Emitter {
        coords,
        builder: RawNetworkBuilder::with_capacity(ends.len(), pieces.len() * 2),
        osm_to_idx: FxHashMap::default(),
        next_key: FxHashMap::default(),
    };

    for (refs, direction) in &pieces {
        let mut start = 0;
        for i in 1..refs.len() {
            if is_graph_node(refs[i]) {
                emitter.emit(&refs[start..=i], *direction)?;
                start = i;
            }
        }
    }

    emitter.builder.build()
}

fn flush_run(run: &mut Vec<i64>, direction: Direction, pieces: &mut Vec<(Vec<i64>, Direction)>) {
    if run.len() >= 2 {
        pieces.push((std::mem::take(run), direction));
    } else {
        run.clear();
    }
}

struct Emitter<'a> {
    coords:     &'a FxHashMap<i64, GeoPoint>,
    builder:    RawNetworkBuilder,
    osm_to_idx: FxHashMap<i64, NodeIdx>,
    next_key:   FxHashMap<(NodeIdx, NodeIdx), u32>,
}

impl Emitter<'_> {
    fn node(&mut self, osm_id: i64) -> SourceResult<NodeIdx> {
        if let Some(&idx) = self.osm_to_idx.get(&osm_id) {
            return Ok(idx);
        }
        let pos = self.position(osm_id)?;
        let idx = self.builder.add_node(SourceId::from(osm_id), pos)?;
        self.osm_to_idx.insert(osm_id, idx);
        Ok(idx)
    }

    fn position(&self, osm_id: i64) -> SourceResult<GeoPoint> {
        self.coords
            .get(&osm_id)
            .copied()
            .ok_or_else(|| SourceError::Malformed(format!("way references OSM node {osm_id} without coordinates")))
    }

    fn emit(&mut self, segment: &[i64], direction: Direction) -> SourceResult<()> {
        let first = self.node(segment[0])?;
        let last = self.node(segment[segment.len() - 1])?;

        let points: Vec<GeoPoint> = segment
            .iter()
            .map(|&r| self.position(r))
            .collect::<SourceResult<_>>()?;
        let length_m: f64 = points.windows(2).map(|w| w[0].distance_m(w[1])).sum();
        let polyline = (points.len() > 2).then_some(points);

        if matches!(direction, Direction::Forward | Direction::Both) {
            self.add(first, last, length_m, polyline.clone());
        }
        if matches!(direction, Direction::Backward | Direction::Both) {
            let reversed = polyline.map(|mut p| {
                p.reverse();
                p
            });
            self.add(last, first, length_m, reversed);
        }
        Ok(())
    }

    fn add(&mut self, from: NodeIdx, to: NodeIdx, length_m: f64, polyline: Option<Vec<GeoPoint>>) {
        let slot = self.next_key.entry((from, to)).or_insert(0);
        let key = *slot;
        *slot += 1;
        self.builder.add_edge(from, to, key, Some(length_m), polyline);
    }
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

fn tag<'a>(tags: &[(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Decide whether a way belongs to the network and in which direction(s)
/// it can be travelled.  `None` means the way is excluded.
pub(crate) fn classify_way(tags: &[(&str, &str)], network_type: NetworkType) -> Option<Direction> {
    let highway = tag(tags, "highway")?;
    if tag(tags, "area") == Some("yes") {
        return None;
    }

    let included = match network_type {
        NetworkType::Drive => is_drivable(highway) && !forbids_cars(tags),
        NetworkType::All => !matches!(
            highway,
            "proposed" | "planned" | "construction" | "abandoned" | "platform" | "raceway" | "razed"
                | "no"
        ),
    };
    included.then(|| direction(highway, tags))
}

/// Road classes a car may use.
fn is_drivable(highway: &str) -> bool {
    matches!(
        highway,
        "motorway" | "motorway_link"
            | "trunk" | "trunk_link"
            | "primary" | "primary_link"
            | "secondary" | "secondary_link"
            | "tertiary" | "tertiary_link"
            | "residential" | "living_street"
            | "service" | "unclassified" | "road"
    )
}

fn forbids_cars(tags: &[(&str, &str)]) -> bool {
    matches!(tag(tags, "access"), Some("no" | "private"))
        || matches!(tag(tags, "motor_vehicle"), Some("no" | "private"))
        || tag(tags, "motorcar") == Some("no")
}

/// Motorways and roundabouts are implicitly one-way in OSM convention.
fn direction(highway: &str, tags: &[(&str, &str)]) -> Direction {
    match tag(tags, "oneway") {
        Some("yes" | "true" | "1") => Direction::Forward,
        Some("-1" | "reverse") => Direction::Backward,
        Some("no" | "false" | "0") => Direction::Both,
        _ if tag(tags, "junction") == Some("roundabout") => Direction::Forward,
        _ if matches!(highway, "motorway") => Direction::Forward,
        _ => Direction::Both,
    }
}
