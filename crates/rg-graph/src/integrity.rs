//! Structural checks on a finished document.
//!
//! A document produced by [`Canonicalizer`](crate::Canonicalizer) from a
//! validated raw network always passes; the check guards against a Source
//! that broke its contract in ways the builder cannot see, and against
//! hand-edited documents read back with [`GraphDocument::from_json_slice`].

use std::collections::BTreeSet;

use crate::model::GraphDocument;
use crate::{GraphError, GraphResult};

/// Verify keys, referential integrity, adjacency, weights, and geometry.
///
/// # Errors
///
/// [`GraphError::Integrity`] describing the first violation found.
pub fn check_integrity(doc: &GraphDocument) -> GraphResult<()> {
    let fail = |msg: String| Err(GraphError::Integrity(msg));

    let mut listed = 0usize;
    for (key, node) in &doc.nodes {
        if *key != node.id {
            return fail(format!("node keyed {key:?} has id {:?}", node.id));
        }
        let mut unique: BTreeSet<&str> = BTreeSet::new();
        for nb in &node.neighbors {
            let Some(edge) = doc.edges.get(nb) else {
                return fail(format!("node {key:?} lists missing edge {nb:?}"));
            };
            if edge.from != node.id {
                return fail(format!("node {key:?} lists edge {nb:?} which starts at {:?}", edge.from));
            }
            if !unique.insert(nb.as_str()) {
                return fail(format!("node {key:?} lists edge {nb:?} twice"));
            }
        }
        listed += node.neighbors.len();
    }

    for (key, edge) in &doc.edges {
        if *key != edge.id {
            return fail(format!("edge keyed {key:?} has id {:?}", edge.id));
        }
        for end in [&edge.from, &edge.to] {
            if !doc.nodes.contains_key(end) {
                return fail(format!("edge {key:?} references missing node {end:?}"));
            }
        }
        if !edge.weight.is_finite() || edge.weight < 0.0 {
            return fail(format!("edge {key:?} has invalid weight {}", edge.weight));
        }
        if edge.geometry.len() < 2 {
            return fail(format!("edge {key:?} has {} geometry point(s)", edge.geometry.len()));
        }
        if edge.geometry.iter().any(|p| !p.lat.is_finite() || !p.lng.is_finite()) {
            return fail(format!("edge {key:?} has a non-finite geometry coordinate"));
        }
    }

    // Every listed neighbor is a distinct edge leaving its node, so equal
    // counts mean every edge is listed exactly once.
    if listed != doc.edges.len() {
        return fail(format!(
            "{} edges but {listed} neighbor entries",
            doc.edges.len()
        ));
    }
    Ok(())
}
