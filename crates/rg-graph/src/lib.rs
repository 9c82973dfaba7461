//! `rg-graph`: the canonical graph document and how it is produced.
//!
//! A [`RawNetwork`](rg_source::RawNetwork) goes in; a [`GraphDocument`] with
//! stable string ids, rounded weights, and `{lat, lng}` geometry comes out.
//!
//! | Module           | Contents                                                 |
//! |------------------|----------------------------------------------------------|
//! | [`model`]        | `GraphDocument`, `CanonicalNode`, `CanonicalEdge`, `LatLng` |
//! | [`canonicalize`] | `Canonicalizer`, `CoordPrecision`, weight/geometry policy |
//! | [`integrity`]    | `check_integrity`                                        |
//! | [`writer`]       | `GraphWriter`: temp-file-then-rename JSON output         |
//! | [`error`]        | `GraphError`, `GraphResult<T>`                           |
//!
//! # Usage
//!
//! ```rust,ignore
//! use rg_graph::{Canonicalizer, CoordPrecision, GraphWriter};
//!
//! let doc = Canonicalizer::new(CoordPrecision::Five).canonicalize(&raw);
//! rg_graph::check_integrity(&doc)?;
//! GraphWriter::new("data").write(&region, &doc)?;
//! ```

pub mod canonicalize;
pub mod error;
pub mod integrity;
pub mod model;
pub mod writer;

#[cfg(test)]
mod tests;

pub use canonicalize::{edge_id, Canonicalizer, CoordPrecision};
pub use error::{GraphError, GraphResult};
pub use integrity::check_integrity;
pub use model::{CanonicalEdge, CanonicalNode, GraphDocument, LatLng};
pub use writer::{GraphWriter, WrittenDocument};
