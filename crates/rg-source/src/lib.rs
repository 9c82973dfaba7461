//! `rg-source`: the raw road multigraph and the sources that produce it.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `RawNetwork` (CSR), `RawNetworkBuilder`, `RawEdge`          |
//! | [`source`]  | `NetworkSource` trait                                       |
//! | [`json`]    | `JsonSource`: pre-extracted raw networks on disk            |
//! | [`osm`]     | `PbfSource` (feature = `"osm"` only)                        |
//! | [`error`]   | `SourceError`, `SourceResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag  | Effect                                                        |
//! |-------|---------------------------------------------------------------|
//! | `osm` | Enables OSM PBF extraction via the `osmpbf` crate.            |

pub mod error;
pub mod json;
pub mod network;
pub mod source;

#[cfg(feature = "osm")]
pub mod osm;


pub use error::{SourceError, SourceResult};
pub use json::JsonSource;
pub use network::{RawEdge, RawNetwork, RawNetworkBuilder};
pub use source::NetworkSource;

#[cfg(feature = "osm")]
pub use osm::PbfSource;
