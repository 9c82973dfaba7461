//! `rg-core`: foundational types for the `roadgraph` extraction pipeline.
//!
//! This crate is a dependency of every other `rg-*` crate.  It has no `rg-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`ids`]      | `SourceId` (opaque source token), `NodeIdx`, `EdgeIdx`     |
//! | [`geo`]      | `GeoPoint`, `BoundingBox`, haversine distance              |
//! | [`region`]   | `Region`, `NetworkType`, `RegionRegistry`, selectors       |
//! | [`error`]    | `CoreError`, `CoreResult`                                  |

pub mod error;
pub mod geo;
pub mod ids;
pub mod region;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{BoundingBox, GeoPoint};
pub use ids::{EdgeIdx, NodeIdx, SourceId};
pub use region::{NetworkType, Region, RegionRegistry, ALL_SELECTOR};
