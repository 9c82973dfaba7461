//! The `NetworkSource` trait implemented by every raw-network provider.

use rg_core::Region;

use crate::{RawNetwork, SourceResult};

/// Produces the raw directed multigraph for one region.
///
/// Implementations are blocking and stateless across calls: fetching the
/// same region twice yields the same network, and fetching one region never
/// affects another.
pub trait NetworkSource {
    /// Short label used in log lines.
    fn name(&self) -> &str;

    /// Acquire the network inside `region.bbox`, filtered by
    /// `region.network_type`.
    ///
    /// # Errors
    ///
    /// Any [`SourceError`](crate::SourceError).  A network without nodes is
    /// reported as [`SourceError::EmptyNetwork`](crate::SourceError::EmptyNetwork).
    fn fetch(&self, region: &Region) -> SourceResult<RawNetwork>;
}
