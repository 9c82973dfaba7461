//! Per-region extraction: acquire → canonicalize → check → write.

use anyhow::Result;
use log::info;

use rg_core::Region;
use rg_graph::{check_integrity, Canonicalizer, GraphWriter, WrittenDocument};
use rg_source::NetworkSource;

/// One forward pass per region; no state survives between regions.
pub struct Pipeline {
    source:        Box<dyn NetworkSource>,
    canonicalizer: Canonicalizer,
    writer:        GraphWriter,
}

impl Pipeline {
    pub fn new(source: Box<dyn NetworkSource>, canonicalizer: Canonicalizer, writer: GraphWriter) -> Self {
        Self { source, canonicalizer, writer }
    }

    /// Extract `region` and write its document.  Any failure leaves no
    /// document for this region behind.
    pub fn extract(&self, region: &Region) -> Result<WrittenDocument> {
        info!(
            "{}: acquiring {} network in {} via {}",
            region.name,
            region.network_type,
            region.bbox,
            self.source.name()
        );
        let raw = self.source.fetch(region)?;
        info!("{}: raw graph: {} nodes, {} edges", region.name, raw.node_count(), raw.edge_count());

        let doc = self.canonicalizer.canonicalize(&raw);
        drop(raw);
        check_integrity(&doc)?;

        let written = self.writer.write(region, &doc)?;
        info!("wrote {}", written.path.display());
        info!(
            "  {} nodes, {} edges, {:.1} MB",
            doc.node_count(),
            doc.edge_count(),
            written.bytes as f64 / (1024.0 * 1024.0)
        );
        Ok(written)
    }
}
