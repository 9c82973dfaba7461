//! Atomic document output.
//!
//! The document is encoded fully in memory, written to a temp file in the
//! destination directory, synced, then renamed over the destination.  A
//! reader of `<region>-graph.json` therefore sees either the previous
//! complete file or the new complete file, never a partial one.  On failure
//! the temp file is deleted when its handle drops.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;

use rg_core::Region;

use crate::model::GraphDocument;
use crate::GraphResult;

/// Where a document ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrittenDocument {
    pub path:  PathBuf,
    pub bytes: u64,
}

/// Writes one graph document per region into an output directory.
pub struct GraphWriter {
    out_dir: PathBuf,
}

impl GraphWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self { out_dir: out_dir.into() }
    }

    /// Destination of `region`'s document.
    pub fn path_for(&self, region: &Region) -> PathBuf {
        self.out_dir.join(region.output_file_name())
    }

    /// Write `doc` as `region`'s document, creating the directory if needed.
    pub fn write(&self, region: &Region, doc: &GraphDocument) -> GraphResult<WrittenDocument> {
        let path = self.path_for(region);
        let bytes = write_document(&path, doc)?;
        Ok(WrittenDocument { path, bytes })
    }
}

/// Write `doc` to `path` atomically and return the number of bytes written.
pub fn write_document(path: &Path, doc: &GraphDocument) -> GraphResult<u64> {
    let encoded = doc.to_json_vec()?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(&encoded)?;
    staged.as_file().sync_all()?;
    debug!("staged {} bytes at {}", encoded.len(), staged.path().display());

    staged.persist(path)?;
    Ok(encoded.len() as u64)
}
