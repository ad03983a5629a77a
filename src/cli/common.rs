//! Common utilities shared across CLI commands.

use std::path::Path;

use anyhow::Result;

use crate::image::Document;
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// Open a document and log its size and layer table.
pub fn open_document(path: &Path) -> Result<Document> {
    log!("open"; "{}", path.display());
    let doc = Document::open(path)?;

    let (width, height) = doc.dimensions();
    debug!("open"; "format: {}", doc.kind());
    log!("open"; "size: {} x {}, {}", width, height, plural_count(doc.layers().len(), "layer"));
    for (i, layer) in doc.layers().iter().enumerate() {
        log!(
            "layer";
            "{}: {}, visible: {}, opacity: {}",
            i,
            layer.name,
            layer.visible,
            layer.opacity
        );
    }

    Ok(doc)
}
