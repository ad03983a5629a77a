//! `flatdim inspect`: describe a document without writing anything.

use anyhow::Result;

use crate::cli::common::open_document;
use crate::config::ToolConfig;
use crate::log;

/// Log size and layers of the configured input.
pub fn run(config: &ToolConfig) -> Result<()> {
    let doc = open_document(config.input())?;
    let visible = doc.layers().iter().filter(|layer| layer.visible).count();
    log!("inspect"; "{} of {} layers visible", visible, doc.layers().len());
    Ok(())
}
