//! `flatdim convert`: flatten, recolor, write PNG.

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::common::open_document;
use crate::config::ToolConfig;
use crate::image::export::save_png;
use crate::image::recolor_dark_pixels;
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// What a successful conversion produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSummary {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub recolored: usize,
    pub bytes: usize,
}

/// Run the full pipeline for the configured input.
///
/// A missing input fails before anything is decoded or written.
pub fn run(config: &ToolConfig) -> Result<ConvertSummary> {
    let output = config.output();
    let doc = open_document(config.input())?;

    log!("composite"; "flattening visible layers");
    let mut canvas = doc.composite()?;
    drop(doc);

    log!("recolor"; "muting dark pixels to #9CA3AF");
    let stats = recolor_dark_pixels(&mut canvas);
    log!(
        "recolor";
        "recolored {} of {}",
        stats.recolored,
        plural_count(stats.total, "pixel")
    );

    log!("save"; "{}", output.display());
    let bytes = save_png(&canvas, &output)?;
    debug!("save"; "wrote {} bytes", bytes);

    log!("done"; "{}", output.display());
    Ok(ConvertSummary {
        output,
        width: canvas.width(),
        height: canvas.height(),
        recolored: stats.recolored,
        bytes,
    })
}
