//! Image processing.
//!
//! # Modules
//!
//! - [`document`]: Open layered documents and flatten them
//! - [`recolor`]: Mute dark ink to `#9CA3AF`
//! - [`export`]: PNG encoding and output
//! - [`error`]: Typed pipeline failures

pub mod document;
pub mod error;
pub mod export;
pub mod recolor;

pub use document::{Document, LayerInfo};
pub use error::ProcessError;
pub use recolor::{RecolorStats, recolor_dark_pixels};
