//! Command-line interface module.

mod args;
pub mod common;
pub mod convert;
pub mod inspect;

pub use args::{Cli, Commands};
