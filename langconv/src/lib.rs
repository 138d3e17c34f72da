//! CLI library for testing purposes

pub mod convert;
pub mod shorten;
pub mod stats;
pub mod validation;

pub use convert::{ConversionMode, ConversionSummary, ConvertOptions, run_conversion};
pub use shorten::{ShortenConfig, shorten_po_files};
pub use stats::{progress_bar, stats_lines};
