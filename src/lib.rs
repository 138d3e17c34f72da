//! Translation file toolkit for JOSM and its plugins.
//!
//! Supports encoding and decoding the compact JOSM `.lang` format as well as the
//! gettext `.mo` (both byte orders) and `.po` formats. All conversion happens
//! through the format-agnostic [`TranslationTable`] of one language.
//!
//! The codecs are pure functions over in-memory bytes, they never log and never
//! block, so languages can be encoded and decoded in parallel.

#![forbid(unsafe_code)]

pub mod byte_quad;
pub mod codec;
pub mod error;
pub mod formats;
pub mod header;
pub mod po_shortener;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    byte_quad::{ByteQuad, Endianness},
    codec::{Codec, LanguageEncoder, LanguageStats, TranslationStats},
    error::Error,
    formats::{FormatType, LangDecoder, LangEncoder, MoFormat, PoFormat},
    header::normalize_header,
    po_shortener::{ShortenOptions, shorten_po_file},
    traits::TranslationFormat,
    types::{MessageId, MessageText, TranslationTable},
};
