//! All supported translation file formats.
//!
//! This module re-exports the codec of each format and provides
//! the [`FormatType`] enum for generic format handling across the crate.

pub mod lang;
pub mod mo;
pub mod po;

use std::{
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

// Reexporting the formats for easier access
pub use lang::{LangDecoder, LangEncoder};
pub use mo::MoFormat;
pub use po::PoFormat;

use crate::Error;

/// Represents all supported translation file formats for generic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatType {
    /// The compact JOSM `.lang` format (one file per language, positional).
    Lang,
    /// The binary gettext `.mo` format.
    Mo,
    /// The textual gettext `.po` format.
    Po,
}

/// Implements [`std::fmt::Display`] for [`FormatType`].
///
/// # Example
/// ```rust
/// use josm_i18n::formats::FormatType;
/// assert_eq!(FormatType::Lang.to_string(), "lang");
/// assert_eq!(FormatType::Mo.to_string(), "mo");
/// assert_eq!(FormatType::Po.to_string(), "po");
/// ```
impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Implements [`std::str::FromStr`] for [`FormatType`].
///
/// Accepts `"lang"`, `"mo"` and `"po"` case-insensitively, with or without a
/// leading dot. Returns [`crate::error::Error::UnknownFormat`] for anything else.
///
/// # Example
/// ```rust
/// use josm_i18n::formats::FormatType;
/// use std::str::FromStr;
/// assert_eq!(FormatType::from_str("MO").unwrap(), FormatType::Mo);
/// assert_eq!(FormatType::from_str(".lang").unwrap(), FormatType::Lang);
/// assert!(FormatType::from_str("pot").is_err());
/// ```
impl FromStr for FormatType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches('.').to_ascii_lowercase();
        match s.as_str() {
            "lang" => Ok(FormatType::Lang),
            "mo" => Ok(FormatType::Mo),
            "po" => Ok(FormatType::Po),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl FormatType {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Lang => "lang",
            FormatType::Mo => "mo",
            FormatType::Po => "po",
        }
    }

    /// Whether the files of this format can only be read with the base language file.
    pub fn is_positional(&self) -> bool {
        matches!(self, FormatType::Lang)
    }
}

/// Infers the format from the extension of `path`, `None` if it is not supported.
pub fn infer_format_from_extension<P: AsRef<Path>>(path: P) -> Option<FormatType> {
    path.as_ref()
        .extension()
        .and_then(|extension| extension.to_str())
        .and_then(|extension| extension.parse().ok())
}
