//! This module provides the `Codec` struct, which holds the translations of a set of
//! languages and reads them from or writes them to directories of translation files.
//!
//! Every language lives in its own file named `<language>.<extension>`. The `.lang`
//! files can only be read together with the file of the base language.

use std::{
    collections::{HashMap, HashSet},
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::{
    byte_quad::Endianness,
    error::Error,
    formats::{FormatType, LangEncoder, MoFormat, PoFormat, infer_format_from_extension, lang, mo},
    traits::TranslationFormat,
    types::{MessageId, TranslationTable},
};

/// Translations of several languages, one of them being the base language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Codec {
    /// The language the messages are written in.
    pub base_language: String,
    /// Language code → translations of that language.
    pub languages: HashMap<String, TranslationTable>,
}

/// Translation statistics of a single language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageStats {
    pub language: String,
    /// Number of translated messages (without the header entry).
    pub translated: usize,
}

/// Translation statistics of a [`Codec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationStats {
    pub base_language: String,
    /// Number of base messages (without the header entry).
    pub base_messages: usize,
    /// All other languages, most translated messages first.
    pub languages: Vec<LanguageStats>,
}

/// Encodes the languages of one [`Codec`] into one target format.
///
/// Creating the encoder does all the work that is shared between languages,
/// encoding the single languages can then happen in parallel.
#[derive(Debug, Clone)]
pub enum LanguageEncoder {
    Lang {
        base_language: String,
        encoder: LangEncoder,
    },
    Mo(MoFormat),
    Po(PoFormat),
}

impl LanguageEncoder {
    pub fn format(&self) -> FormatType {
        match self {
            LanguageEncoder::Lang { .. } => FormatType::Lang,
            LanguageEncoder::Mo(_) => FormatType::Mo,
            LanguageEncoder::Po(_) => FormatType::Po,
        }
    }

    /// Encodes the translations of `language` to the content of its file.
    pub fn encode(&self, language: &str, table: &TranslationTable) -> Result<Vec<u8>, Error> {
        match self {
            LanguageEncoder::Lang {
                base_language,
                encoder,
            } => {
                if language == base_language {
                    encoder.encode_base()
                } else {
                    encoder.encode(table)
                }
            }
            LanguageEncoder::Mo(format) => format.encode(table),
            LanguageEncoder::Po(format) => TranslationFormat::encode(format, table),
        }
    }
}

impl Codec {
    /// Creates a new, empty `Codec`.
    pub fn new(base_language: impl Into<String>) -> Self {
        Codec {
            base_language: base_language.into(),
            languages: HashMap::new(),
        }
    }

    /// Adds or replaces the translations of a language.
    pub fn insert(
        &mut self,
        language: impl Into<String>,
        table: TranslationTable,
    ) -> Option<TranslationTable> {
        self.languages.insert(language.into(), table)
    }

    pub fn get(&self, language: &str) -> Option<&TranslationTable> {
        self.languages.get(language)
    }

    /// The language codes in alphabetical order.
    pub fn language_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.languages.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Lists the files of `dir` (not of its subdirectories) that are suitable as input
    /// for `format`, sorted by path.
    ///
    /// `.mo` files are recognized by their magic number, all other formats by extension.
    pub fn input_files<P: AsRef<Path>>(dir: P, format: FormatType) -> Result<Vec<PathBuf>, Error> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let suitable = match format {
                FormatType::Mo => has_mo_magic(&path)?,
                FormatType::Lang | FormatType::Po => {
                    infer_format_from_extension(&path) == Some(format)
                }
            };
            if suitable {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Reads a set of files of one format, the language code is the file name
    /// without extension.
    ///
    /// For `.lang` files the file of `base_language` has to be among them.
    pub fn read_files(
        paths: &[PathBuf],
        format: FormatType,
        base_language: &str,
    ) -> Result<Self, Error> {
        check_unique_languages(paths)?;
        let mut codec = Codec::new(base_language);
        match format {
            FormatType::Lang => {
                let (base, others): (Vec<&PathBuf>, Vec<&PathBuf>) = paths
                    .iter()
                    .partition(|path| language_of(path) == base_language);
                let base_path = base.first().ok_or_else(|| {
                    Error::InvalidArgument(format!(
                        "No {base_language}.lang file is given, the file of the base language \
                         is needed to read *.lang files!"
                    ))
                })?;
                let others = others
                    .into_iter()
                    .map(|path| Ok((language_of(path), fs::read(path)?)))
                    .collect::<Result<HashMap<_, _>, Error>>()?;
                codec.languages =
                    lang::decode_lang_files(base_language, &fs::read(base_path)?, &others)?;
            }
            FormatType::Mo | FormatType::Po => {
                for path in paths {
                    codec.read_file(path, format)?;
                }
            }
        }
        Ok(codec)
    }

    /// Reads all suitable files of `dir`, see [`Codec::input_files`] and [`Codec::read_files`].
    pub fn read_dir<P: AsRef<Path>>(
        dir: P,
        format: FormatType,
        base_language: &str,
    ) -> Result<Self, Error> {
        let files = Codec::input_files(dir, format)?;
        Codec::read_files(&files, format, base_language)
    }

    /// Reads the file of a single language into this codec.
    ///
    /// Fails with [`Error::UnsupportedFormat`] for `.lang` files, which can't be
    /// decoded on their own.
    pub fn read_file<P: AsRef<Path>>(&mut self, path: P, format: FormatType) -> Result<(), Error> {
        let path = path.as_ref();
        let table = match format {
            FormatType::Mo => MoFormat::default().read_from(path)?,
            FormatType::Po => PoFormat.read_from(path)?,
            FormatType::Lang => {
                return Err(Error::UnsupportedFormat(format!(
                    "A single *.lang file can't be read without its base language ({})",
                    path.display()
                )));
            }
        };
        self.languages.insert(language_of(path), table);
        Ok(())
    }

    /// Prepares encoding the languages of this codec to `format`.
    ///
    /// For `.lang` the base language defines the messages (ascending order) of all
    /// files, so it has to be present. `endianness` only matters for `.mo`.
    pub fn encoder(&self, format: FormatType, endianness: Endianness) -> Result<LanguageEncoder, Error> {
        Ok(match format {
            FormatType::Lang => LanguageEncoder::Lang {
                base_language: self.base_language.clone(),
                encoder: LangEncoder::from_table(self.base_table()?),
            },
            FormatType::Mo => LanguageEncoder::Mo(MoFormat::new(endianness)),
            FormatType::Po => LanguageEncoder::Po(PoFormat),
        })
    }

    /// Encodes a single language.
    pub fn encode_language(
        &self,
        language: &str,
        format: FormatType,
        endianness: Endianness,
    ) -> Result<Vec<u8>, Error> {
        let table = self.languages.get(language).ok_or_else(|| {
            Error::InvalidArgument(format!("No messages for the language '{language}' found!"))
        })?;
        self.encoder(format, endianness)?.encode(language, table)
    }

    /// Encodes all languages, returns language code → file content.
    pub fn encode_all(
        &self,
        format: FormatType,
        endianness: Endianness,
    ) -> Result<HashMap<String, Vec<u8>>, Error> {
        let encoder = self.encoder(format, endianness)?;
        self.languages
            .iter()
            .map(|(language, table)| Ok((language.clone(), encoder.encode(language, table)?)))
            .collect()
    }

    /// Writes one file per language into `dir` (created if missing), returns the written paths.
    pub fn write_dir<P: AsRef<Path>>(
        &self,
        dir: P,
        format: FormatType,
        endianness: Endianness,
    ) -> Result<Vec<PathBuf>, Error> {
        let encoded = self.encode_all(format, endianness)?;
        write_files(dir, format, &encoded)
    }

    fn base_table(&self) -> Result<&TranslationTable, Error> {
        self.languages.get(&self.base_language).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "No messages for the base language '{}' found!",
                self.base_language
            ))
        })
    }

    /// Counts the base messages and the translated messages of every other language.
    ///
    /// Without translations for the base language, all messages of all languages
    /// count as base messages.
    pub fn stats(&self) -> TranslationStats {
        let base_messages = match self.languages.get(&self.base_language) {
            Some(base) => count_messages(base.keys()),
            None => count_messages(
                self.languages
                    .values()
                    .flat_map(|table| table.keys())
                    .collect::<HashSet<_>>(),
            ),
        };
        let mut languages: Vec<LanguageStats> = self
            .languages
            .iter()
            .filter(|(language, _)| **language != self.base_language)
            .map(|(language, table)| LanguageStats {
                language: language.clone(),
                translated: count_messages(table.keys()),
            })
            .collect();
        languages.sort_by(|a, b| {
            b.translated
                .cmp(&a.translated)
                .then_with(|| a.language.cmp(&b.language))
        });
        TranslationStats {
            base_language: self.base_language.clone(),
            base_messages,
            languages,
        }
    }
}

/// Writes `<dir>/<language>.<extension>` for every entry, returns the paths sorted.
pub fn write_files<P: AsRef<Path>>(
    dir: P,
    format: FormatType,
    files: &HashMap<String, Vec<u8>>,
) -> Result<Vec<PathBuf>, Error> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(files.len());
    for (language, bytes) in files {
        let path = dir.join(format!("{language}.{}", format.extension()));
        fs::write(&path, bytes)?;
        written.push(path);
    }
    written.sort();
    Ok(written)
}

fn count_messages<'a, I: IntoIterator<Item = &'a MessageId>>(ids: I) -> usize {
    ids.into_iter().filter(|id| !id.is_header()).count()
}

/// The language code of a translation file, its name without extension.
fn language_of(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn has_mo_magic(path: &Path) -> Result<bool, Error> {
    let mut magic = Vec::with_capacity(4);
    fs::File::open(path)?.take(4).read_to_end(&mut magic)?;
    Ok(mo::detect_endianness(&magic).is_some())
}

fn check_unique_languages(paths: &[PathBuf]) -> Result<(), Error> {
    let mut by_language: HashMap<String, Vec<&Path>> = HashMap::new();
    for path in paths {
        by_language.entry(language_of(path)).or_default().push(path);
    }
    let mut duplicates: Vec<String> = by_language
        .values()
        .filter(|paths| paths.len() > 1)
        .flatten()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();
    if duplicates.is_empty() {
        return Ok(());
    }
    duplicates.sort();
    Err(Error::InvalidArgument(format!(
        "There is more than one file with the same name ({})! \
         This would lead to name collisions with the output files.",
        duplicates.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageText;
    use tempfile::tempdir;

    fn sample_codec() -> Codec {
        let mut codec = Codec::new("en");
        codec.insert(
            "en",
            [
                (MessageId::from("Hello"), MessageText::from("Hello")),
                (MessageId::from("World"), MessageText::from("World")),
            ]
            .into_iter()
            .collect(),
        );
        codec.insert(
            "de",
            [(MessageId::from("Hello"), MessageText::from("Hallo"))]
                .into_iter()
                .collect(),
        );
        codec
    }

    #[test]
    fn test_stats() {
        let mut codec = sample_codec();
        codec.insert("fr", TranslationTable::new());
        let mut with_header = TranslationTable::new();
        with_header.insert(MessageId::header(), MessageText::from("Language: it\n"));
        with_header.insert(MessageId::from("World"), MessageText::from("Mondo"));
        codec.insert("it", with_header);

        let stats = codec.stats();
        assert_eq!(stats.base_messages, 2);
        let languages: Vec<(&str, usize)> = stats
            .languages
            .iter()
            .map(|s| (s.language.as_str(), s.translated))
            .collect();
        assert_eq!(languages, vec![("de", 1), ("it", 1), ("fr", 0)]);
    }

    #[test]
    fn test_stats_without_base_language() {
        let mut codec = sample_codec();
        codec.languages.remove("en");
        codec.insert(
            "es",
            [(MessageId::from("Other"), MessageText::from("Otro"))]
                .into_iter()
                .collect(),
        );
        assert_eq!(codec.stats().base_messages, 2);
    }

    #[test]
    fn test_lang_round_trip_through_directory() {
        let dir = tempdir().unwrap();
        let codec = sample_codec();
        let written = codec
            .write_dir(dir.path(), FormatType::Lang, Endianness::Little)
            .unwrap();
        assert_eq!(
            written,
            vec![dir.path().join("de.lang"), dir.path().join("en.lang")]
        );

        let read = Codec::read_dir(dir.path(), FormatType::Lang, "en").unwrap();
        assert_eq!(read, codec);
    }

    #[test]
    fn test_lang_requires_base_language() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("de.lang"), [0xFF, 0xFF]).unwrap();
        assert!(matches!(
            Codec::read_dir(dir.path(), FormatType::Lang, "en"),
            Err(Error::InvalidArgument(_))
        ));

        let mut codec = sample_codec();
        codec.languages.remove("en");
        assert!(matches!(
            codec.encode_all(FormatType::Lang, Endianness::Little),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_mo_files_are_selected_by_magic_number() {
        let dir = tempdir().unwrap();
        let codec = sample_codec();
        codec
            .write_dir(dir.path(), FormatType::Mo, Endianness::Big)
            .unwrap();
        fs::rename(dir.path().join("de.mo"), dir.path().join("de.bin")).unwrap();
        fs::write(dir.path().join("notes.mo"), b"not a mo file").unwrap();
        fs::write(dir.path().join("tiny"), [0x95]).unwrap();

        let files = Codec::input_files(dir.path(), FormatType::Mo).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("de.bin"), dir.path().join("en.mo")]
        );

        let read = Codec::read_files(&files, FormatType::Mo, "en").unwrap();
        assert_eq!(read.language_codes(), vec!["de", "en"]);
        assert_eq!(
            read.get("de").unwrap()[&MessageId::from("Hello")],
            MessageText::from("Hallo")
        );
    }

    #[test]
    fn test_duplicate_language_files() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("de.mo");
        let second = dir.path().join("de.bin");
        assert!(matches!(
            Codec::read_files(&[first, second], FormatType::Mo, "en"),
            Err(Error::InvalidArgument(message)) if message.contains("de.bin, de.mo")
        ));
    }

    #[test]
    fn test_po_file() {
        let dir = tempdir().unwrap();
        let codec = sample_codec();
        let written = codec
            .write_dir(dir.path(), FormatType::Po, Endianness::default())
            .unwrap();
        assert_eq!(written.len(), 2);

        let mut read = Codec::new("en");
        read.read_file(dir.path().join("de.po"), FormatType::Po).unwrap();
        let de = read.get("de").unwrap();
        assert_eq!(de.len(), 2);
        assert!(de.contains_key(&MessageId::header()));
    }

    #[test]
    fn test_single_lang_file_is_unsupported() {
        let mut codec = Codec::new("en");
        assert!(matches!(
            codec.read_file("en.lang", FormatType::Lang),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_encode_language() {
        let codec = sample_codec();
        let bytes = codec
            .encode_language("de", FormatType::Lang, Endianness::Little)
            .unwrap();
        // "Hello" translated, "World" not translated
        assert_eq!(bytes, b"\x00\x05Hallo\x00\x00\xFF\xFF".to_vec());
        assert!(matches!(
            codec.encode_language("xx", FormatType::Po, Endianness::Little),
            Err(Error::InvalidArgument(_))
        ));
    }
}
