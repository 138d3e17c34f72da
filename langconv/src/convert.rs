use crate::stats::print_stats;
use crate::validation::{validate_input_path, validate_language_code, validate_output_dir};

use josm_i18n::{
    Codec, Endianness, FormatType, TranslationStats, codec::write_files, formats::po,
};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// The conversions offered by `langconv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionMode {
    Mo2Lang,
    Lang2Mo,
    Po2Mo,
    Mo2Po,
    Po2Lang,
}

impl ConversionMode {
    pub fn input_format(self) -> FormatType {
        match self {
            ConversionMode::Mo2Lang | ConversionMode::Mo2Po => FormatType::Mo,
            ConversionMode::Lang2Mo => FormatType::Lang,
            ConversionMode::Po2Mo | ConversionMode::Po2Lang => FormatType::Po,
        }
    }

    pub fn output_format(self) -> FormatType {
        match self {
            ConversionMode::Lang2Mo | ConversionMode::Po2Mo => FormatType::Mo,
            ConversionMode::Mo2Lang | ConversionMode::Po2Lang => FormatType::Lang,
            ConversionMode::Mo2Po => FormatType::Po,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub base_language: String,
    /// Byte order of written `.mo` files.
    pub endianness: Endianness,
    /// Print the statistics as JSON instead of logging them.
    pub json_stats: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            base_language: "en".to_string(),
            endianness: Endianness::default(),
            json_stats: false,
        }
    }
}

/// What a conversion did.
#[derive(Debug, Clone)]
pub struct ConversionSummary {
    pub output_dir: PathBuf,
    pub written: Vec<PathBuf>,
    pub stats: TranslationStats,
}

/// A directory is searched for input files (not recursively), a file is taken as is.
pub fn resolve_input_files(input: &Path, format: FormatType) -> Result<Vec<PathBuf>, String> {
    validate_input_path(input)?;
    if input.is_dir() {
        Codec::input_files(input, format)
            .map_err(|e| format!("Error listing the files of {}: {}", input.display(), e))
    } else {
        Ok(vec![input.to_path_buf()])
    }
}

/// The output directory defaults to the input directory, or the directory
/// containing the input file.
pub fn resolve_output_dir(input: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(output) => output.to_path_buf(),
        None if input.is_dir() => input.to_path_buf(),
        None => input
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}

/// Reads all input files, reports the statistics and writes one output file per language.
pub fn run_conversion(
    mode: ConversionMode,
    input: &Path,
    output: Option<&Path>,
    options: &ConvertOptions,
) -> Result<ConversionSummary, String> {
    let input_format = mode.input_format();
    let output_format = mode.output_format();

    let files = resolve_input_files(input, input_format)?;
    if files.is_empty() {
        warn!(
            "No *.{} files found in {}",
            input_format.extension(),
            input.display()
        );
    }
    let output_dir = resolve_output_dir(input, output);
    validate_output_dir(&output_dir)?;

    info!(
        "Converting {} {} file(s) to {}",
        files.len(),
        input_format,
        output_format
    );
    let codec = Codec::read_files(&files, input_format, &options.base_language)
        .map_err(|e| format!("Error reading the input files: {}", e))?;

    for language in codec.language_codes() {
        if let Err(e) = validate_language_code(language) {
            warn!("{}", e);
        }
    }

    let stats = codec.stats();
    print_stats(&stats, options.json_stats)?;

    if output_format == FormatType::Po {
        for (language, table) in &codec.languages {
            for warning in po::check_translations(table) {
                warn!("{}: {}", language, warning);
            }
        }
    }

    let encoder = codec
        .encoder(output_format, options.endianness)
        .map_err(|e| format!("Error preparing the {} output: {}", output_format, e))?;
    let encoded = codec
        .languages
        .par_iter()
        .map(|(language, table)| {
            debug!("Encoding {} ({} messages)", language, table.len());
            encoder
                .encode(language, table)
                .map(|bytes| (language.clone(), bytes))
                .map_err(|e| format!("Error encoding the language '{}': {}", language, e))
        })
        .collect::<Result<HashMap<String, Vec<u8>>, String>>()?;

    let written = write_files(&output_dir, output_format, &encoded)
        .map_err(|e| format!("Error writing into {}: {}", output_dir.display(), e))?;
    info!(
        "The files have been written successfully into {}",
        output_dir.display()
    );

    Ok(ConversionSummary {
        output_dir,
        written,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use josm_i18n::{MessageId, MessageText, TranslationTable};
    use std::fs;
    use tempfile::TempDir;

    fn write_mo(dir: &Path, language: &str, entries: &[(&str, &str)]) {
        let table: TranslationTable = entries
            .iter()
            .map(|(id, text)| (MessageId::from(*id), MessageText::from(*text)))
            .collect();
        let mut codec = Codec::new("en");
        codec.insert(language, table);
        codec
            .write_dir(dir, FormatType::Mo, Endianness::Little)
            .unwrap();
    }

    #[test]
    fn test_modes() {
        assert_eq!(ConversionMode::Mo2Lang.input_format(), FormatType::Mo);
        assert_eq!(ConversionMode::Mo2Lang.output_format(), FormatType::Lang);
        assert_eq!(ConversionMode::Lang2Mo.input_format(), FormatType::Lang);
        assert_eq!(ConversionMode::Po2Lang.input_format(), FormatType::Po);
        assert_eq!(ConversionMode::Mo2Po.output_format(), FormatType::Po);
    }

    #[test]
    fn test_resolve_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("de.mo");
        fs::write(&file, b"").unwrap();

        assert_eq!(resolve_output_dir(temp_dir.path(), None), temp_dir.path());
        assert_eq!(resolve_output_dir(&file, None), temp_dir.path());
        assert_eq!(
            resolve_output_dir(&file, Some(Path::new("out"))),
            PathBuf::from("out")
        );
        assert_eq!(resolve_output_dir(Path::new("de.mo"), None), PathBuf::from("."));
    }

    #[test]
    fn test_mo_to_lang_and_back() {
        let temp_dir = TempDir::new().unwrap();
        let lang_dir = temp_dir.path().join("lang");
        let mo_dir = temp_dir.path().join("mo");
        write_mo(temp_dir.path(), "en", &[("Open", "Open"), ("Close", "Close")]);
        write_mo(temp_dir.path(), "de", &[("Open", "Öffnen")]);
        // not a .mo file, ignored despite its name
        fs::write(temp_dir.path().join("fr.mo"), b"not a mo file").unwrap();

        let summary = run_conversion(
            ConversionMode::Mo2Lang,
            temp_dir.path(),
            Some(&lang_dir),
            &ConvertOptions::default(),
        )
        .unwrap();
        assert_eq!(
            summary.written,
            vec![lang_dir.join("de.lang"), lang_dir.join("en.lang")]
        );
        assert_eq!(summary.stats.base_messages, 2);
        assert_eq!(summary.stats.languages[0].translated, 1);

        let summary = run_conversion(
            ConversionMode::Lang2Mo,
            &lang_dir,
            Some(&mo_dir),
            &ConvertOptions::default(),
        )
        .unwrap();
        assert_eq!(summary.written.len(), 2);
        assert_eq!(
            fs::read(mo_dir.join("de.mo")).unwrap(),
            fs::read(temp_dir.path().join("de.mo")).unwrap()
        );
    }

    #[test]
    fn test_lang_to_mo_without_base_language() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("de.lang"), [0xFF, 0xFF]).unwrap();

        let error = run_conversion(
            ConversionMode::Lang2Mo,
            temp_dir.path(),
            None,
            &ConvertOptions::default(),
        )
        .unwrap_err();
        assert!(error.contains("en.lang"));
    }

    #[test]
    fn test_duplicate_languages() {
        let temp_dir = TempDir::new().unwrap();
        write_mo(temp_dir.path(), "de", &[("Open", "Öffnen")]);
        fs::copy(temp_dir.path().join("de.mo"), temp_dir.path().join("de.gmo")).unwrap();

        let error = run_conversion(
            ConversionMode::Mo2Po,
            temp_dir.path(),
            None,
            &ConvertOptions::default(),
        )
        .unwrap_err();
        assert!(error.contains("de.gmo"));
        assert!(error.contains("de.mo"));
    }

    #[test]
    fn test_single_po_file_to_big_endian_mo() {
        let temp_dir = TempDir::new().unwrap();
        let po_file = temp_dir.path().join("de.po");
        fs::write(&po_file, "msgid \"Open\"\nmsgstr \"Öffnen\"\n").unwrap();

        let options = ConvertOptions {
            endianness: Endianness::Big,
            ..ConvertOptions::default()
        };
        let summary = run_conversion(ConversionMode::Po2Mo, &po_file, None, &options).unwrap();
        assert_eq!(summary.output_dir, temp_dir.path());

        let bytes = fs::read(temp_dir.path().join("de.mo")).unwrap();
        assert_eq!(&bytes[..4], &[0x95, 0x04, 0x12, 0xde]);
    }
}
