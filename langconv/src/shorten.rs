use crate::validation::{validate_input_path, validate_output_dir};

use josm_i18n::{Codec, FormatType, ShortenOptions, shorten_po_file};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Placeholder values for the header comments, the title defaults to one
/// naming the package and the language of each file.
#[derive(Debug, Clone, Default)]
pub struct ShortenConfig {
    pub package_name: String,
    pub title: Option<String>,
    pub copyright_holder: String,
}

impl ShortenConfig {
    fn options_for(&self, language: &str) -> ShortenOptions {
        let title = self.title.clone().unwrap_or_else(|| {
            format!(
                "Translations for the JOSM plugin '{}' ({})",
                self.package_name, language
            )
        });
        ShortenOptions::new()
            .with_title(title)
            .with_copyright_holder(self.copyright_holder.clone())
            .with_package_name(self.package_name.clone())
    }
}

/// Shortens a single `.po` file or all `.po` files of a directory.
///
/// Without an output directory the files are rewritten in place.
/// Returns the written paths.
pub fn shorten_po_files(
    input: &Path,
    output: Option<&Path>,
    config: &ShortenConfig,
) -> Result<Vec<PathBuf>, String> {
    validate_input_path(input)?;
    let files = if input.is_dir() {
        Codec::input_files(input, FormatType::Po)
            .map_err(|e| format!("Error listing the files of {}: {}", input.display(), e))?
    } else {
        vec![input.to_path_buf()]
    };
    if let Some(output) = output {
        validate_output_dir(output)?;
    }

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let content = fs::read_to_string(&file)
            .map_err(|e| format!("Error reading {}: {}", file.display(), e))?;
        let language = file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let lines: Vec<&str> = content.lines().collect();
        let shortened = shorten_po_file(&lines, &config.options_for(&language));

        let target = match (output, file.file_name()) {
            (Some(dir), Some(name)) => dir.join(name),
            _ => file.clone(),
        };
        fs::write(&target, shortened)
            .map_err(|e| format!("Error writing {}: {}", target.display(), e))?;
        info!(
            "Shortened {} ({} → {} bytes)",
            target.display(),
            content.len(),
            fs::metadata(&target).map(|m| m.len()).unwrap_or(0)
        );
        written.push(target);
    }
    Ok(written)
}
