use std::path::Path;
use unic_langid::LanguageIdentifier;

/// Validate that the input path exists, it may be a single file or a directory
pub fn validate_input_path(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!(
            "The given input file/directory does not exist or you can't read from it!: {}",
            path.display()
        ));
    }
    if !(path.is_file() || path.is_dir()) {
        return Err(format!(
            "The input is neither a file nor a directory: {}",
            path.display()
        ));
    }
    Ok(())
}

/// Validate the output directory, creating it if it doesn't exist yet
pub fn validate_output_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| {
            format!(
                "Can't create the output directory {}: {}",
                path.display(),
                e
            )
        })?;
    }
    if !path.is_dir() {
        return Err(format!(
            "The argument given as output directory is not a directory!: {}",
            path.display()
        ));
    }
    Ok(())
}

/// Validate language code format using unic-langid.
///
/// gettext file names use `_` between language and region (`en_GB`), which is
/// accepted as well.
pub fn validate_language_code(lang: &str) -> Result<(), String> {
    if lang.is_empty() {
        return Err("Language code cannot be empty".to_string());
    }

    match lang.parse::<LanguageIdentifier>() {
        Ok(_) => Ok(()),
        Err(_) => Err(format!(
            "Invalid language code format: {}. Expected valid BCP 47 language identifier",
            lang
        )),
    }
}
