//! Shortening of `.po` files as they are downloaded from translation platforms.
//!
//! The placeholders of the header comment are replaced, e-mail addresses and source
//! references are removed, so the files stay small and stable under version control.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r" ?<[^@]+@[^>]+>").unwrap();
    static ref LAST_TRANSLATOR: Regex =
        Regex::new(r#"(msgid ""\nmsgstr ""\n("[^\n]+\n)*)"Last-Translator: [^\n]+\n"#).unwrap();
}

/// Values for the placeholders in the header comment of a `.po` file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShortenOptions {
    /// Replaces `SOME DESCRIPTIVE TITLE.`
    pub title: String,
    /// Replaces `THE PACKAGE'S COPYRIGHT HOLDER`
    pub copyright_holder: String,
    /// Replaces `PACKAGE` in `PACKAGE package`
    pub package_name: String,
}

impl ShortenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_copyright_holder(mut self, copyright_holder: impl Into<String>) -> Self {
        self.copyright_holder = copyright_holder.into();
        self
    }

    pub fn with_package_name(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = package_name.into();
        self
    }
}

fn is_header_comment(line: &str) -> bool {
    line.starts_with("# ") || line == "#"
}

/// Shortens the lines of a `.po` file, returns the new content.
///
/// - the header comment is the run of leading lines starting with `"# "` (or being `"#"`),
///   its placeholders are replaced and e-mail addresses are removed
/// - source references (`#: `) and flags (`#, `) after the header comment are dropped
/// - trailing whitespace is trimmed from every line and from the end of the file
/// - the `Last-Translator` line is removed from the header entry
///
/// The result always ends with exactly one newline.
pub fn shorten_po_file<S: AsRef<str>>(lines: &[S], options: &ShortenOptions) -> String {
    let header_end = lines
        .iter()
        .position(|line| !is_header_comment(line.as_ref()))
        .unwrap_or(lines.len());
    let (header, body) = lines.split_at(header_end);

    let header = header.iter().map(|line| {
        let line = line
            .as_ref()
            .replace("SOME DESCRIPTIVE TITLE.", &options.title)
            .replace("THE PACKAGE'S COPYRIGHT HOLDER", &options.copyright_holder)
            .replace("PACKAGE package", &format!("{} package", options.package_name));
        EMAIL.replace_all(&line, "").into_owned()
    });
    let body = body
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|line| !line.starts_with("#, ") && !line.starts_with("#: "))
        .map(str::to_string);

    let joined = header
        .chain(body)
        .map(|line| line.trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n");
    let mut shortened = LAST_TRANSLATOR
        .replace_all(joined.trim_end(), "${1}")
        .into_owned();
    shortened.push('\n');
    shortened
}
