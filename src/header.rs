//! Normalization of the gettext header entry (the translation of the empty message id).

use crate::types::{MessageId, MessageText, TranslationTable};

/// The content type line every encoded `.mo`/`.po` header carries.
pub const CONTENT_TYPE_UTF8: &str = "Content-Type: text/plain; charset=UTF-8";

/// Returns a copy of `table` whose header entry declares UTF-8 as content type.
///
/// A missing header is added. In the first grammatical form of the header, blank
/// lines and existing `Content-Type:` lines are dropped and the UTF-8 content type
/// is appended, each line terminated by `\n`. Further forms are kept as they are.
pub fn normalize_header(table: &TranslationTable) -> TranslationTable {
    let mut normalized = table.clone();
    let header = normalized
        .remove(&MessageId::header())
        .unwrap_or_else(|| MessageText::singular(""));
    normalized.insert(MessageId::header(), normalize_header_text(&header));
    normalized
}

fn normalize_header_text(header: &MessageText) -> MessageText {
    let mut strings = header.strings().to_vec();
    let mut first: String = strings[0]
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with("Content-Type:"))
        .chain(std::iter::once(CONTENT_TYPE_UTF8))
        .collect::<Vec<_>>()
        .join("\n");
    first.push('\n');
    strings[0] = first;
    MessageText::with_plurals(strings.remove(0), strings)
}
