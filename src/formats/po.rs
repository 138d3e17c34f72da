//! Support for the textual gettext `.po` format.
//!
//! See <https://www.gnu.org/software/gettext/manual/html_node/PO-Files.html>.
//! Comments and other metadata are disregarded when decoding and never written.

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    error::Error,
    header::normalize_header,
    traits::TranslationFormat,
    types::{MessageId, MessageText, TranslationTable},
};

lazy_static! {
    static ref MSGCTXT: Regex = Regex::new(r#"^msgctxt "(.*)"$"#).unwrap();
    static ref MSGID: Regex = Regex::new(r#"^msgid "(.*)"$"#).unwrap();
    static ref MSGID_PLURAL: Regex = Regex::new(r#"^msgid_plural "(.*)"$"#).unwrap();
    static ref MSGSTR: Regex = Regex::new(r#"^msgstr "(.*)"$"#).unwrap();
    static ref MSGSTR_INDEXED: Regex = Regex::new(r#"^msgstr\[([0-9]+)\] "(.*)"$"#).unwrap();
}

/// Characters that are legal in messages, but most likely a mistake.
const SUSPICIOUS_CHARACTERS: [(char, &str); 4] = [
    ('\u{07}', "\\a"),
    ('\u{08}', "\\b"),
    ('\u{0C}', "\\f"),
    ('\r', "\\r"),
];

/// Checks the base messages for common mistakes.
///
/// Returns one warning per kind of problem, empty if there are none.
pub fn check_translations(table: &TranslationTable) -> Vec<String> {
    SUSPICIOUS_CHARACTERS
        .iter()
        .filter_map(|(character, label)| {
            let count = table
                .keys()
                .filter(|id| id.text.strings().iter().any(|s| s.contains(*character)))
                .count();
            (count >= 1).then(|| {
                format!(
                    "Internationalized messages should not contain the '{label}' escape sequence! \
                     ({count} of them do contain it)"
                )
            })
        })
        .collect()
}

/// Encodes the table to the content of a `.po` file.
///
/// The header entry is normalized first, then all entries are written in ascending
/// [`MessageId`] order, separated by blank lines.
pub fn encode_to_string(table: &TranslationTable) -> Result<String, Error> {
    let normalized = normalize_header(table);
    let mut entries: Vec<(&MessageId, &MessageText)> = normalized.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let blocks = entries
        .into_iter()
        .map(|(id, text)| encode_entry(id, text))
        .collect::<Result<Vec<_>, _>>()?;
    let mut content = blocks.join("\n\n");
    content.push('\n');
    Ok(content)
}

/// Encodes the table to the UTF-8 bytes of a `.po` file.
pub fn encode(table: &TranslationTable) -> Result<Vec<u8>, Error> {
    encode_to_string(table).map(String::into_bytes)
}

fn encode_entry(id: &MessageId, text: &MessageText) -> Result<String, Error> {
    let mut lines = Vec::new();
    if let Some(context) = &id.context {
        lines.push(format!("msgctxt \"{}\"", escape(context)));
    }
    match id.text.strings() {
        [singular] => lines.push(format!("msgid \"{}\"", quoted_lines(singular))),
        [singular, plural] => {
            lines.push(format!("msgid \"{}\"", quoted_lines(singular)));
            lines.push(format!("msgid_plural \"{}\"", quoted_lines(plural)));
        }
        strings => {
            return Err(Error::InvalidArgument(format!(
                "Only one or two msgids are allowed in PO files (found {} for '{id}')!",
                strings.len()
            )));
        }
    }
    if id.text.is_plural() {
        for (index, string) in text.strings().iter().enumerate() {
            lines.push(format!("msgstr[{index}] \"{}\"", quoted_lines(string)));
        }
    } else {
        lines.push(format!("msgstr \"{}\"", quoted_lines(text.first())));
    }
    Ok(lines.join("\n"))
}

/// The escaped string, spread over one line per contained newline.
///
/// Multiline strings start with an empty string on the keyword line.
fn quoted_lines(string: &str) -> String {
    if !string.contains('\n') {
        return escape(string);
    }
    let pieces: Vec<String> = string.split('\n').map(escape).collect();
    format!("\"\n  \"{}", pieces.join("\\n\"\n  \""))
}

/// Escapes C style, except for `?`, `'` and ESC which `msgfmt` does not expect escaped.
pub fn escape(string: &str) -> String {
    let mut escaped = String::with_capacity(string.len());
    for character in string.chars() {
        match character {
            '\\' => escaped.push_str("\\\\"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\u{07}' => escaped.push_str("\\a"),
            '\u{08}' => escaped.push_str("\\b"),
            '\u{0C}' => escaped.push_str("\\f"),
            '\u{0B}' => escaped.push_str("\\v"),
            '"' => escaped.push_str("\\\""),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Reverses [`escape`], additionally understands octal (`\nnn`) and hexadecimal (`\xHH`) escapes.
///
/// Unknown escape sequences are kept as they are.
pub fn unescape(string: &str) -> String {
    let mut unescaped = String::with_capacity(string.len());
    let mut chars = string.chars().peekable();
    while let Some(character) = chars.next() {
        if character != '\\' {
            unescaped.push(character);
            continue;
        }
        match chars.next() {
            None => unescaped.push('\\'),
            Some('\\') => unescaped.push('\\'),
            Some('r') => unescaped.push('\r'),
            Some('t') => unescaped.push('\t'),
            Some('n') => unescaped.push('\n'),
            Some('a') => unescaped.push('\u{07}'),
            Some('b') => unescaped.push('\u{08}'),
            Some('f') => unescaped.push('\u{0C}'),
            Some('v') => unescaped.push('\u{0B}'),
            Some('"') => unescaped.push('"'),
            Some(first @ '0'..='7') => {
                let mut value = first.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                unescaped.extend(char::from_u32(value));
            }
            Some('x') if chars.peek().is_some_and(char::is_ascii_hexdigit) => {
                let mut value = 0;
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(16)) {
                        Some(digit) => {
                            value = value * 16 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                unescaped.extend(char::from_u32(value));
            }
            Some(other) => {
                unescaped.push('\\');
                unescaped.push(other);
            }
        }
    }
    unescaped
}

/// A line with content, after joining continuation lines.
struct Line {
    /// 1-based number of the first physical line
    number: usize,
    text: String,
}

/// Joins continuation lines (a line ending with `"` directly followed by a line
/// starting with `"`), then drops blank lines and comments.
fn logical_lines(content: &str) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();
    for (index, physical) in content.lines().enumerate() {
        let trimmed = physical.trim();
        match lines.last_mut() {
            Some(last) if last.text.ends_with('"') && trimmed.starts_with('"') => {
                last.text.pop();
                last.text.push_str(&trimmed[1..]);
            }
            _ => lines.push(Line {
                number: index + 1,
                text: trimmed.to_string(),
            }),
        }
    }
    lines.retain(|line| !line.text.is_empty() && !line.text.starts_with('#'));
    lines
}

struct Parser {
    lines: Vec<Line>,
    position: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Line> {
        self.lines.get(self.position)
    }

    /// Consumes the current line if it matches, returning the capture groups.
    fn next_if(&mut self, regex: &Regex) -> Option<Vec<String>> {
        let captures = regex.captures(&self.peek()?.text)?;
        let groups = captures
            .iter()
            .skip(1)
            .map(|group| group.map_or_else(String::new, |m| m.as_str().to_string()))
            .collect();
        self.position += 1;
        Some(groups)
    }

    fn next_string(&mut self, regex: &Regex) -> Option<String> {
        self.next_if(regex)
            .and_then(|groups| groups.into_iter().next())
            .map(|escaped| unescape(&escaped))
    }

    fn unexpected(&self, expected: &str) -> Error {
        match self.peek() {
            Some(line) => Error::syntax(format!(
                "Syntax error on line {}: This line was expected to be a `{expected}` line ({})",
                line.number, line.text
            )),
            None => Error::syntax(format!(
                "Syntax error: The file ended unexpectedly, a `{expected}` line was expected"
            )),
        }
    }

    fn parse_entry(&mut self) -> Result<(MessageId, MessageText), Error> {
        let context = self.next_string(&MSGCTXT);
        let singular = self
            .next_string(&MSGID)
            .ok_or_else(|| self.unexpected("msgid"))?;
        let plural = self.next_string(&MSGID_PLURAL);

        let translation = match &plural {
            Some(_) => self.parse_plural_forms(&singular)?,
            None => MessageText::singular(
                self.next_string(&MSGSTR)
                    .ok_or_else(|| self.unexpected("msgstr"))?,
            ),
        };

        let text = match plural {
            Some(plural) => MessageText::with_plurals(singular, [plural]),
            None => MessageText::singular(singular),
        };
        let id = match context {
            Some(context) => MessageId::with_context(text, context),
            None => MessageId::new(text),
        };
        Ok((id, translation))
    }

    fn parse_plural_forms(&mut self, msgid: &str) -> Result<MessageText, Error> {
        let first_line = self.peek().map(|line| line.number);
        let mut forms: Vec<(usize, String)> = Vec::new();
        while let Some(groups) = self.next_if(&MSGSTR_INDEXED) {
            let [index, escaped] = <[String; 2]>::try_from(groups)
                .map_err(|_| Error::syntax("Malformed indexed msgstr line"))?;
            let index = index.parse::<usize>().map_err(|e| {
                Error::syntax(format!(
                    "Syntax error: Invalid plural index '{index}' for '{msgid}': {e}"
                ))
            })?;
            forms.push((index, unescape(&escaped)));
        }

        if forms.is_empty() {
            return Err(match first_line {
                Some(number) => Error::syntax(format!(
                    "Syntax error on line {number}: The plural forms for '{msgid}' must not be empty!"
                )),
                None => Error::syntax(format!(
                    "Syntax error: The plural forms for '{msgid}' must not be empty!"
                )),
            });
        }

        forms.sort_by_key(|(index, _)| *index);
        for (actual, (found, _)) in forms.iter().enumerate() {
            if *found != actual {
                let indices: Vec<String> = forms.iter().map(|(i, _)| i.to_string()).collect();
                return Err(Error::syntax(format!(
                    "Syntax error: The translations for '{msgid}' are missing msgstr[{actual}] \
                     (only found indices {})",
                    indices.join(", ")
                )));
            }
        }
        MessageText::new(forms.into_iter().map(|(_, form)| form))
    }
}

/// Decodes the content of a `.po` file.
///
/// If the same message occurs more than once, the last one wins.
pub fn decode_str(content: &str) -> Result<TranslationTable, Error> {
    let mut parser = Parser {
        lines: logical_lines(content),
        position: 0,
    };
    let mut table = TranslationTable::new();
    while parser.peek().is_some() {
        let (id, text) = parser.parse_entry()?;
        table.insert(id, text);
    }
    Ok(table)
}

/// Decodes the UTF-8 bytes of a `.po` file.
pub fn decode(bytes: &[u8]) -> Result<TranslationTable, Error> {
    let content = std::str::from_utf8(bytes)
        .map_err(|e| Error::malformed(format!("The PO file is not valid UTF-8: {e}")))?;
    decode_str(content)
}

/// The `.po` format as [`TranslationFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoFormat;

impl TranslationFormat for PoFormat {
    fn decode(&self, bytes: &[u8]) -> Result<TranslationTable, Error> {
        decode(bytes)
    }

    fn encode(&self, table: &TranslationTable) -> Result<Vec<u8>, Error> {
        encode(table)
    }
}
