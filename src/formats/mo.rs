//! Support for the binary gettext `.mo` format.
//!
//! See <https://www.gnu.org/software/gettext/manual/html_node/MO-Files.html>.
//! The encoder never writes a hashing table, consumers fall back to binary search
//! over the sorted original strings.

use crate::{
    byte_quad::{ByteQuad, Endianness, quads_to_bytes},
    error::Error,
    header::normalize_header,
    traits::TranslationFormat,
    types::{MessageId, MessageText, TranslationTable},
};

/// The magic number of `.mo` files, the byte order it is stored in determines
/// the byte order of the whole file.
pub const MAGIC: u32 = 0x9504_12de;
/// 7 numbers of 32 bit each.
pub const HEADER_SIZE: usize = 28;
/// Terminates every string and separates grammatical forms.
pub const NULL_BYTE: u8 = 0x00;
/// Separates the context from the message.
pub const CONTEXT_SEPARATOR: u8 = 0x04;

/// Encoder and decoder for `.mo` files.
///
/// The byte order only matters for encoding, decoding detects it from the magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoFormat {
    pub endianness: Endianness,
}

impl MoFormat {
    pub const BIG_ENDIAN: MoFormat = MoFormat {
        endianness: Endianness::Big,
    };
    pub const LITTLE_ENDIAN: MoFormat = MoFormat {
        endianness: Endianness::Little,
    };

    pub fn new(endianness: Endianness) -> Self {
        MoFormat { endianness }
    }

    /// Encodes the table to a `.mo` file.
    ///
    /// The header entry is normalized first (see [`normalize_header`]), then all
    /// entries are written in ascending [`MessageId`] order.
    pub fn encode(&self, table: &TranslationTable) -> Result<Vec<u8>, Error> {
        let normalized = normalize_header(table);
        let mut entries: Vec<(&MessageId, &MessageText)> = normalized.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let originals: Vec<Vec<u8>> = entries.iter().map(|(id, _)| message_id_to_bytes(id)).collect();
        let translations: Vec<Vec<u8>> = entries.iter().map(|(_, text)| text_to_bytes(text)).collect();

        let count = entries.len();
        let originals_table = HEADER_SIZE;
        let translations_table = originals_table + 8 * count;
        let strings_start = translations_table + 8 * count;

        let mut descriptors = Vec::with_capacity(4 * count);
        let mut offset = strings_start;
        for string in originals.iter().chain(translations.iter()) {
            descriptors.push(self.quad(string.len(), "string length")?);
            descriptors.push(self.quad(offset, "string offset")?);
            offset += string.len() + 1;
        }

        let header = [
            ByteQuad::from_u32(MAGIC, self.endianness),
            // file format revision
            ByteQuad::from_u32(0, self.endianness),
            self.quad(count, "number of strings")?,
            self.quad(originals_table, "offset of the original strings")?,
            self.quad(translations_table, "offset of the translated strings")?,
            // size of the hashing table
            ByteQuad::from_u32(0, self.endianness),
            self.quad(strings_start, "offset of the hashing table")?,
        ];

        let mut out = Vec::with_capacity(offset);
        out.extend(quads_to_bytes(&header));
        out.extend(quads_to_bytes(&descriptors));
        for string in originals.iter().chain(translations.iter()) {
            out.extend_from_slice(string);
            out.push(NULL_BYTE);
        }
        Ok(out)
    }

    fn quad(&self, value: usize, what: &str) -> Result<ByteQuad, Error> {
        let value = u32::try_from(value).map_err(|_| {
            Error::LimitExceeded(format!(
                "The {what} ({value}) does not fit into the 32 bit numbers of a *.mo file!"
            ))
        })?;
        Ok(ByteQuad::from_u32(value, self.endianness))
    }
}

impl TranslationFormat for MoFormat {
    /// Decodes a `.mo` file in either byte order, regardless of `self.endianness`.
    fn decode(&self, bytes: &[u8]) -> Result<TranslationTable, Error> {
        decode(bytes)
    }

    fn encode(&self, table: &TranslationTable) -> Result<Vec<u8>, Error> {
        MoFormat::encode(self, table)
    }
}

/// Encodes the table to a `.mo` file in the given byte order.
pub fn encode(table: &TranslationTable, endianness: Endianness) -> Result<Vec<u8>, Error> {
    MoFormat::new(endianness).encode(table)
}

/// Returns the byte order of a `.mo` file, `None` if the magic number is missing.
pub fn detect_endianness(bytes: &[u8]) -> Option<Endianness> {
    let magic = ByteQuad::read_at(bytes, 0)?;
    [Endianness::Big, Endianness::Little]
        .into_iter()
        .find(|endianness| magic.value(*endianness) == MAGIC)
}

/// Decodes a `.mo` file in either byte order.
///
/// If an original string occurs more than once, the last one wins.
pub fn decode(bytes: &[u8]) -> Result<TranslationTable, Error> {
    if bytes.len() < HEADER_SIZE {
        return Err(Error::malformed(format!(
            "This MO file is too short ({} bytes), it must be at least {HEADER_SIZE} bytes long!",
            bytes.len()
        )));
    }
    let endianness = detect_endianness(bytes)
        .ok_or_else(|| Error::malformed("Not a MO file, the magic bytes are incorrect!"))?;
    let word = |index: usize| -> Result<usize, Error> { read_number(bytes, index, endianness) };

    // the revision at 4 and the hashing table at 20 and 24 are ignored
    let count = word(8)?;
    let originals_table = word(12)?;
    let translations_table = word(16)?;

    let mut table = TranslationTable::new();
    for index in 0..count {
        let original = read_string(bytes, originals_table, index, endianness)?;
        let translation = read_string(bytes, translations_table, index, endianness)?;
        table.insert(message_id_from_bytes(original)?, text_from_bytes(translation)?);
    }
    Ok(table)
}

fn read_number(bytes: &[u8], index: usize, endianness: Endianness) -> Result<usize, Error> {
    ByteQuad::read_at(bytes, index)
        .map(|quad| quad.value(endianness) as usize)
        .ok_or_else(|| {
            Error::malformed(format!(
                "Unexpected end of the MO file, expected a 32 bit number at bytes {index}..{}!",
                index.saturating_add(3)
            ))
        })
}

/// Reads the string of the `index`th descriptor of the table starting at `table_start`.
fn read_string(
    bytes: &[u8],
    table_start: usize,
    index: usize,
    endianness: Endianness,
) -> Result<&[u8], Error> {
    let descriptor = index
        .checked_mul(8)
        .and_then(|relative| relative.checked_add(table_start))
        .ok_or_else(|| Error::malformed(format!("The descriptor of string {index} is out of range!")))?;
    let length = read_number(bytes, descriptor, endianness)?;
    let offset = read_number(bytes, descriptor.saturating_add(4), endianness)?;
    // the terminating NUL byte has to be inside the file, too
    match offset.checked_add(length) {
        Some(end) if end < bytes.len() => Ok(&bytes[offset..end]),
        _ => Err(Error::malformed(format!(
            "The string length and offset at bytes {descriptor}..{} are pointing to somewhere \
             outside of the file (length is {length}, offset is {offset})!",
            descriptor.saturating_add(7)
        ))),
    }
}

/// Serializes a message id as `context 0x04 forms`, the forms separated by `0x00`.
/// Without context, the separator is left out.
pub fn message_id_to_bytes(id: &MessageId) -> Vec<u8> {
    let mut bytes = Vec::new();
    if let Some(context) = &id.context {
        bytes.extend_from_slice(context.as_bytes());
        bytes.push(CONTEXT_SEPARATOR);
    }
    bytes.extend(text_to_bytes(&id.text));
    bytes
}

/// Reverses [`message_id_to_bytes`]. The first `0x04` byte separates the context.
pub fn message_id_from_bytes(bytes: &[u8]) -> Result<MessageId, Error> {
    match bytes.iter().position(|b| *b == CONTEXT_SEPARATOR) {
        Some(separator) => Ok(MessageId::with_context(
            text_from_bytes(&bytes[separator + 1..])?,
            utf8(&bytes[..separator])?,
        )),
        None => Ok(MessageId::new(text_from_bytes(bytes)?)),
    }
}

fn text_to_bytes(text: &MessageText) -> Vec<u8> {
    text.strings().join("\0").into_bytes()
}

fn text_from_bytes(bytes: &[u8]) -> Result<MessageText, Error> {
    MessageText::new(
        bytes
            .split(|b| *b == NULL_BYTE)
            .map(utf8)
            .collect::<Result<Vec<_>, _>>()?,
    )
}

fn utf8(bytes: &[u8]) -> Result<String, Error> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| Error::malformed(format!("A string in the MO file is not valid UTF-8: {e}")))
}
