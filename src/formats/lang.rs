//! Support for the compact `.lang` format read by JOSM at runtime.
//!
//! A set of `.lang` files consists of one file for the base language and one file per
//! translated language. All of them list the messages in the same order, a translated
//! file only makes sense together with the base file.
//!
//! Layout of every file:
//! - singular section: one record per message with exactly one grammatical form,
//!   a big-endian `u16` byte length followed by the UTF-8 bytes
//! - the separator `0xFF 0xFF`
//! - plural section: one record per message with two or more grammatical forms,
//!   a `u8` form count followed by one length-prefixed string per form
//!
//! In translated files some length/count values are sentinels: `0` means the message
//! is not translated, `0xFFFE` (singular) or `0xFE` (plural) means the translation is
//! identical to the base language. A plural count of `0xFF` is reserved.
//!
//! The base file embeds the context into the first form as `"_:" + context + "\n" + form`.

use std::collections::{HashMap, HashSet};

use crate::{
    error::Error,
    types::{MessageId, MessageText, TranslationTable},
};

/// The longest string (in UTF-8 bytes) that fits into a record.
pub const MAX_STRING_BYTES: usize = 0xFFFD;
/// The highest number of grammatical forms a plural record can hold.
pub const MAX_FORM_COUNT: usize = 0xFD;

const SECTION_SEPARATOR: [u8; 2] = [0xFF, 0xFF];
const END_OF_SINGULARS: u16 = 0xFFFF;
const SAME_AS_BASE_LENGTH: u16 = 0xFFFE;
const SAME_AS_BASE_COUNT: u8 = 0xFE;
const RESERVED_COUNT: u8 = 0xFF;
const CONTEXT_PREFIX: &str = "_:";

/// The language code that is the base language unless stated otherwise.
pub const DEFAULT_BASE_LANGUAGE: &str = "en";

/// A single message slot of a `.lang` file, independent of its byte representation.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Record<T> {
    Missing,
    SameAsBase,
    Explicit(T),
}

impl<T> Record<T> {
    fn map<U>(self, f: impl FnOnce(T) -> U) -> Record<U> {
        match self {
            Record::Missing => Record::Missing,
            Record::SameAsBase => Record::SameAsBase,
            Record::Explicit(value) => Record::Explicit(f(value)),
        }
    }
}

/// Encodes the base language and translations of it into `.lang` files.
///
/// The encoder is built from the base messages once and can then encode any number of
/// languages. It holds no mutable state, so it can be shared between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LangEncoder {
    singulars: Vec<MessageId>,
    plurals: Vec<MessageId>,
}

impl LangEncoder {
    /// Creates an encoder for the given base messages.
    ///
    /// The header entry and duplicates are dropped. Singular and plural messages keep
    /// the order in which they are first encountered.
    pub fn new<'a, I>(base_messages: I) -> Self
    where
        I: IntoIterator<Item = &'a MessageId>,
    {
        let mut seen = HashSet::new();
        let (plurals, singulars): (Vec<MessageId>, Vec<MessageId>) = base_messages
            .into_iter()
            .filter(|id| !id.is_header() && seen.insert(*id))
            .cloned()
            .partition(|id| id.text.is_plural());
        LangEncoder { singulars, plurals }
    }

    /// Creates an encoder for the keys of `base`, in ascending [`MessageId`] order.
    pub fn from_table(base: &TranslationTable) -> Self {
        let mut ids: Vec<&MessageId> = base.keys().collect();
        ids.sort();
        LangEncoder::new(ids)
    }

    /// The base messages in file order (all singulars, then all plurals).
    pub fn base_messages(&self) -> impl Iterator<Item = &MessageId> {
        self.singulars.iter().chain(self.plurals.iter())
    }

    /// Encodes the `.lang` file of the base language.
    pub fn encode_base(&self) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        for id in &self.singulars {
            write_string(&mut out, &with_embedded_context(id, 0))?;
        }
        out.extend_from_slice(&SECTION_SEPARATOR);
        for id in &self.plurals {
            write_count(&mut out, id.text.form_count())?;
            for index in 0..id.text.form_count() {
                write_string(&mut out, &with_embedded_context(id, index))?;
            }
        }
        Ok(out)
    }

    /// Encodes the `.lang` file of a translated language.
    ///
    /// Entries of `translations` whose key is not a base message are disregarded,
    /// base messages without an entry are encoded as not translated.
    pub fn encode(&self, translations: &TranslationTable) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        for id in &self.singulars {
            let record = record_for(id, translations);
            if let Record::Explicit(text) = &record {
                if text.is_plural() {
                    return Err(Error::InvalidArgument(format!(
                        "The singular message '{}' has a translation with {} grammatical forms, \
                         the *.lang format only allows one!",
                        id,
                        text.form_count()
                    )));
                }
            }
            write_singular_record(&mut out, record.map(MessageText::first))?;
        }
        out.extend_from_slice(&SECTION_SEPARATOR);
        for id in &self.plurals {
            write_plural_record(&mut out, record_for(id, translations))?;
        }
        Ok(out)
    }
}

fn record_for<'a>(id: &MessageId, translations: &'a TranslationTable) -> Record<&'a MessageText> {
    match translations.get(id) {
        None => Record::Missing,
        Some(text) if *text == id.text => Record::SameAsBase,
        Some(text) => Record::Explicit(text),
    }
}

fn with_embedded_context(id: &MessageId, index: usize) -> String {
    let form = &id.text.strings()[index];
    match &id.context {
        Some(context) if index == 0 => format!("{CONTEXT_PREFIX}{context}\n{form}"),
        _ => form.clone(),
    }
}

fn write_singular_record(out: &mut Vec<u8>, record: Record<&str>) -> Result<(), Error> {
    match record {
        // an empty string would be written as length 0, which reads back as "not translated"
        Record::Missing | Record::Explicit("") => out.extend_from_slice(&[0, 0]),
        Record::SameAsBase => out.extend_from_slice(&SAME_AS_BASE_LENGTH.to_be_bytes()),
        Record::Explicit(string) => write_string(out, string)?,
    }
    Ok(())
}

fn write_plural_record(out: &mut Vec<u8>, record: Record<&MessageText>) -> Result<(), Error> {
    match record {
        Record::Missing => out.push(0),
        Record::SameAsBase => out.push(SAME_AS_BASE_COUNT),
        Record::Explicit(text) => {
            write_count(out, text.form_count())?;
            for string in text.strings() {
                write_string(out, string)?;
            }
        }
    }
    Ok(())
}

fn write_count(out: &mut Vec<u8>, count: usize) -> Result<(), Error> {
    if count > MAX_FORM_COUNT {
        return Err(Error::LimitExceeded(format!(
            "The *.lang format only supports up to {MAX_FORM_COUNT} grammatical numbers \
             (singular and plural forms)! {count} forms were provided."
        )));
    }
    out.push(count as u8);
    Ok(())
}

fn write_string(out: &mut Vec<u8>, string: &str) -> Result<(), Error> {
    let bytes = string.as_bytes();
    if bytes.len() > MAX_STRING_BYTES {
        return Err(Error::LimitExceeded(format!(
            "The *.lang format only supports strings up to {MAX_STRING_BYTES} UTF-8 bytes in length! \
             A string with {} bytes was provided.",
            bytes.len()
        )));
    }
    out.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
    out.extend_from_slice(bytes);
    Ok(())
}

/// Decodes `.lang` files of translated languages against the messages of a base language file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LangDecoder {
    base_messages: Vec<MessageId>,
}

impl LangDecoder {
    /// Decodes the base language file and keeps its messages for decoding translations.
    pub fn new(base_bytes: &[u8]) -> Result<Self, Error> {
        let base_messages = read_records(base_bytes, None, true)?
            .into_iter()
            .filter_map(|record| match record {
                Record::Explicit(forms) => Some(forms),
                Record::Missing | Record::SameAsBase => None,
            })
            .map(base_message_from_forms)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LangDecoder { base_messages })
    }

    /// Uses an already known list of base messages.
    ///
    /// The list is brought into file order the same way [`LangEncoder::new`] does it:
    /// the header entry and duplicates are dropped, singulars come before plurals.
    pub fn from_base_messages(base_messages: Vec<MessageId>) -> Self {
        LangDecoder {
            base_messages: LangEncoder::new(&base_messages)
                .base_messages()
                .cloned()
                .collect(),
        }
    }

    /// The messages of the base language in the order of the `.lang` file.
    pub fn base_messages(&self) -> &[MessageId] {
        &self.base_messages
    }

    /// The base language as translation table, every message maps to its own text.
    pub fn base_table(&self) -> TranslationTable {
        self.base_messages
            .iter()
            .map(|id| (id.clone(), id.text.clone()))
            .collect()
    }

    /// Decodes the `.lang` file of a translated language.
    ///
    /// The result contains an entry for every base message that is translated,
    /// untranslated messages are left out.
    pub fn decode(&self, bytes: &[u8]) -> Result<TranslationTable, Error> {
        let records = read_records(bytes, Some(self.base_messages.len()), false)?;
        let mut table = TranslationTable::new();
        for (id, record) in self.base_messages.iter().zip(records) {
            match record {
                Record::Missing => {}
                Record::SameAsBase => {
                    table.insert(id.clone(), id.text.clone());
                }
                Record::Explicit(forms) => {
                    table.insert(id.clone(), MessageText::new(forms)?);
                }
            }
        }
        Ok(table)
    }
}

fn base_message_from_forms(mut forms: Vec<String>) -> Result<MessageId, Error> {
    let embedded = forms[0]
        .strip_prefix(CONTEXT_PREFIX)
        .and_then(|rest| rest.split_once('\n'))
        .map(|(context, form)| (context.to_string(), form.to_string()));
    match embedded {
        Some((context, form)) => {
            forms[0] = form;
            Ok(MessageId::with_context(MessageText::new(forms)?, context))
        }
        None => Ok(MessageId::new(MessageText::new(forms)?)),
    }
}

enum SingularToken {
    EndOfSection,
    Record(Record<String>),
}

/// Reads all records of a file. With `limit`, reading stops after that many records.
///
/// The end of the data between two records ends the file, in the singular
/// section it also means there are no plural records. A base file must not
/// contain any sentinel records.
fn read_records(
    bytes: &[u8],
    limit: Option<usize>,
    base: bool,
) -> Result<Vec<Record<Vec<String>>>, Error> {
    let limit = limit.unwrap_or(usize::MAX);
    let mut reader = ByteReader::new(bytes);
    let mut records = Vec::new();

    while records.len() < limit {
        match read_singular(&mut reader)? {
            None => return Ok(records),
            Some(SingularToken::EndOfSection) => break,
            Some(SingularToken::Record(record)) => {
                check_base_record(&record, records.len(), base)?;
                records.push(record.map(|s| vec![s]));
            }
        }
    }

    while records.len() < limit {
        match read_plural(&mut reader, records.len())? {
            None => break,
            Some(record) => {
                check_base_record(&record, records.len(), base)?;
                records.push(record);
            }
        }
    }

    Ok(records)
}

fn check_base_record<T>(record: &Record<T>, index: usize, base: bool) -> Result<(), Error> {
    if !base {
        return Ok(());
    }
    match record {
        Record::Explicit(_) => Ok(()),
        Record::Missing => Err(Error::InconsistentBaseLanguage(format!(
            "This is not a base language! Message {index} is marked as not translated \
             from the base language (which does not make sense)."
        ))),
        Record::SameAsBase => Err(Error::InconsistentBaseLanguage(format!(
            "This is not a base language! Message {index} is marked as the same as \
             in the base language (which does not make sense)."
        ))),
    }
}

fn read_singular(reader: &mut ByteReader) -> Result<Option<SingularToken>, Error> {
    let Some(length) = reader.read_u16()? else {
        return Ok(None);
    };
    let token = match length {
        END_OF_SINGULARS => SingularToken::EndOfSection,
        SAME_AS_BASE_LENGTH => SingularToken::Record(Record::SameAsBase),
        0 => SingularToken::Record(Record::Missing),
        length => SingularToken::Record(Record::Explicit(reader.read_string(length as usize)?)),
    };
    Ok(Some(token))
}

fn read_plural(
    reader: &mut ByteReader,
    message_index: usize,
) -> Result<Option<Record<Vec<String>>>, Error> {
    let Some(count) = reader.read_u8() else {
        return Ok(None);
    };
    let record = match count {
        RESERVED_COUNT => {
            return Err(Error::UnsupportedSentinel(format!(
                "Illegal 0xFF byte for message {message_index}! The *.lang file format only \
                 supports up to {MAX_FORM_COUNT} grammatical numbers."
            )));
        }
        SAME_AS_BASE_COUNT => Record::SameAsBase,
        0 => Record::Missing,
        count => {
            let mut forms = Vec::with_capacity(count as usize);
            for form_index in 0..count {
                let position = reader.position;
                let length = reader.read_u16()?.ok_or_else(|| {
                    Error::malformed(format!(
                        "File ended unexpectedly. Expected to find msgstr[{form_index}] \
                         for message[{message_index}] at bytes[{position}]!"
                    ))
                })?;
                forms.push(reader.read_string(length as usize)?);
            }
            Record::Explicit(forms)
        }
    };
    Ok(Some(record))
}

struct ByteReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        ByteReader { bytes, position: 0 }
    }

    fn read_u8(&mut self) -> Option<u8> {
        let byte = *self.bytes.get(self.position)?;
        self.position += 1;
        Some(byte)
    }

    /// `None` if no byte is left, an error if only one byte is left.
    fn read_u16(&mut self) -> Result<Option<u16>, Error> {
        let Some(high) = self.read_u8() else {
            return Ok(None);
        };
        let low = self.read_u8().ok_or_else(|| {
            Error::malformed(format!(
                "Unexpected end of *.lang file in the middle of a two-byte length value (at index {})!",
                self.position - 1
            ))
        })?;
        Ok(Some(u16::from_be_bytes([high, low])))
    }

    fn read_string(&mut self, length: usize) -> Result<String, Error> {
        let start = self.position;
        let slice = self.bytes.get(start..start + length).ok_or_else(|| {
            Error::malformed(format!(
                "A string of {length} bytes at index {start} exceeds the end of the *.lang file ({} bytes)!",
                self.bytes.len()
            ))
        })?;
        self.position += length;
        String::from_utf8(slice.to_vec()).map_err(|e| {
            Error::malformed(format!("The string at index {start} is not valid UTF-8: {e}"))
        })
    }
}

/// Encodes the base language (ascending message order) to `.lang` bytes.
pub fn encode_base(base: &TranslationTable) -> Result<Vec<u8>, Error> {
    LangEncoder::from_table(base).encode_base()
}

/// Encodes a translated language against the given base messages.
pub fn encode(base_messages: &[MessageId], translations: &TranslationTable) -> Result<Vec<u8>, Error> {
    LangEncoder::new(base_messages).encode(translations)
}

/// Decodes a base language file, returning its table and the messages in file order.
pub fn decode_base(bytes: &[u8]) -> Result<(TranslationTable, Vec<MessageId>), Error> {
    let decoder = LangDecoder::new(bytes)?;
    let table = decoder.base_table();
    Ok((table, decoder.base_messages))
}

/// Decodes a translated language file against the same base messages that were passed to [`encode`].
pub fn decode(base_messages: &[MessageId], bytes: &[u8]) -> Result<TranslationTable, Error> {
    LangDecoder::from_base_messages(base_messages.to_vec()).decode(bytes)
}

/// Encodes a whole set of languages to `.lang` files.
///
/// The messages of `base_language` define the order for all files.
/// Fails with [`Error::InvalidArgument`] if there are no messages for `base_language`.
pub fn encode_lang_files(
    base_language: &str,
    tables: &HashMap<String, TranslationTable>,
) -> Result<HashMap<String, Vec<u8>>, Error> {
    let base = tables.get(base_language).ok_or_else(|| {
        Error::InvalidArgument(format!(
            "No messages for the base language '{base_language}' found!"
        ))
    })?;
    let encoder = LangEncoder::from_table(base);
    tables
        .iter()
        .map(|(language, table)| {
            let bytes = if language == base_language {
                encoder.encode_base()?
            } else {
                encoder.encode(table)?
            };
            Ok((language.clone(), bytes))
        })
        .collect()
}

/// Decodes a whole set of `.lang` files.
///
/// The result contains `base_language` (every message mapping to itself) and every
/// language of `others`.
pub fn decode_lang_files(
    base_language: &str,
    base_bytes: &[u8],
    others: &HashMap<String, Vec<u8>>,
) -> Result<HashMap<String, TranslationTable>, Error> {
    let decoder = LangDecoder::new(base_bytes)?;
    let mut result = others
        .iter()
        .map(|(language, bytes)| Ok((language.clone(), decoder.decode(bytes)?)))
        .collect::<Result<HashMap<_, _>, Error>>()?;
    result.insert(base_language.to_string(), decoder.base_table());
    Ok(result)
}
