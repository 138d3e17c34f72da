//! Core, format-agnostic types for josm-i18n.
//! Decoders produce these; encoders serialize these.

use std::{cmp::Ordering, collections::HashMap, fmt::Display};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Base-language message → translated text, for one language.
///
/// Iteration order is irrelevant; every encoder sorts before serializing.
pub type TranslationTable = HashMap<MessageId, MessageText>;

/// A single translatable string in singular and optionally one or more plural versions.
///
/// Index 0 is the singular, the following indices are the plural forms in
/// increasing grammatical number. There is always at least one string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct MessageText {
    strings: Vec<String>,
}

impl MessageText {
    /// Creates a text from all its grammatical forms.
    ///
    /// Fails with [`Error::InvalidArgument`] if `strings` is empty.
    pub fn new<I, S>(strings: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let strings: Vec<String> = strings.into_iter().map(Into::into).collect();
        if strings.is_empty() {
            return Err(Error::InvalidArgument(
                "A message text has to consist of at least one string!".to_string(),
            ));
        }
        Ok(MessageText { strings })
    }

    pub fn singular(string: impl Into<String>) -> Self {
        MessageText {
            strings: vec![string.into()],
        }
    }

    pub fn with_plurals<I, S>(singular: impl Into<String>, plurals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut strings = vec![singular.into()];
        strings.extend(plurals.into_iter().map(Into::into));
        MessageText { strings }
    }

    /// All grammatical forms, singular first.
    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    /// The singular form.
    pub fn first(&self) -> &str {
        &self.strings[0]
    }

    /// Number of grammatical forms (always at least 1).
    pub fn form_count(&self) -> usize {
        self.strings.len()
    }

    pub fn is_plural(&self) -> bool {
        self.strings.len() >= 2
    }

    pub fn into_strings(self) -> Vec<String> {
        self.strings
    }
}

impl TryFrom<Vec<String>> for MessageText {
    type Error = Error;

    fn try_from(strings: Vec<String>) -> Result<Self, Self::Error> {
        MessageText::new(strings)
    }
}

impl From<MessageText> for Vec<String> {
    fn from(text: MessageText) -> Self {
        text.strings
    }
}

impl From<&str> for MessageText {
    fn from(value: &str) -> Self {
        MessageText::singular(value)
    }
}

impl Display for MessageText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.strings.join(" | "))
    }
}

/// A translatable string in the base language with an optional context.
///
/// The context disambiguates identical base strings that are translated
/// differently in different situations.
///
/// Ordering: fewer grammatical forms first, then messages without context,
/// then by context, then lexicographically by each grammatical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct MessageId {
    pub text: MessageText,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub context: Option<String>,
}

impl MessageId {
    pub fn new(text: MessageText) -> Self {
        MessageId {
            text,
            context: None,
        }
    }

    pub fn with_context(text: MessageText, context: impl Into<String>) -> Self {
        MessageId {
            text,
            context: Some(context.into()),
        }
    }

    /// The reserved key of the gettext header entry (empty string, no context).
    pub fn header() -> Self {
        MessageId::new(MessageText::singular(""))
    }

    pub fn is_header(&self) -> bool {
        self.context.is_none() && self.text.strings() == [""]
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        MessageId::new(MessageText::singular(value))
    }
}

impl Ord for MessageId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.text
            .form_count()
            .cmp(&other.text.form_count())
            // `None` sorts before any `Some`
            .then_with(|| self.context.cmp(&other.context))
            .then_with(|| self.text.strings().cmp(other.text.strings()))
    }
}

impl PartialOrd for MessageId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.context {
            Some(context) => write!(f, "[{}] {}", context, self.text),
            None => write!(f, "{}", self.text),
        }
    }
}
