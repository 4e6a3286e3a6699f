//! Corpus input records.

use std::borrow::Cow;
use std::str::Utf8Error;

use serde::{Deserialize, Serialize};

/// Text of one document as it arrived from the record source.
///
/// Sources that hand over undecoded bytes use [`DocumentText::Bytes`]; the
/// bytes are decoded as UTF-8 when the document is fingerprinted, and a
/// decode failure is reported for that document alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DocumentText {
    Text(String),
    Bytes(Vec<u8>),
}

impl DocumentText {
    /// True for a zero-length string or byte buffer.
    pub fn is_empty(&self) -> bool {
        match self {
            DocumentText::Text(text) => text.is_empty(),
            DocumentText::Bytes(bytes) => bytes.is_empty(),
        }
    }

    /// Borrow the text, decoding bytes as UTF-8.
    pub fn decode(&self) -> Result<Cow<'_, str>, Utf8Error> {
        match self {
            DocumentText::Text(text) => Ok(Cow::Borrowed(text.as_str())),
            DocumentText::Bytes(bytes) => std::str::from_utf8(bytes).map(Cow::Borrowed),
        }
    }
}

impl From<String> for DocumentText {
    fn from(value: String) -> Self {
        DocumentText::Text(value)
    }
}

impl From<&str> for DocumentText {
    fn from(value: &str) -> Self {
        DocumentText::Text(value.to_owned())
    }
}

impl From<Vec<u8>> for DocumentText {
    fn from(value: Vec<u8>) -> Self {
        DocumentText::Bytes(value)
    }
}

/// One `(id, text)` record of the input corpus.
///
/// `text: None` models a missing text field. Such documents, and documents
/// whose text is empty, are filtered out of the index rather than failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document<I> {
    pub id: I,
    pub text: Option<DocumentText>,
}

impl<I> Document<I> {
    pub fn new(id: I, text: impl Into<DocumentText>) -> Self {
        Self {
            id,
            text: Some(text.into()),
        }
    }

    /// A record whose text field is absent.
    pub fn missing(id: I) -> Self {
        Self { id, text: None }
    }

    /// True when the document carries no text to fingerprint.
    pub fn is_filtered(&self) -> bool {
        self.text.as_ref().map_or(true, DocumentText::is_empty)
    }
}

impl<I> From<(I, String)> for Document<I> {
    fn from((id, text): (I, String)) -> Self {
        Document::new(id, text)
    }
}

impl<I> From<(I, &str)> for Document<I> {
    fn from((id, text): (I, &str)) -> Self {
        Document::new(id, text)
    }
}

impl<I> From<(I, Vec<u8>)> for Document<I> {
    fn from((id, bytes): (I, Vec<u8>)) -> Self {
        Document::new(id, bytes)
    }
}

impl<I> From<(I, Option<String>)> for Document<I> {
    fn from((id, text): (I, Option<String>)) -> Self {
        Self {
            id,
            text: text.map(DocumentText::Text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_empty_text_are_filtered() {
        assert!(Document::missing(1).is_filtered());
        assert!(Document::new(2, "").is_filtered());
        assert!(Document::new(3, Vec::<u8>::new()).is_filtered());
        assert!(!Document::new(4, " ").is_filtered());
    }

    #[test]
    fn bytes_decode_as_utf8() {
        let text = DocumentText::from("café".as_bytes().to_vec());
        assert_eq!(text.decode().unwrap(), "café");
    }

    #[test]
    fn invalid_utf8_fails_to_decode() {
        let text = DocumentText::Bytes(vec![b'o', b'k', 0xFF, 0xFE]);
        assert!(text.decode().is_err());
    }

    #[test]
    fn tuple_conversions() {
        let doc: Document<u64> = (7, "hello").into();
        assert_eq!(doc.text, Some(DocumentText::Text("hello".into())));

        let doc: Document<u64> = (8, None::<String>).into();
        assert!(doc.text.is_none());
    }
}
