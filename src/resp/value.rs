use bytes::Bytes;

use crate::config::TextEncoding;

/// A single decoded reply.
///
/// `Null` covers both the null bulk string (`$-1`) and the null array
/// (`*-1`); the server-side distinction carries no information.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Simple(Text),       // "+<STRING>\r\n"
    Error(String),      // "-<STRING>\r\n"
    Integer(i64),       // ":<INT>\r\n"
    Bulk(Text),         // "$<SIZE>\r\n<STRING>\r\n"
    Null,               // "$-1\r\n" / "*-1\r\n"
    Array(Vec<Value>),  // "*<SIZE>\r\n<elements>"
}

impl Value {
    /// Convenience constructor for a decoded simple string.
    pub fn simple(text: impl Into<String>) -> Self {
        Value::Simple(Text::Decoded(text.into()))
    }

    /// Convenience constructor for a decoded bulk string.
    pub fn bulk(text: impl Into<String>) -> Self {
        Value::Bulk(Text::Decoded(text.into()))
    }
}

/// Payload of a simple or bulk string reply: decoded text when the
/// configured encoding accepts it, the raw bytes untouched otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Text {
    Decoded(String),
    Raw(Bytes),
}

impl Text {
    /// Decode `raw` with `encoding`, keeping the bytes as-is when no
    /// encoding is configured or the payload doesn't decode.
    pub fn decode(raw: Bytes, encoding: Option<TextEncoding>) -> Self {
        match encoding {
            None => Text::Raw(raw),
            Some(TextEncoding::Ascii) if !raw.is_ascii() => Text::Raw(raw),
            Some(_) => match String::from_utf8(Vec::from(raw)) {
                Ok(text) => Text::Decoded(text),
                Err(err) => Text::Raw(Bytes::from(err.into_bytes())),
            },
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Text::Decoded(text) => text.as_bytes(),
            Text::Raw(raw) => raw,
        }
    }
}

impl From<&str> for Text {
    fn from(text: &str) -> Text {
        Text::Decoded(text.to_owned())
    }
}
