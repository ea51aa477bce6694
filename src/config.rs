use std::fmt;

/// Connection tuning knobs.
#[derive(Debug, Clone)]
pub struct Config {
    /// Charset applied to simple string and bulk string payloads, with
    /// raw-bytes fallback when a payload doesn't decode. `None` keeps
    /// every payload raw.
    pub encoding: Option<TextEncoding>,

    /// Upper bound on bytes requested per socket read.
    pub max_read_chunk: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            encoding: Some(TextEncoding::Utf8),
            max_read_chunk: 64 * 1024,
        }
    }
}

impl Config {
    pub fn encoding(mut self, encoding: Option<TextEncoding>) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn max_read_chunk(mut self, bytes: usize) -> Self {
        self.max_read_chunk = bytes;
        self
    }
}

/// Supported reply text encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Ascii,
}

impl TextEncoding {
    /// Whether `bytes` are valid in this encoding. Used on the encode
    /// side, where arguments must already be wire-ready.
    pub fn accepts(self, bytes: &[u8]) -> bool {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).is_ok(),
            TextEncoding::Ascii => bytes.is_ascii(),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => write!(f, "utf-8"),
            TextEncoding::Ascii => write!(f, "ascii"),
        }
    }
}
