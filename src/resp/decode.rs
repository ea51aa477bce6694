use bytes::{Buf, Bytes, BytesMut};

use super::value::{Text, Value};
use crate::config::TextEncoding;
use crate::error::{ProtocolError, RedisError, Result};

/**
 * Decoder backend interface.
 *
 * `feed` appends transport bytes without parsing; `next_value` advances
 * the parse as far as the buffered bytes allow. `Ok(None)` is the
 * not-ready marker - distinct by type from a decoded `Value::Null`.
 * A connection accepts any backend through this trait; `Decoder` below
 * is the reference implementation.
 */
pub trait ReplyDecoder {
    fn feed(&mut self, data: &[u8]);
    fn next_value(&mut self) -> Result<Option<Value>>;
}

/// Where the parse currently stands. Together with the pending-array
/// stack this is the whole continuation: suspending and resuming never
/// restarts a message.
#[derive(Debug, Clone, Copy)]
enum Step {
    /// Waiting for the one-byte type marker.
    Marker,
    /// Collecting a CRLF-terminated line. `scanned` counts the bytes
    /// already searched, so new input never gets re-scanned.
    Line { kind: LineKind, scanned: usize },
    /// Reading exactly `len` payload bytes plus the trailing CRLF.
    BulkBody { len: usize },
}

#[derive(Debug, Clone, Copy)]
enum LineKind {
    Simple,
    Error,
    Integer,
    BulkLen,
    ArrayLen,
}

/// An array whose elements are still being parsed.
#[derive(Debug)]
struct PendingArray {
    remaining: usize,
    items: Vec<Value>,
    /// First error reply seen among the elements. The siblings are
    /// still consumed so the buffer ends at a message boundary, then
    /// this error alone is raised.
    first_error: Option<String>,
}

impl PendingArray {
    fn new(len: usize) -> Self {
        Self {
            remaining: len,
            items: Vec::with_capacity(len),
            first_error: None,
        }
    }
}

/**
 * Incremental RESP reply decoder.
 *
 * Owns the accumulation buffer; consumed bytes are trimmed from the
 * front and never reinterpreted. After a protocol fault the decoder is
 * poisoned: every later `next_value` re-raises the same fault.
 */
#[derive(Debug)]
pub struct Decoder {
    buf: BytesMut,
    step: Step,
    stack: Vec<PendingArray>,
    fault: Option<ProtocolError>,
    encoding: Option<TextEncoding>,
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder::new(None)
    }
}

impl Decoder {
    pub fn new(encoding: Option<TextEncoding>) -> Self {
        Self {
            buf: BytesMut::new(),
            step: Step::Marker,
            stack: Vec::new(),
            fault: None,
            encoding,
        }
    }

    fn advance(&mut self) -> Result<Option<Value>> {
        loop {
            match self.step {
                Step::Marker => {
                    if self.buf.is_empty() {
                        return Ok(None);
                    }
                    let marker = self.buf.get_u8();
                    let kind = match marker {
                        b'+' => LineKind::Simple,
                        b'-' => LineKind::Error,
                        b':' => LineKind::Integer,
                        b'$' => LineKind::BulkLen,
                        b'*' => LineKind::ArrayLen,
                        other => return Err(ProtocolError::InvalidMarker(other).into()),
                    };
                    self.step = Step::Line { kind, scanned: 0 };
                }
                Step::Line { kind, scanned } => {
                    let line = match self.take_line(kind, scanned) {
                        Some(line) => line,
                        None => return Ok(None),
                    };
                    self.step = Step::Marker;
                    match kind {
                        LineKind::Simple => {
                            let value = Value::Simple(Text::decode(line, self.encoding));
                            if let Some(done) = self.complete(value)? {
                                return Ok(Some(done));
                            }
                        }
                        LineKind::Error => {
                            let message = String::from_utf8_lossy(&line).into_owned();
                            if let Some(done) = self.complete(Value::Error(message))? {
                                return Ok(Some(done));
                            }
                        }
                        LineKind::Integer => {
                            let int = parse_int(&line)?;
                            if let Some(done) = self.complete(Value::Integer(int))? {
                                return Ok(Some(done));
                            }
                        }
                        LineKind::BulkLen => match parse_int(&line)? {
                            -1 => {
                                if let Some(done) = self.complete(Value::Null)? {
                                    return Ok(Some(done));
                                }
                            }
                            len if len >= 0 => {
                                self.step = Step::BulkBody { len: len as usize };
                            }
                            len => return Err(ProtocolError::InvalidLength(len).into()),
                        },
                        LineKind::ArrayLen => match parse_int(&line)? {
                            -1 => {
                                if let Some(done) = self.complete(Value::Null)? {
                                    return Ok(Some(done));
                                }
                            }
                            0 => {
                                if let Some(done) = self.complete(Value::Array(Vec::new()))? {
                                    return Ok(Some(done));
                                }
                            }
                            len if len > 0 => {
                                self.stack.push(PendingArray::new(len as usize));
                            }
                            len => return Err(ProtocolError::InvalidLength(len).into()),
                        },
                    }
                }
                Step::BulkBody { len } => {
                    if self.buf.len() < len + 2 {
                        return Ok(None);
                    }
                    let payload = self.buf.split_to(len).freeze();
                    let terminator = self.buf.split_to(2);
                    if &terminator[..] != b"\r\n" {
                        return Err(ProtocolError::MissingTerminator.into());
                    }
                    self.step = Step::Marker;
                    let value = Value::Bulk(Text::decode(payload, self.encoding));
                    if let Some(done) = self.complete(value)? {
                        return Ok(Some(done));
                    }
                }
            }
        }
    }

    /// Consume one CRLF-terminated line, or remember how far the scan
    /// got and suspend.
    fn take_line(&mut self, kind: LineKind, scanned: usize) -> Option<Bytes> {
        match find_crlf(&self.buf, scanned) {
            Some(at) => {
                let line = self.buf.split_to(at).freeze();
                self.buf.advance(2);
                Some(line)
            }
            None => {
                // the last byte may be the CR of a split CRLF
                let scanned = self.buf.len().saturating_sub(1);
                self.step = Step::Line { kind, scanned };
                None
            }
        }
    }

    /// Fold a finished value into the innermost pending array, or hand
    /// it back when no array is pending. Error replies become values at
    /// the top level but are captured as the enclosing array's fault.
    fn complete(&mut self, value: Value) -> Result<Option<Value>> {
        let mut outcome: std::result::Result<Value, String> = Ok(value);
        loop {
            let frame = match self.stack.last_mut() {
                Some(frame) => frame,
                None => {
                    return match outcome {
                        Ok(value) => Ok(Some(value)),
                        Err(message) => Err(RedisError::Reply(message)),
                    }
                }
            };
            match outcome {
                Ok(Value::Error(message)) | Err(message) => {
                    if frame.first_error.is_none() {
                        frame.first_error = Some(message);
                    }
                }
                Ok(value) => frame.items.push(value),
            }
            frame.remaining -= 1;
            if frame.remaining > 0 {
                // more siblings to parse before this array is whole
                return Ok(None);
            }
            let done = self.stack.pop().expect("pending array on stack");
            outcome = match done.first_error {
                None => Ok(Value::Array(done.items)),
                Some(message) => Err(message),
            };
        }
    }
}

impl ReplyDecoder for Decoder {
    fn feed(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    fn next_value(&mut self) -> Result<Option<Value>> {
        if let Some(fault) = &self.fault {
            return Err(RedisError::Protocol(fault.clone()));
        }
        match self.advance() {
            Err(RedisError::Protocol(fault)) => {
                self.fault = Some(fault.clone());
                Err(RedisError::Protocol(fault))
            }
            other => other,
        }
    }
}

fn find_crlf(buf: &[u8], from: usize) -> Option<usize> {
    buf.windows(2)
        .skip(from)
        .position(|pair| pair == b"\r\n")
        .map(|at| at + from)
}

fn parse_int(line: &[u8]) -> std::result::Result<i64, ProtocolError> {
    std::str::from_utf8(line)
        .ok()
        .and_then(|text| text.parse().ok())
        .ok_or_else(|| ProtocolError::InvalidInteger(String::from_utf8_lossy(line).into_owned()))
}
