use crate::config::TextEncoding;
use crate::error::{RedisError, Result};

/// Encode one command as a request frame: `*<n>\r\n` then
/// `$<len>\r\n<bytes>\r\n` per argument.
///
/// Arguments are taken as bytes; when an encoding is configured each
/// argument must already be valid in it.
pub fn encode_command<A: AsRef<[u8]>>(
    args: &[A],
    encoding: Option<TextEncoding>,
) -> Result<Vec<u8>> {
    if args.is_empty() {
        return Err(RedisError::Encode("empty command".to_owned()));
    }

    let mut frame = Vec::new();
    frame.extend_from_slice(format!("*{}\r\n", args.len()).as_bytes());
    for arg in args {
        let arg = arg.as_ref();
        if let Some(encoding) = encoding {
            if !encoding.accepts(arg) {
                return Err(RedisError::Encode(format!(
                    "argument {:?} is not valid {}",
                    String::from_utf8_lossy(arg),
                    encoding
                )));
            }
        }
        frame.extend_from_slice(format!("${}\r\n", arg.len()).as_bytes());
        frame.extend_from_slice(arg);
        frame.extend_from_slice(b"\r\n");
    }

    Ok(frame)
}
