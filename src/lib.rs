//! Client-side wire plumbing for Redis-shaped servers: a command
//! encoder, an incremental reply decoder that accepts input in
//! arbitrary chunks, and a thin tokio connection driving both.
//!
//! The decoder is protocol-shape-agnostic - it knows the five reply
//! types, not what any command means.

pub mod config;
pub mod connection;
pub mod error;
pub mod resp;

pub use config::{Config, TextEncoding};
pub use connection::Connection;
pub use error::{ProtocolError, RedisError, Result};
pub use resp::{Decoder, ReplyDecoder, Text, Value};
