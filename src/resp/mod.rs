/**
 * RESP - Redis Serialisation Protocol
 * https://redis.io/docs/reference/protocol-spec/
 */

pub mod decode;
pub mod encode;
pub mod value;

pub use decode::{Decoder, ReplyDecoder};
pub use encode::encode_command;
pub use value::{Text, Value};
