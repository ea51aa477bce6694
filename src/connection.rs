use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::{debug, trace};

use crate::config::Config;
use crate::error::{RedisError, Result};
use crate::resp::decode::{Decoder, ReplyDecoder};
use crate::resp::encode::encode_command;
use crate::resp::value::Value;

/**
 * One client connection: encodes commands onto the socket and drives a
 * reply decoder from socket reads.
 *
 * Single-task use only - one in-flight `send_command` or
 * `recv_response` at a time. Cancelling `recv_response` at its read
 * await leaves the decoder's buffer and continuation intact, so a
 * retried call resumes exactly where the last one stopped.
 */
pub struct Connection<S> {
    stream: S,
    decoder: Box<dyn ReplyDecoder + Send>,
    config: Config,
}

impl Connection<TcpStream> {
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        debug!("connected to {:?}", stream.peer_addr()?);
        Ok(Connection::new(stream, Config::default()))
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    pub fn new(stream: S, config: Config) -> Self {
        let decoder = Box::new(Decoder::new(config.encoding));
        Connection::with_decoder(stream, decoder, config)
    }

    /// Swap in a different decoder backend. The backend is chosen here,
    /// explicitly, never probed at load time.
    pub fn with_decoder(
        stream: S,
        decoder: Box<dyn ReplyDecoder + Send>,
        config: Config,
    ) -> Self {
        Self { stream, decoder, config }
    }

    /// Encode `args` as one request frame and write it out whole.
    pub async fn send_command<A: AsRef<[u8]>>(&mut self, args: &[A]) -> Result<()> {
        let frame = encode_command(args, self.config.encoding)?;
        trace!("sending {} byte request frame", frame.len());
        self.stream.write_all(&frame).await?;
        Ok(())
    }

    /// Read until the decoder produces the next reply.
    ///
    /// A reply already sitting in the decoder's buffer is returned
    /// without touching the socket. A zero-byte read means the peer
    /// closed the connection.
    pub async fn recv_response(&mut self) -> Result<Value> {
        let mut chunk = vec![0u8; self.config.max_read_chunk];
        loop {
            if let Some(value) = self.decoder.next_value()? {
                return Ok(value);
            }

            let received = self.stream.read(&mut chunk).await?;
            if received == 0 {
                debug!("peer closed the connection");
                return Err(RedisError::ConnectionClosed);
            }
            trace!("received {} bytes", received);
            self.decoder.feed(&chunk[..received]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TextEncoding;
    use crate::error::ProtocolError;

    fn pair() -> (Connection<tokio::io::DuplexStream>, tokio::io::DuplexStream) {
        let (client, server) = tokio::io::duplex(1024);
        (Connection::new(client, Config::default()), server)
    }

    #[tokio::test]
    async fn should_write_encoded_command_to_socket() {
        let (mut conn, mut server) = pair();
        conn.send_command(&["SET", "a", "b"]).await.unwrap();

        let mut written = vec![0u8; 64];
        let len = server.read(&mut written).await.unwrap();
        assert_eq!(&b"*3\r\n$3\r\nSET\r\n$1\r\na\r\n$1\r\nb\r\n"[..], &written[..len])
    }

    #[tokio::test]
    async fn should_receive_reply_split_across_chunks() {
        let (mut conn, mut server) = pair();

        let reply = tokio::spawn(async move { conn.recv_response().await });
        server.write_all(b"$6\r\nfoo").await.unwrap();
        server.write_all(b"bar\r\n").await.unwrap();

        assert_eq!(Value::bulk("foobar"), reply.await.unwrap().unwrap())
    }

    #[tokio::test]
    async fn should_return_null_reply_as_value() {
        let (mut conn, mut server) = pair();
        server.write_all(b"$-1\r\n").await.unwrap();
        assert_eq!(Value::Null, conn.recv_response().await.unwrap())
    }

    #[tokio::test]
    async fn should_drain_buffered_reply_before_reading() {
        let (mut conn, mut server) = pair();
        // both replies land in a single read
        server.write_all(b"+one\r\n+two\r\n").await.unwrap();

        assert_eq!(Value::simple("one"), conn.recv_response().await.unwrap());
        assert_eq!(Value::simple("two"), conn.recv_response().await.unwrap())
    }

    #[tokio::test]
    async fn should_raise_connection_closed_on_eof() {
        let (mut conn, server) = pair();
        drop(server);
        assert!(matches!(
            conn.recv_response().await,
            Err(RedisError::ConnectionClosed)
        ))
    }

    #[tokio::test]
    async fn should_propagate_protocol_fault() {
        let (mut conn, mut server) = pair();
        server.write_all(b"X\r\n").await.unwrap();
        assert!(matches!(
            conn.recv_response().await,
            Err(RedisError::Protocol(ProtocolError::InvalidMarker(b'X')))
        ))
    }

    #[tokio::test]
    async fn should_reject_unencodable_command() {
        let (client, _server) = tokio::io::duplex(64);
        let config = Config::default().encoding(Some(TextEncoding::Ascii));
        let mut conn = Connection::new(client, config);

        let args: Vec<&[u8]> = vec![b"SET", b"k", b"caf\xc3\xa9"];
        assert!(matches!(
            conn.send_command(&args).await,
            Err(RedisError::Encode(_))
        ))
    }
}
