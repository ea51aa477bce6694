use std::env;

use redis_wire::Connection;

/// Subscribe to a channel and print every pushed message.
///
/// Usage: subscribe [ADDR] [CHANNEL]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let addr = env::args().nth(1).unwrap_or_else(|| "127.0.0.1:6379".to_owned());
    let channel = env::args().nth(2).unwrap_or_else(|| "test".to_owned());

    let mut conn = Connection::connect(addr.as_str()).await?;
    conn.send_command(&["SUBSCRIBE", channel.as_str()]).await?;

    loop {
        let reply = conn.recv_response().await?;
        println!("{:?}", reply);
    }
}
