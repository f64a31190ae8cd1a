use std::net::SocketAddr;

use qosmark::{
    tcp::{Config, Tcp},
    EndpointArgs, PeerAddress, Transport,
};
use tokio::io::AsyncWriteExt;

/// Connects to the given address (default `203.0.113.10:443`) with the DSCP from `QOSMARK_DSCP`.
///
/// On Windows, run it elevated to get the exact marking instead of the category default.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let addr: SocketAddr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "203.0.113.10:443".to_string())
        .parse()
        .unwrap();

    let mut tcp = Tcp::new(Config::default().endpoint(EndpointArgs::from_env()));
    let mut conn = tcp.connect(addr).await.unwrap();

    println!("Connected to {}, marked: {}", conn.peer_addr().unwrap(), conn.is_marked());

    conn.write_all(b"hello").await.unwrap();
}
