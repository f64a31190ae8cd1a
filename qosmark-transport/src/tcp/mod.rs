use futures::future::BoxFuture;
use std::{
    io,
    net::SocketAddr,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tokio::{
    io::{AsyncRead, AsyncWrite, ReadBuf},
    net::{TcpSocket, TcpStream},
};

use qosmark_common::{keys, EndpointArgs};

use crate::{PeerAddress, Transport};

#[cfg(windows)]
type Marking = qosmark_qos::Marking<'static, qosmark_qos::Qwave>;

#[derive(Debug, Clone)]
pub struct Config {
    /// Endpoint options. [`keys::DSCP`] selects the outgoing DSCP marking.
    pub endpoint: EndpointArgs,
    pub nodelay: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { endpoint: EndpointArgs::default(), nodelay: true }
    }
}

impl Config {
    /// Requests DSCP marking of outgoing packets. Values outside `0..=63` disable it.
    pub fn dscp(mut self, dscp: i32) -> Self {
        self.endpoint.set_int(keys::DSCP, dscp);
        self
    }

    pub fn nodelay(mut self, nodelay: bool) -> Self {
        self.nodelay = nodelay;
        self
    }

    pub fn endpoint(mut self, endpoint: EndpointArgs) -> Self {
        self.endpoint = endpoint;
        self
    }
}

#[derive(Debug, Default)]
pub struct Tcp {
    config: Arc<Config>,
}

impl Tcp {
    pub fn new(config: Config) -> Self {
        Self { config: Arc::new(config) }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// An outbound TCP connection.
///
/// Owns the DSCP marking of its socket, if one was applied, so the marking lasts exactly as long
/// as the connection.
#[derive(Debug)]
pub struct TcpConnection {
    // Released before the stream closes the socket.
    #[cfg(windows)]
    marking: Option<Marking>,
    stream: TcpStream,
}

impl TcpConnection {
    /// Whether the socket was added to a traffic flow.
    pub fn is_marked(&self) -> bool {
        #[cfg(windows)]
        return self.marking.is_some();

        #[cfg(not(windows))]
        false
    }

    #[cfg(windows)]
    pub fn marking(&self) -> Option<&Marking> {
        self.marking.as_ref()
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.stream.local_addr()
    }

    pub fn stream(&self) -> &TcpStream {
        &self.stream
    }
}

impl PeerAddress<SocketAddr> for TcpConnection {
    fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.stream.peer_addr()
    }
}

impl AsyncRead for TcpConnection {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().stream).poll_read(cx, buf)
    }
}

impl AsyncWrite for TcpConnection {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.get_mut().stream).poll_write(cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().stream).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().stream).poll_shutdown(cx)
    }
}

#[cfg(not(windows))]
fn skip_marking(endpoint: &EndpointArgs, addr: SocketAddr) {
    if let Some(dscp) = qosmark_qos::Dscp::from_config(endpoint) {
        tracing::debug!(%dscp, %addr, "DSCP marking is not supported on this platform");
    }
}

impl Transport<SocketAddr> for Tcp {
    type Io = TcpConnection;

    type Error = io::Error;

    type Connect = BoxFuture<'static, Result<Self::Io, Self::Error>>;

    fn connect(&mut self, addr: SocketAddr) -> Self::Connect {
        let config = Arc::clone(&self.config);

        Box::pin(async move {
            let socket =
                if addr.is_ipv4() { TcpSocket::new_v4()? } else { TcpSocket::new_v6()? };

            // The flow has to be set up before the first packet leaves.
            #[cfg(windows)]
            let marking = qosmark_qos::set_dscp_if_configured(&socket, addr, &config.endpoint);

            #[cfg(not(windows))]
            skip_marking(&config.endpoint, addr);

            let stream = socket.connect(addr).await?;
            stream.set_nodelay(config.nodelay)?;

            tracing::debug!("Connected to {}", addr);

            Ok(TcpConnection {
                #[cfg(windows)]
                marking,
                stream,
            })
        })
    }
}
