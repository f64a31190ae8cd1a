#![doc(issue_tracker_base_url = "https://github.com/chainbound/qosmark/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

use std::{future::Future, io};

use tokio::io::{AsyncRead, AsyncWrite};

pub mod tcp;

/// Something that can report the address of the remote end.
pub trait PeerAddress<A> {
    fn peer_addr(&self) -> io::Result<A>;
}

/// A client transport.
pub trait Transport<A> {
    /// The established connection.
    type Io: AsyncRead + AsyncWrite + PeerAddress<A> + Unpin + Send + 'static;
    type Error: std::error::Error + Send + Sync + 'static;
    type Connect: Future<Output = Result<Self::Io, Self::Error>> + Send + 'static;

    /// Connects to `addr`, applying any socket options the transport was configured with.
    fn connect(&mut self, addr: A) -> Self::Connect;
}
