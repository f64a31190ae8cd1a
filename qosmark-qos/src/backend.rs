use std::{fmt, io, net::SocketAddr};

use crate::{Dscp, TrafficCategory};

/// A raw socket handle, as exposed by `AsRawSocket` on Windows.
pub type RawSocket = u64;

/// Protocol version requested when opening a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QosVersion {
    /// Major protocol version.
    pub major: u16,
    /// Minor protocol version.
    pub minor: u16,
}

impl QosVersion {
    pub const V1_0: Self = Self { major: 1, minor: 0 };
}

impl Default for QosVersion {
    fn default() -> Self {
        Self::V1_0
    }
}

/// A flow identifier. Only meaningful within the session that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlowId(pub u32);

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The host traffic-control subsystem.
///
/// Every call blocks until the subsystem answers. Failures carry the raw platform error code in
/// the returned [`io::Error`].
pub trait TrafficControl {
    /// An open session with the subsystem.
    type Handle;

    /// Opens a session at `version`.
    fn create_handle(&self, version: QosVersion) -> io::Result<Self::Handle>;

    /// Closes a session, tearing down any flow still bound in it.
    fn close_handle(&self, handle: &Self::Handle) -> io::Result<()>;

    /// Adds `socket` to a non-adaptive flow of `category` toward `destination`.
    fn add_socket_to_flow(
        &self,
        handle: &Self::Handle,
        socket: RawSocket,
        destination: SocketAddr,
        category: TrafficCategory,
    ) -> io::Result<FlowId>;

    /// Removes `socket` from `flow`, restoring its default marking.
    fn remove_socket_from_flow(
        &self,
        handle: &Self::Handle,
        socket: RawSocket,
        flow: FlowId,
    ) -> io::Result<()>;

    /// Overrides the DSCP of outgoing packets on `flow`.
    fn set_outgoing_dscp(&self, handle: &Self::Handle, flow: FlowId, dscp: Dscp)
        -> io::Result<()>;
}
