use std::net::SocketAddr;

use crate::{FlowId, QosError, RawSocket, Session, TrafficCategory, TrafficControl};

/// A socket bound to a traffic flow toward one destination.
///
/// Flows are owned by a [`Marking`](crate::Marking), which removes them on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flow {
    id: FlowId,
    socket: RawSocket,
    destination: SocketAddr,
    category: TrafficCategory,
}

impl Flow {
    /// Adds `socket` to a non-adaptive flow of `category` inside `session`.
    ///
    /// ## Errors
    /// - [`QosError::AddressNotFlowable`] if the subsystem rejects the destination as an invalid
    ///   parameter, which it does for loopback and on-link addresses.
    /// - [`QosError::FlowBindFailed`] for any other failure.
    pub(crate) fn bind<T: TrafficControl>(
        session: &Session<'_, T>,
        socket: RawSocket,
        destination: SocketAddr,
        category: TrafficCategory,
    ) -> Result<Self, QosError> {
        let id = session
            .backend()
            .add_socket_to_flow(session.handle(), socket, destination, category)
            .map_err(|e| QosError::flow_bind(destination, category, e))?;

        tracing::trace!(flow = %id, %category, "added socket to flow");

        Ok(Self { id, socket, destination, category })
    }

    pub const fn id(&self) -> FlowId {
        self.id
    }

    pub const fn socket(&self) -> RawSocket {
        self.socket
    }

    pub const fn destination(&self) -> SocketAddr {
        self.destination
    }

    pub const fn category(&self) -> TrafficCategory {
        self.category
    }
}
