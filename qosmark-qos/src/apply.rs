use std::net::SocketAddr;

use qosmark_common::EndpointConfig;

use crate::{Dscp, Flow, Marking, QosError, RawSocket, Session, TrafficCategory, TrafficControl};

/// Marks `socket` with the DSCP configured in `config`, if any.
///
/// Runs one best-effort pass: open a session, add the socket to a flow of the closest
/// [`TrafficCategory`] toward `destination`, then override the outgoing DSCP with the exact
/// value. The first failing step is logged and ends the pass. Nothing is retried or cached, so
/// every call opens its own session.
///
/// Returns the [`Marking`] if the socket was added to a flow, even when the exact override was
/// refused. Dropping it releases the flow and the session, so discarding the result leaves the
/// host exactly as it was.
#[must_use = "dropping the marking removes the socket from its flow"]
pub fn apply_dscp_if_configured<'a, T: TrafficControl>(
    tc: &'a T,
    socket: RawSocket,
    destination: SocketAddr,
    config: &impl EndpointConfig,
) -> Option<Marking<'a, T>> {
    let dscp = Dscp::from_config(config)?;
    let category = TrafficCategory::from_dscp(dscp);

    let _span = tracing::debug_span!("dscp", %dscp, %category, %destination).entered();

    match mark(tc, socket, destination, dscp, category) {
        Ok(marking) => Some(marking),
        Err(e) => {
            e.report();
            None
        }
    }
}

fn mark<'a, T: TrafficControl>(
    tc: &'a T,
    socket: RawSocket,
    destination: SocketAddr,
    dscp: Dscp,
    category: TrafficCategory,
) -> Result<Marking<'a, T>, QosError> {
    let session = Session::acquire(tc)?;
    let flow = Flow::bind(&session, socket, destination, category)?;

    let mut marking = Marking::new(session, flow, dscp);
    match marking.override_outgoing() {
        Ok(()) => tracing::debug!(flow = %marking.flow().id(), "applied DSCP marking"),
        Err(e) => e.report(),
    }

    Ok(marking)
}
