use std::fmt;

use crate::{Dscp, Flow, QosError, Session, TrafficCategory, TrafficControl};

/// A DSCP marking applied to a socket.
///
/// Keep it alive for as long as the socket should stay marked: dropping it removes the socket
/// from its flow and closes the session.
#[must_use = "dropping the marking removes the socket from its flow"]
pub struct Marking<'a, T: TrafficControl> {
    flow: Flow,
    dscp: Dscp,
    exact: bool,
    // Dropped after the flow is removed.
    session: Session<'a, T>,
}

impl<'a, T: TrafficControl> Marking<'a, T> {
    pub(crate) fn new(session: Session<'a, T>, flow: Flow, dscp: Dscp) -> Self {
        Self { flow, dscp, exact: false, session }
    }

    /// Overrides the flow's outgoing DSCP with the exact requested value.
    ///
    /// ## Errors
    /// [`QosError::MarkingOverrideFailed`] if the subsystem refuses, typically because the process
    /// lacks the required privileges. The flow keeps the category's default marking.
    pub(crate) fn override_outgoing(&mut self) -> Result<(), QosError> {
        self.session
            .backend()
            .set_outgoing_dscp(self.session.handle(), self.flow.id(), self.dscp)
            .map_err(|source| QosError::MarkingOverrideFailed { dscp: self.dscp, source })?;

        self.exact = true;
        Ok(())
    }

    /// The requested DSCP.
    pub const fn dscp(&self) -> Dscp {
        self.dscp
    }

    pub const fn category(&self) -> TrafficCategory {
        self.flow.category()
    }

    pub const fn flow(&self) -> &Flow {
        &self.flow
    }

    /// Whether outgoing packets carry exactly [`Self::dscp`], rather than the category default.
    pub const fn is_exact(&self) -> bool {
        self.exact
    }
}

impl<T: TrafficControl> Drop for Marking<'_, T> {
    fn drop(&mut self) {
        let result = self.session.backend().remove_socket_from_flow(
            self.session.handle(),
            self.flow.socket(),
            self.flow.id(),
        );

        if let Err(e) = result {
            tracing::debug!(flow = %self.flow.id(), "failed to remove socket from flow: {e}");
        }
    }
}

impl<T: TrafficControl> fmt::Debug for Marking<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Marking")
            .field("flow", &self.flow)
            .field("dscp", &self.dscp)
            .field("exact", &self.exact)
            .finish_non_exhaustive()
    }
}
