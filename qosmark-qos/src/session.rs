use std::fmt;

use crate::{QosError, QosVersion, TrafficControl};

/// An open session with the traffic-control subsystem.
///
/// The session is closed when dropped. Closing it also tears down any flow still bound in it.
pub struct Session<'a, T: TrafficControl> {
    tc: &'a T,
    handle: T::Handle,
}

impl<'a, T: TrafficControl> Session<'a, T> {
    /// Opens a session at protocol version 1.0.
    ///
    /// ## Errors
    /// [`QosError::SubsystemUnavailable`] if the subsystem refuses the request.
    pub fn acquire(tc: &'a T) -> Result<Self, QosError> {
        let handle = tc.create_handle(QosVersion::V1_0).map_err(QosError::SubsystemUnavailable)?;
        tracing::trace!("opened traffic-control session");

        Ok(Self { tc, handle })
    }

    #[inline]
    pub(crate) const fn backend(&self) -> &'a T {
        self.tc
    }

    #[inline]
    pub fn handle(&self) -> &T::Handle {
        &self.handle
    }
}

impl<T: TrafficControl> Drop for Session<'_, T> {
    fn drop(&mut self) {
        if let Err(e) = self.tc.close_handle(&self.handle) {
            tracing::debug!("failed to close traffic-control session: {e}");
        }
    }
}

impl<T: TrafficControl> fmt::Debug for Session<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}
