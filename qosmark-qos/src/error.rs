use std::{io, net::SocketAddr};

use thiserror::Error;
use tracing::Level;

use crate::{Dscp, TrafficCategory};

/// `ERROR_INVALID_PARAMETER`, returned when adding a socket toward an on-link destination.
pub(crate) const ERROR_INVALID_PARAMETER: i32 = 87;

#[derive(Debug, Error)]
pub enum QosError {
    /// The traffic-control subsystem refused to open a session.
    #[error("traffic-control subsystem unavailable: {0}")]
    SubsystemUnavailable(#[source] io::Error),
    /// The destination is on-link (loopback or same subnet) and can't be part of a flow.
    #[error("destination {addr} can't be added to a {category} flow: {source}")]
    AddressNotFlowable {
        addr: SocketAddr,
        category: TrafficCategory,
        #[source]
        source: io::Error,
    },
    #[error("failed to add socket toward {addr} to a {category} flow: {source}")]
    FlowBindFailed {
        addr: SocketAddr,
        category: TrafficCategory,
        #[source]
        source: io::Error,
    },
    /// Usually means the process is not an administrator or network configuration operator.
    #[error("failed to override outgoing DSCP to {dscp}: {source}")]
    MarkingOverrideFailed {
        dscp: Dscp,
        #[source]
        source: io::Error,
    },
}

impl QosError {
    /// Classifies a failed flow bind by its platform error code.
    pub(crate) fn flow_bind(addr: SocketAddr, category: TrafficCategory, source: io::Error) -> Self {
        if source.raw_os_error() == Some(ERROR_INVALID_PARAMETER) {
            Self::AddressNotFlowable { addr, category, source }
        } else {
            Self::FlowBindFailed { addr, category, source }
        }
    }

    /// Whether the failure is routine for the environment rather than a broken subsystem.
    pub const fn is_expected(&self) -> bool {
        matches!(self, Self::AddressNotFlowable { .. } | Self::MarkingOverrideFailed { .. })
    }

    /// The severity this error is logged at.
    pub const fn level(&self) -> Level {
        if self.is_expected() {
            Level::DEBUG
        } else {
            Level::ERROR
        }
    }

    /// The platform error code, if the failure carried one.
    pub fn os_code(&self) -> Option<i32> {
        self.io_error().raw_os_error()
    }

    fn io_error(&self) -> &io::Error {
        match self {
            Self::SubsystemUnavailable(source)
            | Self::AddressNotFlowable { source, .. }
            | Self::FlowBindFailed { source, .. }
            | Self::MarkingOverrideFailed { source, .. } => source,
        }
    }

    /// Logs the error at [`Self::level`].
    pub(crate) fn report(&self) {
        let code = self.os_code();
        if self.level() == Level::ERROR {
            tracing::error!(?code, "{self}");
        } else {
            tracing::debug!(?code, "{self}");
        }
    }
}
