#![doc(issue_tracker_base_url = "https://github.com/chainbound/qosmark/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Exact DSCP marking of outbound sockets through the host traffic-control subsystem.
//!
//! The subsystem only understands four coarse traffic categories. Marking a socket therefore
//! takes three steps: open a session, add the socket to a flow of the closest category, then
//! override the flow's outgoing DSCP with the exact requested value. The last step needs
//! administrative rights and is allowed to fail.
//!
//! Every step is best-effort. Failures are logged at a severity matching how surprising they
//! are, and never reach the caller.

mod apply;
mod backend;
mod category;
mod dscp;
mod error;
mod flow;
mod marking;
mod session;

pub use apply::apply_dscp_if_configured;
pub use backend::{FlowId, QosVersion, RawSocket, TrafficControl};
pub use category::TrafficCategory;
pub use dscp::{adjust_value, Dscp, DscpClass, DSCP_NOT_SET};
pub use error::QosError;
pub use flow::Flow;
pub use marking::Marking;
pub use session::Session;

#[cfg(windows)]
mod qwave;
#[cfg(windows)]
pub use qwave::{set_dscp_if_configured, QosHandle, Qwave};
