#![doc(issue_tracker_base_url = "https://github.com/chainbound/qosmark/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod config;
pub use config::*;

/// Well-known configuration keys.
pub mod keys {
    /// The requested Differentiated Services Code Point for outgoing packets (0..=63).
    pub const DSCP: &str = "dscp";
}

/// Environment variables read by [`EndpointArgs::from_env`].
pub mod env {
    /// Overrides the [`keys::DSCP`](super::keys::DSCP) option.
    pub const DSCP: &str = "QOSMARK_DSCP";
}
