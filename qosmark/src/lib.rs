#![doc(issue_tracker_base_url = "https://github.com/chainbound/qosmark/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub use qosmark_common::{env, keys, ArgValue, EndpointArgs, EndpointConfig};
pub use qosmark_qos::*;
pub use qosmark_transport::*;
