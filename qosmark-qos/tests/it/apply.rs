use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use qosmark_common::{keys, EndpointArgs};
use qosmark_qos::{apply_dscp_if_configured, FlowId, QosVersion, TrafficCategory};
use tracing::Level;

use crate::{
    backend::{Call, Recorder, ERROR_INVALID_PARAMETER},
    logs::{capture, has_level},
};

const SOCKET: u64 = 0x1f4;

fn loopback() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 50051))
}

fn routable() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::new(203, 0, 113, 10), 443))
}

fn dscp(value: i32) -> EndpointArgs {
    EndpointArgs::new().with_int(keys::DSCP, value)
}

#[test]
fn unset_dscp_is_a_noop() {
    let tc = Recorder::new();

    let (marking, logs) =
        capture(|| apply_dscp_if_configured(&tc, SOCKET, routable(), &EndpointArgs::new()));

    assert!(marking.is_none());
    assert!(tc.calls().is_empty());
    assert!(logs.is_empty(), "unexpected logs: {logs}");
}

#[test]
fn out_of_range_dscp_is_a_noop() {
    let tc = Recorder::new();

    for value in [-1, 64, 1000, i32::MIN] {
        assert!(apply_dscp_if_configured(&tc, SOCKET, routable(), &dscp(value)).is_none());
    }

    assert!(tc.calls().is_empty());
}

#[test]
fn loopback_destination_is_not_flowable() {
    let tc = Recorder::new();

    let (marking, logs) = capture(|| apply_dscp_if_configured(&tc, SOCKET, loopback(), &dscp(46)));

    assert!(marking.is_none());
    assert_eq!(
        tc.calls(),
        vec![
            Call::CreateHandle(QosVersion::V1_0),
            Call::AddSocketToFlow {
                handle: 1,
                socket: SOCKET,
                destination: loopback(),
                category: TrafficCategory::AudioVideo,
            },
            Call::CloseHandle(1),
        ]
    );

    assert!(has_level(&logs, Level::DEBUG), "{logs}");
    assert!(!has_level(&logs, Level::ERROR), "{logs}");
    assert!(logs.contains(&format!("os error {ERROR_INVALID_PARAMETER}")), "{logs}");
}

#[test]
fn ipv6_loopback_is_not_flowable() {
    let tc = Recorder::new();
    let destination = SocketAddr::from((Ipv6Addr::LOCALHOST, 50051));

    assert!(apply_dscp_if_configured(&tc, SOCKET, destination, &dscp(46)).is_none());
    assert_eq!(tc.calls().last(), Some(&Call::CloseHandle(1)));
}

#[test]
fn unprivileged_override_keeps_category_marking() {
    let tc = Recorder::new().unprivileged();

    let (marking, logs) = capture(|| apply_dscp_if_configured(&tc, SOCKET, routable(), &dscp(46)));
    let marking = marking.expect("socket added to flow");

    assert!(!marking.is_exact());
    assert_eq!(marking.dscp().value(), 46);
    assert_eq!(marking.category(), TrafficCategory::AudioVideo);
    assert_eq!(marking.flow().destination(), routable());
    assert_eq!(
        tc.calls(),
        vec![
            Call::CreateHandle(QosVersion::V1_0),
            Call::AddSocketToFlow {
                handle: 1,
                socket: SOCKET,
                destination: routable(),
                category: TrafficCategory::AudioVideo,
            },
            Call::SetOutgoingDscp { handle: 1, flow: FlowId(1), dscp: 46 },
        ]
    );

    assert!(has_level(&logs, Level::DEBUG), "{logs}");
    assert!(!has_level(&logs, Level::ERROR), "{logs}");
}

#[test]
fn privileged_override_is_exact() {
    let tc = Recorder::new();

    let marking = apply_dscp_if_configured(&tc, SOCKET, routable(), &dscp(10)).unwrap();

    assert!(marking.is_exact());
    assert_eq!(marking.category(), TrafficCategory::Background);
    assert_eq!(
        tc.calls().last(),
        Some(&Call::SetOutgoingDscp { handle: 1, flow: FlowId(1), dscp: 10 })
    );
}

#[test]
fn dropping_the_marking_releases_flow_then_session() {
    let tc = Recorder::new();

    let marking = apply_dscp_if_configured(&tc, SOCKET, routable(), &dscp(56)).unwrap();
    assert_eq!(tc.calls().len(), 3);
    drop(marking);

    assert_eq!(
        tc.calls()[3..],
        [
            Call::RemoveSocketFromFlow { handle: 1, socket: SOCKET, flow: FlowId(1) },
            Call::CloseHandle(1),
        ]
    );
}

#[test]
fn discarded_marking_is_released_at_once() {
    let tc = Recorder::new();

    let _ = apply_dscp_if_configured(&tc, SOCKET, routable(), &dscp(46));

    assert_eq!(
        tc.calls(),
        vec![
            Call::CreateHandle(QosVersion::V1_0),
            Call::AddSocketToFlow {
                handle: 1,
                socket: SOCKET,
                destination: routable(),
                category: TrafficCategory::AudioVideo,
            },
            Call::SetOutgoingDscp { handle: 1, flow: FlowId(1), dscp: 46 },
            Call::RemoveSocketFromFlow { handle: 1, socket: SOCKET, flow: FlowId(1) },
            Call::CloseHandle(1),
        ]
    );
}

#[test]
fn unavailable_subsystem_stops_immediately() {
    let tc = Recorder::new().unavailable();

    let (marking, logs) = capture(|| apply_dscp_if_configured(&tc, SOCKET, routable(), &dscp(46)));

    assert!(marking.is_none());
    assert_eq!(tc.calls(), vec![Call::CreateHandle(QosVersion::V1_0)]);
    assert!(has_level(&logs, Level::ERROR), "{logs}");
}

#[test]
fn unexpected_bind_failure_is_an_error() {
    // ERROR_NOT_SUPPORTED
    let tc = Recorder::new().failing_binds(50);

    let (marking, logs) = capture(|| apply_dscp_if_configured(&tc, SOCKET, routable(), &dscp(46)));

    assert!(marking.is_none());
    assert_eq!(tc.calls().len(), 3);
    assert_eq!(tc.calls().last(), Some(&Call::CloseHandle(1)));
    assert!(has_level(&logs, Level::ERROR), "{logs}");
}

#[test]
fn category_follows_dscp() {
    let cases = [
        (0, TrafficCategory::BestEffort),
        (7, TrafficCategory::BestEffort),
        (8, TrafficCategory::Background),
        (39, TrafficCategory::Background),
        (40, TrafficCategory::AudioVideo),
        (55, TrafficCategory::AudioVideo),
        (56, TrafficCategory::Control),
        (63, TrafficCategory::Control),
    ];

    for (value, expected) in cases {
        let tc = Recorder::new();
        let marking = apply_dscp_if_configured(&tc, SOCKET, routable(), &dscp(value)).unwrap();

        assert_eq!(marking.category(), expected, "dscp {value}");
        assert!(matches!(
            tc.calls()[1],
            Call::AddSocketToFlow { category, .. } if category == expected
        ));
    }
}

#[test]
fn repeated_calls_are_independent() {
    let tc = Recorder::new();
    let config = dscp(46);

    let first = apply_dscp_if_configured(&tc, SOCKET, routable(), &config).unwrap();
    let second = apply_dscp_if_configured(&tc, SOCKET, routable(), &config).unwrap();

    assert_ne!(first.flow().id(), second.flow().id());

    let calls = tc.calls();
    let creates = calls.iter().filter(|c| matches!(c, Call::CreateHandle(_))).count();
    let binds: Vec<_> = calls
        .iter()
        .filter_map(|c| match c {
            Call::AddSocketToFlow { handle, .. } => Some(*handle),
            _ => None,
        })
        .collect();

    assert_eq!(creates, 2);
    assert_eq!(binds, vec![1, 2]);
}
