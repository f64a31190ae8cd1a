//! The Windows quality Windows audio/video experience (qWAVE) backend, `qos2.h`.

use std::{ffi::c_void, io, mem, net::SocketAddr, os::windows::io::AsRawSocket, ptr};

use qosmark_common::EndpointConfig;
use socket2::SockAddr;
use windows_sys::Win32::{
    Foundation::HANDLE,
    NetworkManagement::QoS::{
        QOSAddSocketToFlow, QOSCloseHandle, QOSCreateHandle, QOSRemoveSocketFromFlow, QOSSetFlow,
        QOSSetOutgoingDSCPValue, QOSTrafficTypeAudioVideo, QOSTrafficTypeBackground,
        QOSTrafficTypeBestEffort, QOSTrafficTypeControl, QOS_NON_ADAPTIVE_FLOW, QOS_TRAFFIC_TYPE,
        QOS_VERSION,
    },
    Networking::WinSock::{SOCKADDR, SOCKET},
};

use crate::{
    apply_dscp_if_configured, Dscp, FlowId, Marking, QosVersion, RawSocket, TrafficCategory,
    TrafficControl,
};

static QWAVE: Qwave = Qwave;

/// Marks `socket` with the DSCP configured in `config` through qWAVE.
///
/// See [`apply_dscp_if_configured`]. The marking only lasts while the returned [`Marking`] is
/// alive: discarding it leaves the socket unmarked.
#[must_use = "dropping the marking removes the socket from its flow"]
pub fn set_dscp_if_configured(
    socket: &impl AsRawSocket,
    destination: SocketAddr,
    config: &impl EndpointConfig,
) -> Option<Marking<'static, Qwave>> {
    apply_dscp_if_configured(&QWAVE, socket.as_raw_socket(), destination, config)
}

/// The qWAVE traffic-control subsystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct Qwave;

/// An open qWAVE handle.
#[derive(Debug)]
pub struct QosHandle(HANDLE);

const fn traffic_type(category: TrafficCategory) -> QOS_TRAFFIC_TYPE {
    match category {
        TrafficCategory::BestEffort => QOSTrafficTypeBestEffort,
        TrafficCategory::Background => QOSTrafficTypeBackground,
        TrafficCategory::AudioVideo => QOSTrafficTypeAudioVideo,
        TrafficCategory::Control => QOSTrafficTypeControl,
    }
}

/// Maps a `BOOL` result to the thread's last error.
fn check(ok: i32) -> io::Result<()> {
    if ok == 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

impl TrafficControl for Qwave {
    type Handle = QosHandle;

    fn create_handle(&self, version: QosVersion) -> io::Result<QosHandle> {
        let version = QOS_VERSION { MajorVersion: version.major, MinorVersion: version.minor };
        let mut handle = 0 as HANDLE;

        // SAFETY: both pointers refer to live locals for the duration of the call.
        check(unsafe { QOSCreateHandle(&version, &mut handle) })?;

        Ok(QosHandle(handle))
    }

    fn close_handle(&self, handle: &QosHandle) -> io::Result<()> {
        // SAFETY: the handle was returned by `QOSCreateHandle` and is closed only once, when its
        // owning session is dropped.
        check(unsafe { QOSCloseHandle(handle.0) })
    }

    fn add_socket_to_flow(
        &self,
        handle: &QosHandle,
        socket: RawSocket,
        destination: SocketAddr,
        category: TrafficCategory,
    ) -> io::Result<FlowId> {
        let addr = SockAddr::from(destination);
        let mut flow_id = 0u32;

        // SAFETY: `addr` outlives the call and holds a sockaddr of the correct family and length;
        // `flow_id` is a live local.
        check(unsafe {
            QOSAddSocketToFlow(
                handle.0,
                socket as SOCKET,
                addr.as_ptr().cast::<SOCKADDR>(),
                traffic_type(category),
                QOS_NON_ADAPTIVE_FLOW,
                &mut flow_id,
            )
        })?;

        Ok(FlowId(flow_id))
    }

    fn remove_socket_from_flow(
        &self,
        handle: &QosHandle,
        socket: RawSocket,
        flow: FlowId,
    ) -> io::Result<()> {
        // SAFETY: plain values, no pointers.
        check(unsafe { QOSRemoveSocketFromFlow(handle.0, socket as SOCKET, flow.0, 0) })
    }

    fn set_outgoing_dscp(&self, handle: &QosHandle, flow: FlowId, dscp: Dscp) -> io::Result<()> {
        // The subsystem expects a DWORD.
        let value = u32::from(dscp.value());

        // SAFETY: `value` outlives the synchronous call (no OVERLAPPED) and `size` matches it.
        check(unsafe {
            QOSSetFlow(
                handle.0,
                flow.0,
                QOSSetOutgoingDSCPValue,
                mem::size_of::<u32>() as u32,
                ptr::addr_of!(value).cast::<c_void>(),
                0,
                ptr::null_mut(),
            )
        })
    }
}
