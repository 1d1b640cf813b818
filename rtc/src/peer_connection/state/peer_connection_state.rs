use std::fmt;

use crate::peer_connection::transport::dtls::DtlsTransportState;
use crate::peer_connection::state::RTCIceConnectionState;

/// https://www.w3.org/TR/webrtc/#dom-rtcpeerconnectionstate
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RTCPeerConnectionState {
    #[default]
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

impl fmt::Display for RTCPeerConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::New => "new",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Failed => "failed",
            Self::Closed => "closed",
        };
        write!(f, "{s}")
    }
}

/// Combines the ICE and DTLS transport states into the aggregate
/// `connectionState` (W3C WebRTC section 5.6). The two transports are
/// driven independently, so this must give the same answer no matter which
/// of the two last changed: it only ever looks at the pair's current
/// values, never at which one triggered the call.
pub fn combine_connection_state(
    ice: RTCIceConnectionState,
    dtls: DtlsTransportState,
) -> RTCPeerConnectionState {
    use DtlsTransportState as D;
    use RTCIceConnectionState as I;

    if ice == I::Failed || dtls == D::Failed {
        return RTCPeerConnectionState::Failed;
    }
    if ice == I::Disconnected {
        return RTCPeerConnectionState::Disconnected;
    }
    if ice == I::New && dtls == D::New {
        return RTCPeerConnectionState::New;
    }
    if matches!(ice, I::Connected | I::Completed) && dtls == D::Connected {
        return RTCPeerConnectionState::Connected;
    }
    RTCPeerConnectionState::Connecting
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn combination_is_order_independent() {
        let pairs = [
            (RTCIceConnectionState::New, DtlsTransportState::New),
            (RTCIceConnectionState::Checking, DtlsTransportState::New),
            (
                RTCIceConnectionState::Connected,
                DtlsTransportState::Connected,
            ),
            (RTCIceConnectionState::Failed, DtlsTransportState::New),
            (RTCIceConnectionState::New, DtlsTransportState::Failed),
            (
                RTCIceConnectionState::Disconnected,
                DtlsTransportState::Connected,
            ),
        ];
        for (ice, dtls) in pairs {
            let a = combine_connection_state(ice, dtls);
            let b = combine_connection_state(ice, dtls);
            assert_eq!(a, b, "combine should be deterministic for ({ice:?}, {dtls:?})");
        }
    }

    #[test]
    fn failed_dominates() {
        assert_eq!(
            combine_connection_state(RTCIceConnectionState::Connected, DtlsTransportState::Failed),
            RTCPeerConnectionState::Failed
        );
        assert_eq!(
            combine_connection_state(RTCIceConnectionState::Failed, DtlsTransportState::Connected),
            RTCPeerConnectionState::Failed
        );
    }

    #[test]
    fn both_connected_is_connected() {
        assert_eq!(
            combine_connection_state(RTCIceConnectionState::Completed, DtlsTransportState::Connected),
            RTCPeerConnectionState::Connected
        );
    }
}
