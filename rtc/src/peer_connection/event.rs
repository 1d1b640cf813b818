use crate::data_channel::RTCDataChannel;
use crate::peer_connection::state::{
    RTCIceConnectionState, RTCIceGatheringState, RTCPeerConnectionState, RTCSignalingState,
};
use crate::peer_connection::transport::ice::RTCIceCandidate;

/// Events `RTCPeerConnection` surfaces to its owner via `poll_event`,
/// mirroring the W3C event set without requiring an `EventTarget`.
#[derive(Debug, Clone)]
pub enum RTCPeerConnectionEvent {
    SignalingStateChange(RTCSignalingState),
    IceConnectionStateChange(RTCIceConnectionState),
    IceGatheringStateChange(RTCIceGatheringState),
    ConnectionStateChange(RTCPeerConnectionState),
    IceCandidate(RTCIceCandidate),
    IceCandidateError { url: String, error_text: String },
    DataChannel(RTCDataChannel),
    NegotiationNeeded,
}
