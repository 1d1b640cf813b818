use bytes::Bytes;
use shared::error::Result;

use crate::peer_connection::state::{RTCIceConnectionState, RTCIceGatheringState};

/// https://www.w3.org/TR/webrtc/#dom-rtcicecandidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RTCIceCandidate {
    pub foundation: String,
    pub component: u16,
    pub priority: u32,
    pub address: String,
    pub port: u16,
    pub sdp_mid: Option<String>,
    pub sdp_mline_index: Option<u16>,
}

/// The boundary this crate drives an ICE agent through: candidate
/// gathering, connectivity checks, and STUN handling are all out of scope
/// (Non-goal), but the peer connection still needs to observe the agent's
/// state and move bytes the demuxer (C2) classified as STUN through it.
pub trait IceTransport: Send {
    fn connection_state(&self) -> RTCIceConnectionState;
    fn gathering_state(&self) -> RTCIceGatheringState;

    fn add_remote_candidate(&mut self, candidate: RTCIceCandidate) -> Result<()>;

    /// Feed one inbound datagram already identified as STUN by the demuxer.
    fn handle_receive(&mut self, data: &[u8]) -> Result<()>;

    /// STUN packets ready to send on the underlying socket.
    fn poll_transmit(&mut self) -> Option<Bytes>;

    /// Once connected, every other packet (DTLS, RTP/RTCP) is sent over
    /// this same selected candidate pair.
    fn send(&mut self, data: &[u8]) -> Result<()>;

    fn close(&mut self);
}
