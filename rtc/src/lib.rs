#![warn(rust_2018_idioms)]
#![allow(dead_code)]

//! `RTCPeerConnection`/`RTCDataChannel` built on the SCTP association and
//! DCEP layers below: the signaling state machine, the packet demultiplexer,
//! and the collaborator trait boundaries (ICE, DTLS) the rest of a full
//! WebRTC stack plugs into.

pub mod data_channel;
pub mod peer_connection;
pub mod sdp;
pub mod signaling;

pub use data_channel::{RTCDataChannel, RTCDataChannelEvent, RTCDataChannelInit, RTCDataChannelState};
pub use peer_connection::certificate::RTCCertificate;
pub use peer_connection::configuration::{RTCConfiguration, RTCConfigurationBuilder, RTCIceServer};
pub use peer_connection::event::RTCPeerConnectionEvent;
pub use peer_connection::state::{
    RTCIceConnectionState, RTCIceGatheringState, RTCPeerConnectionState, RTCSignalingState,
};
pub use peer_connection::RTCPeerConnection;
pub use sdp::{RTCSdpType, RTCSessionDescription};
