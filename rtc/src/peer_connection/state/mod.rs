mod ice_connection_state;
mod ice_gathering_state;
mod peer_connection_state;
mod signaling_state;

pub use ice_connection_state::RTCIceConnectionState;
pub use ice_gathering_state::RTCIceGatheringState;
pub use peer_connection_state::{combine_connection_state, RTCPeerConnectionState};
pub use signaling_state::{check_next_signaling_state, RTCSignalingState, StateChangeOp};
