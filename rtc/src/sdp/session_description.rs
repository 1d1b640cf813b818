use serde::{Deserialize, Serialize};

use super::RTCSdpType;

/// https://www.w3.org/TR/webrtc/#dom-rtcsessiondescription
///
/// SDP parsing/generation (ICE candidates, DTLS fingerprints, media
/// sections) is out of scope here; `sdp` is carried opaquely between the
/// signaling bridge and whatever assembles it from the ICE/DTLS/SCTP
/// collaborators. Only `sdp_type` drives the signaling state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCSessionDescription {
    #[serde(rename = "type")]
    pub sdp_type: RTCSdpType,
    pub sdp: String,
}

impl RTCSessionDescription {
    pub fn offer(sdp: String) -> Self {
        Self {
            sdp_type: RTCSdpType::Offer,
            sdp,
        }
    }

    pub fn answer(sdp: String) -> Self {
        Self {
            sdp_type: RTCSdpType::Answer,
            sdp,
        }
    }

    pub fn pranswer(sdp: String) -> Self {
        Self {
            sdp_type: RTCSdpType::Pranswer,
            sdp,
        }
    }

    pub fn rollback() -> Self {
        Self {
            sdp_type: RTCSdpType::Rollback,
            sdp: String::new(),
        }
    }
}
