//! The signaling bridge (C9): nothing here reaches the network itself, it
//! only parses whatever a signaling channel handed the application into
//! the shape `RTCPeerConnection` understands, or serializes the other way.
//! Transport of the resulting JSON (WebSocket, long-poll, copy/paste) is
//! the application's problem.

use serde::{Deserialize, Serialize};
use shared::error::{Error, Result};

use crate::peer_connection::transport::ice::RTCIceCandidate;
use crate::sdp::{RTCSdpType, RTCSessionDescription};

/// https://www.w3.org/TR/webrtc/#dom-rtcsessiondescriptioninit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCSessionDescriptionInit {
    #[serde(rename = "type")]
    pub sdp_type: RTCSdpType,
    pub sdp: String,
}

impl From<RTCSessionDescriptionInit> for RTCSessionDescription {
    fn from(init: RTCSessionDescriptionInit) -> Self {
        RTCSessionDescription {
            sdp_type: init.sdp_type,
            sdp: init.sdp,
        }
    }
}

/// https://www.w3.org/TR/webrtc/#dom-rtcicecandidateinit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RTCIceCandidateInit {
    pub candidate: String,
    pub sdp_mid: Option<String>,
    pub sdp_m_line_index: Option<u16>,
}

/// Parsed form of one signaling message, tagged by which kind it was so a
/// caller can match on it without re-parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalingMessage {
    Description(RTCSessionDescriptionInit),
    Candidate(RTCIceCandidateInit),
}

/// Parses one signaling message of unknown shape. Distinguishes a session
/// description from an ICE candidate by field presence (`sdp`+`type` vs
/// `candidate`) rather than requiring an envelope, since most signaling
/// servers forward whatever `createOffer`/`onicecandidate` produced
/// untouched.
pub fn try_parse(data: &str) -> Result<SignalingMessage> {
    let value: serde_json::Value =
        serde_json::from_str(data).map_err(|e| Error::ErrSignalingParse(e.to_string()))?;

    if value.get("sdp").is_some() && value.get("type").is_some() {
        let desc: RTCSessionDescriptionInit =
            serde_json::from_value(value).map_err(|e| Error::ErrSignalingParse(e.to_string()))?;
        return Ok(SignalingMessage::Description(desc));
    }
    if value.get("candidate").is_some() {
        let candidate: RTCIceCandidateInit =
            serde_json::from_value(value).map_err(|e| Error::ErrSignalingParse(e.to_string()))?;
        return Ok(SignalingMessage::Candidate(candidate));
    }
    Err(Error::ErrUnknownSignalingShape)
}

/// Converts a parsed ICE candidate's SDP attribute line into the transport
/// boundary's candidate type. A real implementation parses the
/// `candidate:` attribute grammar (RFC 8839 section 5.1); that grammar
/// itself is out of scope here, same as the rest of ICE.
pub fn candidate_from_init(_init: &RTCIceCandidateInit) -> Result<RTCIceCandidate> {
    Err(Error::ErrInvalidSdp(
        "ICE candidate attribute parsing is not implemented by this crate".into(),
    ))
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_offer() {
        let json = r#"{"type":"offer","sdp":"v=0"}"#;
        match try_parse(json).unwrap() {
            SignalingMessage::Description(desc) => {
                assert_eq!(desc.sdp_type, RTCSdpType::Offer);
                assert_eq!(desc.sdp, "v=0");
            }
            other => panic!("expected a description, got {other:?}"),
        }
    }

    #[test]
    fn parses_candidate() {
        let json = r#"{"candidate":"candidate:1 1 udp 1 1.2.3.4 5 typ host","sdpMid":"0","sdpMLineIndex":0}"#;
        match try_parse(json).unwrap() {
            SignalingMessage::Candidate(c) => {
                assert_eq!(c.sdp_mid.as_deref(), Some("0"));
            }
            other => panic!("expected a candidate, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_shape() {
        let err = try_parse(r#"{"foo":"bar"}"#).unwrap_err();
        assert_eq!(err, Error::ErrUnknownSignalingShape);
    }

    #[test]
    fn rejects_invalid_json() {
        let err = try_parse("not json").unwrap_err();
        assert_matches!(err, Error::ErrSignalingParse(_));
    }
}
