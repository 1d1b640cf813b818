use std::fmt;

use shared::error::{Error, Result};

use crate::sdp::RTCSdpType;

/// https://www.w3.org/TR/webrtc/#dom-rtcsignalingstate
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RTCSignalingState {
    #[default]
    Stable,
    HaveLocalOffer,
    HaveRemoteOffer,
    HaveLocalPranswer,
    HaveRemotePranswer,
    Closed,
}

impl fmt::Display for RTCSignalingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Stable => "stable",
            Self::HaveLocalOffer => "have-local-offer",
            Self::HaveRemoteOffer => "have-remote-offer",
            Self::HaveLocalPranswer => "have-local-pranswer",
            Self::HaveRemotePranswer => "have-remote-pranswer",
            Self::Closed => "closed",
        };
        write!(f, "{s}")
    }
}

/// Which side of the pair a description is being applied to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StateChangeOp {
    SetLocal,
    SetRemote,
}

impl fmt::Display for StateChangeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetLocal => write!(f, "SetLocal"),
            Self::SetRemote => write!(f, "SetRemote"),
        }
    }
}

/// Validates a proposed signaling state transition against the JSEP state
/// machine (W3C WebRTC section 4.3.1). `next` is the state the caller wants
/// to end up in; on success it is simply echoed back, on failure the
/// current state is left untouched by the caller.
///
/// Rollback (`sdp_type == Rollback`) returns to stable from any
/// non-stable state; rolling back out of stable itself is rejected since
/// there is nothing to roll back. Re-offering (setLocalDescription(offer)
/// while already have-local-offer, or the remote equivalent) is a legal
/// no-op transition back into the same state, used to renegotiate.
pub fn check_next_signaling_state(
    cur: RTCSignalingState,
    next: RTCSignalingState,
    op: StateChangeOp,
    sdp_type: RTCSdpType,
) -> Result<RTCSignalingState> {
    if sdp_type == RTCSdpType::Rollback {
        if cur == RTCSignalingState::Stable || cur == RTCSignalingState::Closed {
            return Err(Error::ErrSignalingStateCannotRollback);
        }
        return Ok(RTCSignalingState::Stable);
    }

    let valid = match cur {
        RTCSignalingState::Stable => match op {
            StateChangeOp::SetLocal => {
                sdp_type == RTCSdpType::Offer && next == RTCSignalingState::HaveLocalOffer
            }
            StateChangeOp::SetRemote => {
                sdp_type == RTCSdpType::Offer && next == RTCSignalingState::HaveRemoteOffer
            }
        },
        RTCSignalingState::HaveLocalOffer => match op {
            StateChangeOp::SetLocal => {
                sdp_type == RTCSdpType::Offer && next == RTCSignalingState::HaveLocalOffer
            }
            StateChangeOp::SetRemote => {
                (sdp_type == RTCSdpType::Answer && next == RTCSignalingState::Stable)
                    || (sdp_type == RTCSdpType::Pranswer
                        && next == RTCSignalingState::HaveRemotePranswer)
            }
        },
        RTCSignalingState::HaveRemotePranswer => {
            op == StateChangeOp::SetRemote
                && sdp_type == RTCSdpType::Answer
                && next == RTCSignalingState::Stable
        }
        RTCSignalingState::HaveRemoteOffer => match op {
            StateChangeOp::SetRemote => {
                sdp_type == RTCSdpType::Offer && next == RTCSignalingState::HaveRemoteOffer
            }
            StateChangeOp::SetLocal => {
                (sdp_type == RTCSdpType::Answer && next == RTCSignalingState::Stable)
                    || (sdp_type == RTCSdpType::Pranswer
                        && next == RTCSignalingState::HaveLocalPranswer)
            }
        },
        RTCSignalingState::HaveLocalPranswer => {
            op == StateChangeOp::SetLocal
                && sdp_type == RTCSdpType::Answer
                && next == RTCSignalingState::Stable
        }
        RTCSignalingState::Closed => false,
    };

    if valid {
        Ok(next)
    } else {
        Err(Error::ErrInvalidSignalingState(format!(
            "{cur}->{next}({op})"
        )))
    }
}
