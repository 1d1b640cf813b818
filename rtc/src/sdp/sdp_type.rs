use std::fmt;

use serde::{Deserialize, Serialize};

/// https://www.w3.org/TR/webrtc/#dom-rtcsdptype
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RTCSdpType {
    Offer,
    Pranswer,
    Answer,
    Rollback,
}

impl fmt::Display for RTCSdpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Offer => "offer",
            Self::Pranswer => "pranswer",
            Self::Answer => "answer",
            Self::Rollback => "rollback",
        };
        write!(f, "{s}")
    }
}
