use std::fmt;

/// https://www.w3.org/TR/webrtc/#dom-rtcicegatheringstate
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RTCIceGatheringState {
    #[default]
    New,
    Gathering,
    Complete,
}

impl fmt::Display for RTCIceGatheringState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::New => "new",
            Self::Gathering => "gathering",
            Self::Complete => "complete",
        };
        write!(f, "{s}")
    }
}
