use std::fmt;

/// https://www.w3.org/TR/webrtc/#dom-rtcdatachannelstate
///
/// `Closing` is modeled as a real state a caller can observe, rather than
/// collapsing straight to `Closed`: once `close()` is called the channel
/// still has to drain whatever is already queued for send before the SCTP
/// stream actually resets, and `readyState` needs to reflect that.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RTCDataChannelState {
    #[default]
    Connecting,
    Open,
    Closing,
    Closed,
}

impl fmt::Display for RTCDataChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
        };
        write!(f, "{s}")
    }
}
