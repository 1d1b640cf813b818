use shared::error::{Error, Result};

/// https://www.w3.org/TR/webrtc/#dom-rtcdatachannelinit
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RTCDataChannelInit {
    pub ordered: Option<bool>,
    pub max_packet_life_time: Option<u16>,
    pub max_retransmits: Option<u16>,
    pub protocol: Option<String>,
    pub negotiated: Option<bool>,
    pub id: Option<u16>,
}

impl RTCDataChannelInit {
    /// https://www.w3.org/TR/webrtc/#dom-rtcpeerconnection-createdatachannel
    /// step 5: a channel cannot be both partially-reliable-by-retransmit-count
    /// and partially-reliable-by-lifetime.
    pub fn validate(&self) -> Result<()> {
        if self.max_packet_life_time.is_some() && self.max_retransmits.is_some() {
            return Err(Error::ErrRetransmitsAndLifetimeBothSet);
        }
        Ok(())
    }
}
