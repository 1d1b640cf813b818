//! The high-level data channel (C6): the W3C-shaped `RTCDataChannel`
//! surface, built on top of `rtc-datachannel`'s low-level DCEP/message
//! engine and the id-allocating collection (C5) that owns it.

mod collection;
mod event;
mod init;
mod internal;
mod message;
mod parameters;
mod state;

pub use collection::DataChannelCollection;
pub use event::RTCDataChannelEvent;
pub use init::RTCDataChannelInit;
pub use internal::RTCDataChannelInternal;
pub use message::RTCDataChannelMessage;
pub use parameters::DataChannelParameters;
pub use state::RTCDataChannelState;

/// https://www.w3.org/TR/webrtc/#dom-rtcdatachannel
///
/// A thin, owned handle over [`RTCDataChannelInternal`]: every accessor and
/// mutator here just forwards, the bookkeeping lives in the internal type
/// so the collection (C5) can hold channels directly without an extra
/// indirection layer.
#[derive(Debug, Clone)]
pub struct RTCDataChannel {
    label: String,
    protocol: String,
    id: Option<u16>,
    negotiated: bool,
    ordered: bool,
    max_packet_life_time: Option<u16>,
    max_retransmits: Option<u16>,
}

impl RTCDataChannel {
    pub fn new(parameters: &DataChannelParameters) -> Self {
        Self {
            label: parameters.label.clone(),
            protocol: parameters.protocol.clone(),
            id: parameters.id,
            negotiated: parameters.negotiated,
            ordered: parameters.ordered,
            max_packet_life_time: parameters.max_packet_life_time,
            max_retransmits: parameters.max_retransmits,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn id(&self) -> Option<u16> {
        self.id
    }

    pub fn negotiated(&self) -> bool {
        self.negotiated
    }

    pub fn ordered(&self) -> bool {
        self.ordered
    }

    pub fn max_packet_life_time(&self) -> Option<u16> {
        self.max_packet_life_time
    }

    pub fn max_retransmits(&self) -> Option<u16> {
        self.max_retransmits
    }
}
