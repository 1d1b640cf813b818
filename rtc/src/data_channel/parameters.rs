use datachannel::{ChannelType, DataChannelOpen, CHANNEL_PRIORITY_NORMAL};

use super::init::RTCDataChannelInit;

/// The resolved parameters a channel is actually driven with, once
/// `RTCDataChannelInit`'s optional fields have had their W3C defaults
/// applied and the reliability policy has been folded into a single
/// `ChannelType` the DCEP OPEN message can carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataChannelParameters {
    pub label: String,
    pub protocol: String,
    pub ordered: bool,
    pub max_packet_life_time: Option<u16>,
    pub max_retransmits: Option<u16>,
    pub negotiated: bool,
    pub id: Option<u16>,
    pub priority: u16,
}

impl DataChannelParameters {
    pub fn from_init(label: impl Into<String>, init: &RTCDataChannelInit) -> Self {
        Self {
            label: label.into(),
            protocol: init.protocol.clone().unwrap_or_default(),
            ordered: init.ordered.unwrap_or(true),
            max_packet_life_time: init.max_packet_life_time,
            max_retransmits: init.max_retransmits,
            negotiated: init.negotiated.unwrap_or(false),
            id: init.id,
            priority: CHANNEL_PRIORITY_NORMAL,
        }
    }

    /// The DCEP `Channel Type` byte this set of parameters maps to
    /// (RFC 8832 section 8).
    pub fn channel_type(&self) -> ChannelType {
        match (self.ordered, self.max_retransmits, self.max_packet_life_time) {
            (true, None, None) => ChannelType::Reliable,
            (false, None, None) => ChannelType::ReliableUnordered,
            (true, Some(_), None) => ChannelType::PartialReliableRexmit,
            (false, Some(_), None) => ChannelType::PartialReliableRexmitUnordered,
            (true, None, Some(_)) => ChannelType::PartialReliableTimed,
            (false, None, Some(_)) => ChannelType::PartialReliableTimedUnordered,
            // validated mutually exclusive before construction; fall back
            // to the retransmit policy if it somehow wasn't.
            (true, Some(_), Some(_)) => ChannelType::PartialReliableRexmit,
            (false, Some(_), Some(_)) => ChannelType::PartialReliableRexmitUnordered,
        }
    }

    pub fn reliability_parameter(&self) -> u32 {
        self.max_retransmits
            .or(self.max_packet_life_time)
            .map(u32::from)
            .unwrap_or(0)
    }

    /// Reconstructs the parameters a remotely-opened channel is driven with
    /// from the DCEP OPEN message that announced it
    /// (https://www.w3.org/TR/webrtc/#data-channel-establishment-protocol
    /// step 2.2), inverting [`Self::channel_type`]/[`Self::reliability_parameter`].
    pub fn from_dcep_open(stream_id: u16, open: &DataChannelOpen) -> Self {
        let ordered = !open.channel_type.is_unordered();
        let reliability_parameter = open.reliability_parameter as u16;
        let (max_retransmits, max_packet_life_time) = match open.channel_type {
            ChannelType::PartialReliableRexmit | ChannelType::PartialReliableRexmitUnordered => {
                (Some(reliability_parameter), None)
            }
            ChannelType::PartialReliableTimed | ChannelType::PartialReliableTimedUnordered => {
                (None, Some(reliability_parameter))
            }
            ChannelType::Reliable | ChannelType::ReliableUnordered => (None, None),
        };
        Self {
            label: open.label.clone(),
            protocol: open.protocol.clone(),
            ordered,
            max_packet_life_time,
            max_retransmits,
            negotiated: false,
            id: Some(stream_id),
            priority: open.priority,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_to_reliable_ordered() {
        let params = DataChannelParameters::from_init("chat", &RTCDataChannelInit::default());
        assert!(params.ordered);
        assert_eq!(params.channel_type(), ChannelType::Reliable);
        assert_eq!(params.reliability_parameter(), 0);
    }

    #[test]
    fn unordered_partial_reliable_rexmit() {
        let init = RTCDataChannelInit {
            ordered: Some(false),
            max_retransmits: Some(5),
            ..Default::default()
        };
        let params = DataChannelParameters::from_init("chat", &init);
        assert_eq!(params.channel_type(), ChannelType::PartialReliableRexmitUnordered);
        assert_eq!(params.reliability_parameter(), 5);
    }
}
