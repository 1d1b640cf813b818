//! DCEP (RFC 8832) wire framing. [`Message`] is every message type ever sent
//! on the dedicated DCEP control stream a data channel opens on; everything
//! else the channel exchanges goes over the `rtc_sctp::PayloadProtocolIdentifier`
//! string/binary PPIDs untouched by this module.

pub mod message_channel_ack;
pub mod message_channel_open;
pub mod message_type;

use bytes::{Buf, Bytes};
use shared::error::Result;
use shared::marshal::{Marshal, MarshalSize, Unmarshal};

pub use message_channel_ack::DataChannelAck;
pub use message_channel_open::{
    ChannelType, DataChannelOpen, CHANNEL_PRIORITY_BELOW_NORMAL, CHANNEL_PRIORITY_EXTRA_HIGH,
    CHANNEL_PRIORITY_HIGH, CHANNEL_PRIORITY_NORMAL,
};
pub use message_type::MessageType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Ack(DataChannelAck),
    Open(DataChannelOpen),
}

impl MarshalSize for Message {
    fn marshal_size(&self) -> usize {
        match self {
            Message::Ack(m) => m.marshal_size(),
            Message::Open(m) => m.marshal_size(),
        }
    }
}

impl Marshal for Message {
    fn marshal_to(&self, buf: &mut [u8]) -> Result<usize> {
        match self {
            Message::Ack(m) => m.marshal_to(buf),
            Message::Open(m) => m.marshal_to(buf),
        }
    }
}

impl Unmarshal for Message {
    fn unmarshal<B>(buf: &mut B) -> Result<Self>
    where
        Self: Sized,
        B: Buf,
    {
        if buf.remaining() < 1 {
            return Err(shared::error::Error::UnexpectedEndOfBuffer {
                expected: 1,
                actual: 0,
            });
        }
        let message_type = MessageType::try_from(buf.get_u8())?;
        match message_type {
            MessageType::DataChannelAck => Ok(Message::Ack(DataChannelAck::unmarshal(buf)?)),
            MessageType::DataChannelOpen => Ok(Message::Open(DataChannelOpen::unmarshal(buf)?)),
        }
    }
}

impl Message {
    pub fn unmarshal_bytes(data: &[u8]) -> Result<Self> {
        let mut b = Bytes::copy_from_slice(data);
        Self::unmarshal(&mut b)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ack_round_trips() {
        let msg = Message::Ack(DataChannelAck);
        let packed = msg.marshal().unwrap();
        assert_eq!(packed.len(), 1);
        let decoded = Message::unmarshal_bytes(&packed).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn open_round_trips() {
        let msg = Message::Open(DataChannelOpen {
            channel_type: ChannelType::Reliable,
            priority: CHANNEL_PRIORITY_NORMAL,
            reliability_parameter: 0,
            label: "label".to_string(),
            protocol: "proto".to_string(),
        });
        let packed = msg.marshal().unwrap();
        let decoded = Message::unmarshal_bytes(&packed).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn unknown_message_type_is_rejected() {
        assert!(Message::unmarshal_bytes(&[0xff]).is_err());
    }
}
