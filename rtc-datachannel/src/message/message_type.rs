use shared::error::Error;

/// The `Message Type` field of a DCEP message (RFC 8832 section 5).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MessageType {
    DataChannelAck,
    DataChannelOpen,
}

pub(crate) const MESSAGE_TYPE_ACK: u8 = 0x02;
pub(crate) const MESSAGE_TYPE_OPEN: u8 = 0x03;

impl From<MessageType> for u8 {
    fn from(t: MessageType) -> Self {
        match t {
            MessageType::DataChannelAck => MESSAGE_TYPE_ACK,
            MessageType::DataChannelOpen => MESSAGE_TYPE_OPEN,
        }
    }
}

impl TryFrom<u8> for MessageType {
    type Error = Error;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            MESSAGE_TYPE_ACK => Ok(Self::DataChannelAck),
            MESSAGE_TYPE_OPEN => Ok(Self::DataChannelOpen),
            other => Err(Error::ErrInvalidMessageType(other)),
        }
    }
}
