use bytes::{Buf, BufMut};
use shared::error::{Error, Result};
use shared::marshal::{Marshal, MarshalSize, Unmarshal};

pub const CHANNEL_PRIORITY_BELOW_NORMAL: u16 = 128;
pub const CHANNEL_PRIORITY_NORMAL: u16 = 256;
pub const CHANNEL_PRIORITY_HIGH: u16 = 512;
pub const CHANNEL_PRIORITY_EXTRA_HIGH: u16 = 1024;

const OPEN_HEADER_LENGTH: usize = 12;

/// The `Channel Type` field of a DCEP OPEN message. The high bit marks
/// unordered delivery; the low bits select the PR-SCTP reliability policy.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChannelType {
    Reliable,
    ReliableUnordered,
    PartialReliableRexmit,
    PartialReliableRexmitUnordered,
    PartialReliableTimed,
    PartialReliableTimedUnordered,
}

impl ChannelType {
    pub fn is_unordered(&self) -> bool {
        matches!(
            self,
            Self::ReliableUnordered
                | Self::PartialReliableRexmitUnordered
                | Self::PartialReliableTimedUnordered
        )
    }
}

impl From<ChannelType> for u8 {
    fn from(c: ChannelType) -> Self {
        match c {
            ChannelType::Reliable => 0x00,
            ChannelType::PartialReliableRexmit => 0x01,
            ChannelType::PartialReliableTimed => 0x02,
            ChannelType::ReliableUnordered => 0x80,
            ChannelType::PartialReliableRexmitUnordered => 0x81,
            ChannelType::PartialReliableTimedUnordered => 0x82,
        }
    }
}

impl TryFrom<u8> for ChannelType {
    type Error = Error;

    fn try_from(v: u8) -> Result<Self> {
        match v {
            0x00 => Ok(Self::Reliable),
            0x01 => Ok(Self::PartialReliableRexmit),
            0x02 => Ok(Self::PartialReliableTimed),
            0x80 => Ok(Self::ReliableUnordered),
            0x81 => Ok(Self::PartialReliableRexmitUnordered),
            0x82 => Ok(Self::PartialReliableTimedUnordered),
            other => Err(Error::ErrMalformedDcep(format!(
                "unknown channel type 0x{other:02x}"
            ))),
        }
    }
}

/// The DCEP OPEN message (RFC 8832 section 5.1), sent on the stream a data
/// channel is being opened on. `label`/`protocol` are UTF-8 text per the
/// RFC; malformed bytes fail to unmarshal rather than being carried as
/// opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataChannelOpen {
    pub channel_type: ChannelType,
    pub priority: u16,
    pub reliability_parameter: u32,
    pub label: String,
    pub protocol: String,
}

impl MarshalSize for DataChannelOpen {
    fn marshal_size(&self) -> usize {
        OPEN_HEADER_LENGTH + self.label.len() + self.protocol.len()
    }
}

impl Marshal for DataChannelOpen {
    fn marshal_to(&self, buf: &mut [u8]) -> Result<usize> {
        let n = self.marshal_size();
        if buf.len() < n {
            return Err(Error::UnexpectedEndOfBuffer {
                expected: n,
                actual: buf.len(),
            });
        }
        let mut w = &mut buf[..n];
        w.put_u8(super::message_type::MessageType::DataChannelOpen.into());
        w.put_u8(self.channel_type.into());
        w.put_u16(self.priority);
        w.put_u32(self.reliability_parameter);
        w.put_u16(self.label.len() as u16);
        w.put_u16(self.protocol.len() as u16);
        w.put_slice(self.label.as_bytes());
        w.put_slice(self.protocol.as_bytes());
        Ok(n)
    }
}

impl Unmarshal for DataChannelOpen {
    fn unmarshal<B>(buf: &mut B) -> Result<Self>
    where
        Self: Sized,
        B: Buf,
    {
        if buf.remaining() < OPEN_HEADER_LENGTH - 1 {
            return Err(Error::UnexpectedEndOfBuffer {
                expected: OPEN_HEADER_LENGTH - 1,
                actual: buf.remaining(),
            });
        }
        let channel_type = ChannelType::try_from(buf.get_u8())?;
        let priority = buf.get_u16();
        let reliability_parameter = buf.get_u32();
        let label_length = buf.get_u16() as usize;
        let protocol_length = buf.get_u16() as usize;
        if buf.remaining() < label_length + protocol_length {
            return Err(Error::UnexpectedEndOfBuffer {
                expected: label_length + protocol_length,
                actual: buf.remaining(),
            });
        }
        let mut label = vec![0u8; label_length];
        buf.copy_to_slice(&mut label);
        let mut protocol = vec![0u8; protocol_length];
        buf.copy_to_slice(&mut protocol);
        let label = String::from_utf8(label)?;
        let protocol = String::from_utf8(protocol)?;
        Ok(Self {
            channel_type,
            priority,
            reliability_parameter,
            label,
            protocol,
        })
    }
}
