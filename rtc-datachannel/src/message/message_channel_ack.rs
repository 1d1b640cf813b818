use bytes::{Buf, BufMut};
use shared::error::{Error, Result};
use shared::marshal::{Marshal, MarshalSize, Unmarshal};

/// The DCEP ACK message (RFC 8832 section 5.2): a single message-type byte,
/// sent back on the stream to confirm a received OPEN.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct DataChannelAck;

impl MarshalSize for DataChannelAck {
    fn marshal_size(&self) -> usize {
        1
    }
}

impl Marshal for DataChannelAck {
    fn marshal_to(&self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Err(Error::UnexpectedEndOfBuffer {
                expected: 1,
                actual: 0,
            });
        }
        let mut w = &mut buf[..1];
        w.put_u8(super::message_type::MessageType::DataChannelAck.into());
        Ok(1)
    }
}

impl Unmarshal for DataChannelAck {
    fn unmarshal<B>(_buf: &mut B) -> Result<Self>
    where
        Self: Sized,
        B: Buf,
    {
        Ok(Self)
    }
}
