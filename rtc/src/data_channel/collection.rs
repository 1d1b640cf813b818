use std::collections::HashMap;

use shared::error::{Error, Result};

use super::internal::RTCDataChannelInternal;

/// Stream id 65535 is reserved by RFC 8831 section 6.1 and must never be
/// allocated or accepted.
const RESERVED_STREAM_ID: u16 = 65535;

/// Allocates and tracks the SCTP stream ids backing this peer's data
/// channels (C5). Ids are parity-locked to the DTLS role: the client only
/// ever uses even ids, the server only odd, so the two sides can never
/// collide picking one independently. Per the teacher's own allocator,
/// numbering starts near the top of the id space and walks downward,
/// wrapping back to the matching-parity id just below `u16::MAX` if it runs
/// out before reaching zero.
pub struct DataChannelCollection {
    is_client: bool,
    next_id: u16,
    channels: HashMap<u16, RTCDataChannelInternal>,
    wrapped: bool,
}

impl DataChannelCollection {
    pub fn new(is_client: bool) -> Self {
        let start = if is_client {
            u16::MAX - 1
        } else {
            u16::MAX - 2
        };
        Self {
            is_client,
            next_id: start,
            channels: HashMap::new(),
            wrapped: false,
        }
    }

    fn parity_ok(&self, id: u16) -> bool {
        (id % 2 == 0) == self.is_client
    }

    /// Allocate the next free id of this side's parity.
    pub fn allocate_id(&mut self) -> Result<u16> {
        let start = self.next_id;
        loop {
            let candidate = self.next_id;
            self.advance();
            if candidate != RESERVED_STREAM_ID
                && self.parity_ok(candidate)
                && !self.channels.contains_key(&candidate)
            {
                return Ok(candidate);
            }
            if self.next_id == start && self.wrapped {
                return Err(Error::ErrStreamIdsExhausted);
            }
        }
    }

    fn advance(&mut self) {
        if self.next_id < 2 {
            self.next_id = if self.is_client { u16::MAX - 1 } else { u16::MAX - 2 };
            self.wrapped = true;
        } else {
            self.next_id -= 2;
        }
    }

    pub fn insert(&mut self, id: u16, channel: RTCDataChannelInternal) -> Result<()> {
        if self.channels.contains_key(&id) {
            return Err(Error::ErrStreamIdCollision(id));
        }
        self.channels.insert(id, channel);
        Ok(())
    }

    pub fn get(&self, id: u16) -> Option<&RTCDataChannelInternal> {
        self.channels.get(&id)
    }

    pub fn get_mut(&mut self, id: u16) -> Option<&mut RTCDataChannelInternal> {
        self.channels.get_mut(&id)
    }

    pub fn remove(&mut self, id: u16) -> Option<RTCDataChannelInternal> {
        self.channels.remove(&id)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&u16, &mut RTCDataChannelInternal)> {
        self.channels.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data_channel::parameters::DataChannelParameters;
    use datachannel::DataChannel as EngineDataChannel;

    fn stub_channel() -> RTCDataChannelInternal {
        RTCDataChannelInternal::new(
            EngineDataChannel::negotiated(true),
            DataChannelParameters::from_init("chat", &Default::default()),
            None,
        )
    }

    #[test]
    fn client_allocates_only_even_ids() {
        let mut col = DataChannelCollection::new(true);
        for _ in 0..5 {
            let id = col.allocate_id().unwrap();
            assert_eq!(id % 2, 0);
            col.insert(id, stub_channel()).unwrap();
        }
    }

    #[test]
    fn server_allocates_only_odd_ids() {
        let mut col = DataChannelCollection::new(false);
        for _ in 0..5 {
            let id = col.allocate_id().unwrap();
            assert_eq!(id % 2, 1);
            col.insert(id, stub_channel()).unwrap();
        }
    }

    #[test]
    fn never_allocates_reserved_id() {
        let mut col = DataChannelCollection::new(false);
        for _ in 0..1000 {
            let id = col.allocate_id().unwrap();
            assert_ne!(id, RESERVED_STREAM_ID);
            col.insert(id, stub_channel()).unwrap();
        }
    }

    #[test]
    fn exhausting_the_id_space_is_reported() {
        let mut col = DataChannelCollection::new(true);
        for _ in 0..40_000u32 {
            match col.allocate_id() {
                Ok(id) => {
                    col.insert(id, stub_channel()).unwrap();
                }
                Err(e) => {
                    assert_eq!(e, Error::ErrStreamIdsExhausted);
                    return;
                }
            }
        }
        panic!("expected allocator to exhaust the even id space");
    }

    #[test]
    fn insert_rejects_collision() {
        let mut col = DataChannelCollection::new(true);
        col.insert(4, stub_channel()).unwrap();
        assert_eq!(
            col.insert(4, stub_channel()).unwrap_err(),
            Error::ErrStreamIdCollision(4)
        );
    }
}
