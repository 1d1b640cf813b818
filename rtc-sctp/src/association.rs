use std::collections::{HashSet, VecDeque};

use bytes::Bytes;
use log::{debug, warn};
use shared::error::{Error, Result};

use crate::ppid::PayloadProtocolIdentifier;

/// The opaque SCTP reliability/retransmission engine. `PeerAssociation` does
/// not implement congestion control, chunk bundling, or retransmission
/// itself; it drives one of these and translates its output into the
/// stream-oriented events the data channel layer consumes.
///
/// Kept as a trait rather than a concrete type so the association layer, the
/// DCEP layer, and the data channel layer never need to agree on an SCTP
/// engine's internals, only on this boundary.
pub trait SctpEngine: Send {
    /// Start the association (send INIT if this side is the client, or wait
    /// for one if it is the server).
    fn initiate(&mut self, is_client: bool) -> Result<()>;

    /// Feed a raw SCTP packet received from the DTLS transport.
    fn handle_packet(&mut self, data: &[u8]) -> Result<Vec<EngineEvent>>;

    /// Queue a DATA chunk on `stream_id` carrying the caller-maintained
    /// per-channel `stream_seq` (RFC 8831 section 6.6: monotonic, starts at
    /// 0, wraps at `u16::MAX`, incremented for DCEP control messages too).
    /// Returns `ErrNotAssociated` if the association has not reached the
    /// established state.
    fn send_data(
        &mut self,
        stream_id: u16,
        stream_seq: u16,
        ppid: PayloadProtocolIdentifier,
        ordered: bool,
        payload: &[u8],
    ) -> Result<()>;

    /// Pop the next SCTP packet ready to hand to the DTLS transport.
    fn poll_transmit(&mut self) -> Option<Bytes>;

    /// Reset (close) one outbound/inbound stream pair without tearing down
    /// the whole association.
    fn close_stream(&mut self, stream_id: u16);

    /// Begin a graceful SHUTDOWN.
    fn shutdown(&mut self);

    /// Current advertised receiver window, exposed to callers that want to
    /// throttle `send_data` ahead of time rather than rely on backpressure.
    fn arwnd(&self) -> u32;
}

/// Events an [`SctpEngine`] surfaces back to [`PeerAssociation`].
#[derive(Debug, Clone)]
pub enum EngineEvent {
    Associated,
    Disassociated,
    Data {
        stream_id: u16,
        stream_seq: u16,
        ppid: PayloadProtocolIdentifier,
        payload: Bytes,
    },
}

/// Events `PeerAssociation` surfaces upward, via `poll_event`, to whatever
/// owns it (the SCTP transport adapter in the peer connection crate).
#[derive(Debug, Clone)]
pub enum AssociationEvent {
    Associated,
    Disassociated,
    Data {
        stream_id: u16,
        stream_seq: u16,
        ppid: PayloadProtocolIdentifier,
        payload: Bytes,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AssociationState {
    Connecting,
    Established,
    Closed,
}

/// One SCTP association to a remote peer (C4). A WebRTC peer connection
/// drives exactly one of these; it multiplexes every data channel's stream
/// onto it.
///
/// `PeerAssociation` owns stream-id bookkeeping (which ids are in use) but
/// not id *allocation*, which is parity-dependent on the DTLS role and lives
/// with the data channel collection that calls `send_data`.
pub struct PeerAssociation {
    engine: Box<dyn SctpEngine>,
    state: AssociationState,
    streams: HashSet<u16>,
    events: VecDeque<AssociationEvent>,
}

impl PeerAssociation {
    pub fn new(engine: Box<dyn SctpEngine>) -> Self {
        Self {
            engine,
            state: AssociationState::Connecting,
            streams: HashSet::new(),
            events: VecDeque::new(),
        }
    }

    pub fn state(&self) -> AssociationState {
        self.state
    }

    /// Kick off the association. `is_client` must match the negotiated DTLS
    /// role: the SCTP-over-DTLS binding (RFC 8261) requires the DTLS client
    /// to also be the SCTP association's INIT sender.
    pub fn associate(&mut self, is_client: bool) -> Result<()> {
        self.engine.initiate(is_client)
    }

    /// Feed a raw SCTP packet received from the DTLS transport, updating
    /// internal state and queuing any resulting events for `poll_event`.
    pub fn handle_receive(&mut self, data: &[u8]) -> Result<()> {
        for event in self.engine.handle_packet(data)? {
            match event {
                EngineEvent::Associated => {
                    debug!("association established");
                    self.state = AssociationState::Established;
                    self.events.push_back(AssociationEvent::Associated);
                }
                EngineEvent::Disassociated => {
                    debug!("association torn down");
                    self.state = AssociationState::Closed;
                    self.streams.clear();
                    self.events.push_back(AssociationEvent::Disassociated);
                }
                EngineEvent::Data {
                    stream_id,
                    stream_seq,
                    ppid,
                    payload,
                } => {
                    self.streams.insert(stream_id);
                    self.events.push_back(AssociationEvent::Data {
                        stream_id,
                        stream_seq,
                        ppid,
                        payload,
                    });
                }
            }
        }
        Ok(())
    }

    /// Queue an outbound chunk on `stream_id`. Fails with `ErrNotAssociated`
    /// until the association reaches `Established`.
    pub fn send_data(
        &mut self,
        stream_id: u16,
        stream_seq: u16,
        ppid: PayloadProtocolIdentifier,
        ordered: bool,
        payload: &[u8],
    ) -> Result<()> {
        if self.state != AssociationState::Established {
            warn!("refusing send_data on stream {stream_id}, association not established");
            return Err(Error::ErrNotAssociated);
        }
        self.engine
            .send_data(stream_id, stream_seq, ppid, ordered, payload)?;
        self.streams.insert(stream_id);
        Ok(())
    }

    /// Every stream id this association has observed traffic on, inbound or
    /// outbound, since the last disassociation.
    pub fn all_streams(&self) -> impl Iterator<Item = u16> + '_ {
        self.streams.iter().copied()
    }

    pub fn close_stream(&mut self, stream_id: u16) {
        self.engine.close_stream(stream_id);
        self.streams.remove(&stream_id);
    }

    pub fn close(&mut self) {
        self.engine.shutdown();
    }

    pub fn arwnd(&self) -> u32 {
        self.engine.arwnd()
    }

    pub fn poll_transmit(&mut self) -> Option<Bytes> {
        self.engine.poll_transmit()
    }

    pub fn poll_event(&mut self) -> Option<AssociationEvent> {
        self.events.pop_front()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_matches::assert_matches;

    struct StubEngine {
        transmit: VecDeque<Bytes>,
        sent: Vec<(u16, u16, PayloadProtocolIdentifier, bool, Vec<u8>)>,
    }

    impl StubEngine {
        fn new() -> Self {
            Self {
                transmit: VecDeque::new(),
                sent: Vec::new(),
            }
        }
    }

    impl SctpEngine for StubEngine {
        fn initiate(&mut self, _is_client: bool) -> Result<()> {
            Ok(())
        }

        fn handle_packet(&mut self, data: &[u8]) -> Result<Vec<EngineEvent>> {
            if data == b"INIT_ACK" {
                Ok(vec![EngineEvent::Associated])
            } else if data == b"SHUTDOWN" {
                Ok(vec![EngineEvent::Disassociated])
            } else {
                Ok(vec![EngineEvent::Data {
                    stream_id: 1,
                    stream_seq: 0,
                    ppid: PayloadProtocolIdentifier::Binary,
                    payload: Bytes::copy_from_slice(data),
                }])
            }
        }

        fn send_data(
            &mut self,
            stream_id: u16,
            stream_seq: u16,
            ppid: PayloadProtocolIdentifier,
            ordered: bool,
            payload: &[u8],
        ) -> Result<()> {
            self.sent
                .push((stream_id, stream_seq, ppid, ordered, payload.to_vec()));
            self.transmit.push_back(Bytes::copy_from_slice(payload));
            Ok(())
        }

        fn poll_transmit(&mut self) -> Option<Bytes> {
            self.transmit.pop_front()
        }

        fn close_stream(&mut self, _stream_id: u16) {}

        fn shutdown(&mut self) {}

        fn arwnd(&self) -> u32 {
            65536
        }
    }

    #[test]
    fn send_before_established_is_rejected() {
        let mut assoc = PeerAssociation::new(Box::new(StubEngine::new()));
        let err = assoc
            .send_data(1, 0, PayloadProtocolIdentifier::Binary, true, b"hi")
            .unwrap_err();
        assert_eq!(err, Error::ErrNotAssociated);
    }

    #[test]
    fn established_then_data_flows_both_ways() {
        let mut assoc = PeerAssociation::new(Box::new(StubEngine::new()));
        assoc.associate(true).unwrap();
        assoc.handle_receive(b"INIT_ACK").unwrap();
        assert_matches!(assoc.poll_event(), Some(AssociationEvent::Associated));
        assert_eq!(assoc.state(), AssociationState::Established);

        assoc
            .send_data(3, 0, PayloadProtocolIdentifier::Binary, true, b"payload")
            .unwrap();
        assert!(assoc.all_streams().any(|s| s == 3));

        assoc.handle_receive(b"inbound").unwrap();
        assert_matches!(
            assoc.poll_event(),
            Some(AssociationEvent::Data { stream_id: 1, .. })
        );
    }

    #[test]
    fn disassociation_clears_streams() {
        let mut assoc = PeerAssociation::new(Box::new(StubEngine::new()));
        assoc.associate(true).unwrap();
        assoc.handle_receive(b"INIT_ACK").unwrap();
        assoc.poll_event();
        assoc
            .send_data(5, 0, PayloadProtocolIdentifier::Binary, true, b"x")
            .unwrap();

        assoc.handle_receive(b"SHUTDOWN").unwrap();
        assert_matches!(assoc.poll_event(), Some(AssociationEvent::Disassociated));
        assert_eq!(assoc.all_streams().count(), 0);
    }
}
