//! The per-stream data channel protocol engine: drives the DCEP handshake
//! on one SCTP stream and, once open, frames/unframes the user messages
//! carried on it. Sans-I/O: this type never touches a socket, it only
//! exposes `handle_read`/`poll_write`/`poll_event` for whatever owns the
//! surrounding association (currently `rtc`'s peer connection, in tests a
//! bare loop) to drive.

use bytes::Bytes;
use log::debug;
use sctp::PayloadProtocolIdentifier;
use shared::error::{Error, Result};

use crate::message::{ChannelType, DataChannelAck, DataChannelOpen, Message};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChannelState {
    /// Dialing side: OPEN sent, waiting for ACK.
    Connecting,
    /// Accepting side: OPEN received, ACK queued/sent.
    Accepting,
    Open,
    Closed,
}

/// Wire-level input fed into the engine from the SCTP association.
#[derive(Debug, Clone)]
pub enum Inbound {
    Dcep(Message),
    Data {
        ppid: PayloadProtocolIdentifier,
        payload: Bytes,
    },
}

/// Wire-level output the engine wants transmitted on this stream.
#[derive(Debug, Clone)]
pub enum Outbound {
    Dcep(Message),
    Data {
        ppid: PayloadProtocolIdentifier,
        ordered: bool,
        payload: Bytes,
    },
}

/// Lifecycle/application events the engine surfaces to its owner.
#[derive(Debug, Clone)]
pub enum DataChannelEvent {
    Open,
    Closed,
    Message { data: Bytes, is_string: bool },
    BufferedAmountLow,
    RequestClose,
}

pub struct DataChannelParams {
    pub label: String,
    pub protocol: String,
    pub channel_type: ChannelType,
    pub priority: u16,
    pub reliability_parameter: u32,
    pub ordered: bool,
}

/// Drives the DCEP handshake and post-handshake message framing for one
/// stream id. Does not own the stream id itself or talk to the
/// association directly; `rtc` wires this to a stream via the demuxer and
/// the SCTP transport adapter.
pub struct DataChannel {
    state: ChannelState,
    ordered: bool,
    negotiated: bool,
    read_queue: std::collections::VecDeque<Bytes>,
    write_queue: std::collections::VecDeque<Outbound>,
    event_queue: std::collections::VecDeque<DataChannelEvent>,
}

impl DataChannel {
    /// Dialing side: this peer is opening the channel and sends the DCEP
    /// OPEN itself.
    pub fn dial(params: DataChannelParams) -> Self {
        let mut dc = Self {
            state: ChannelState::Connecting,
            ordered: params.ordered,
            negotiated: false,
            read_queue: Default::default(),
            write_queue: Default::default(),
            event_queue: Default::default(),
        };
        dc.write_queue.push_back(Outbound::Dcep(Message::Open(DataChannelOpen {
            channel_type: params.channel_type,
            priority: params.priority,
            reliability_parameter: params.reliability_parameter,
            label: params.label,
            protocol: params.protocol,
        })));
        dc
    }

    /// Accepting side: a stream already carries an inbound DCEP OPEN,
    /// handled through `handle_read` like any other stream.
    pub fn accept(ordered: bool) -> Self {
        Self {
            state: ChannelState::Accepting,
            ordered,
            negotiated: false,
            read_queue: Default::default(),
            write_queue: Default::default(),
            event_queue: Default::default(),
        }
    }

    /// A negotiated (pre-established, out-of-band id) channel skips the
    /// DCEP handshake entirely and is open from construction.
    pub fn negotiated(ordered: bool) -> Self {
        Self {
            state: ChannelState::Open,
            ordered,
            negotiated: true,
            read_queue: Default::default(),
            write_queue: Default::default(),
            event_queue: Default::default(),
        }
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// Queue a user message for transmission. PPID is chosen from the
    /// content type and, per RFC 8831 section 6.6, substituted with the
    /// empty-payload sentinel when `data` is empty since SCTP historically
    /// could not carry a zero-length user payload.
    pub fn send(&mut self, data: &[u8], is_string: bool) -> Result<()> {
        if self.state != ChannelState::Open {
            return Err(Error::ErrDataChannelClosed);
        }
        let ppid = select_ppid(is_string, data.len());
        let payload = if ppid.is_empty_sentinel() {
            Bytes::from_static(&[0x00])
        } else {
            Bytes::copy_from_slice(data)
        };
        self.write_queue.push_back(Outbound::Data {
            ppid,
            ordered: self.ordered,
            payload,
        });
        Ok(())
    }

    pub fn close(&mut self) {
        if self.state != ChannelState::Closed {
            self.state = ChannelState::Closed;
            self.event_queue.push_back(DataChannelEvent::Closed);
        }
    }
}

/// Picks the PPID for an outbound payload (RFC 8831 section 8). Empty
/// payloads get the `*Empty` sentinel instead of the normal string/binary
/// identifier.
pub fn select_ppid(is_string: bool, len: usize) -> PayloadProtocolIdentifier {
    match (is_string, len == 0) {
        (true, true) => PayloadProtocolIdentifier::StringEmpty,
        (true, false) => PayloadProtocolIdentifier::String,
        (false, true) => PayloadProtocolIdentifier::BinaryEmpty,
        (false, false) => PayloadProtocolIdentifier::Binary,
    }
}

impl DataChannel {
    /// Feed one inbound wire unit (a DCEP control message or a user data
    /// payload) already demultiplexed by PPID from the SCTP association.
    pub fn handle_read(&mut self, data: Inbound) -> Result<()> {
        match data {
            Inbound::Dcep(Message::Open(open)) => {
                debug!("received DATA_CHANNEL_OPEN");
                if self.state != ChannelState::Accepting {
                    return Ok(());
                }
                self.ordered = !open.channel_type.is_unordered();
                self.write_queue
                    .push_back(Outbound::Dcep(Message::Ack(DataChannelAck)));
                self.state = ChannelState::Open;
                self.event_queue.push_back(DataChannelEvent::Open);
            }
            Inbound::Dcep(Message::Ack(_)) => {
                debug!("received DATA_CHANNEL_ACK");
                if self.state == ChannelState::Connecting {
                    self.state = ChannelState::Open;
                    self.event_queue.push_back(DataChannelEvent::Open);
                }
            }
            Inbound::Data { ppid, payload } => {
                let (is_string, payload) = match ppid {
                    PayloadProtocolIdentifier::String => (true, payload),
                    PayloadProtocolIdentifier::StringEmpty => (true, Bytes::new()),
                    PayloadProtocolIdentifier::Binary => (false, payload),
                    PayloadProtocolIdentifier::BinaryEmpty => (false, Bytes::new()),
                    _ => return Ok(()),
                };
                self.read_queue.push_back(payload.clone());
                self.event_queue
                    .push_back(DataChannelEvent::Message { data: payload, is_string });
            }
        }
        Ok(())
    }

    /// Pop the next already-unwrapped inbound user payload. Lifecycle and
    /// framing-level happenings (open/closed/the same message again, as an
    /// event) go through `poll_event` instead.
    pub fn poll_read(&mut self) -> Option<Bytes> {
        self.read_queue.pop_front()
    }

    /// Pop the next wire unit ready to hand to the SCTP association for
    /// this stream.
    pub fn poll_write(&mut self) -> Option<Outbound> {
        self.write_queue.pop_front()
    }

    /// Inject an owner-initiated command. The only one today is a request
    /// to close; kept as an event rather than a bare method so additional
    /// owner-to-engine signals don't need a new method each time.
    pub fn handle_event(&mut self, event: DataChannelEvent) {
        if matches!(event, DataChannelEvent::RequestClose) {
            self.close();
        }
    }

    pub fn poll_event(&mut self) -> Option<DataChannelEvent> {
        self.event_queue.pop_front()
    }
}
