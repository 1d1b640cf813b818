use std::collections::VecDeque;

use datachannel::{DataChannel as EngineDataChannel, DataChannelEvent as EngineEvent, Inbound, Outbound};
use sctp::PayloadProtocolIdentifier;
use shared::error::{Error, Result};

use super::event::RTCDataChannelEvent;
use super::message::RTCDataChannelMessage;
use super::parameters::DataChannelParameters;
use super::state::RTCDataChannelState;

/// Default per W3C: 0, i.e. `bufferedamountlow` fires the instant the queue
/// drains to empty unless the application raises the threshold.
const DEFAULT_BUFFERED_AMOUNT_LOW_THRESHOLD: u64 = 0;

/// Drives the low-level [`datachannel::DataChannel`] protocol engine and
/// layers the W3C-visible bookkeeping on top of it: `readyState`,
/// `bufferedAmount`, and the low/high threshold crossing events the
/// low-level engine has no notion of.
pub struct RTCDataChannelInternal {
    engine: EngineDataChannel,
    parameters: DataChannelParameters,
    stream_id: Option<u16>,
    state: RTCDataChannelState,
    buffered_amount: u64,
    buffered_amount_low_threshold: u64,
    buffered_amount_high_threshold: Option<u64>,
    crossed_high_threshold: bool,
    events: VecDeque<RTCDataChannelEvent>,
    /// Per-channel monotonic counter, incremented after every unit handed to
    /// the wire (DCEP OPEN/ACK included), wrapping at `u16::MAX`.
    stream_seq: u16,
}

impl RTCDataChannelInternal {
    pub fn new(engine: EngineDataChannel, parameters: DataChannelParameters, stream_id: Option<u16>) -> Self {
        Self {
            engine,
            parameters,
            stream_id,
            state: RTCDataChannelState::Connecting,
            buffered_amount: 0,
            buffered_amount_low_threshold: DEFAULT_BUFFERED_AMOUNT_LOW_THRESHOLD,
            buffered_amount_high_threshold: None,
            crossed_high_threshold: false,
            events: VecDeque::new(),
            stream_seq: 0,
        }
    }

    pub fn parameters(&self) -> &DataChannelParameters {
        &self.parameters
    }

    pub fn stream_id(&self) -> Option<u16> {
        self.stream_id
    }

    pub fn set_stream_id(&mut self, id: u16) {
        self.stream_id = Some(id);
    }

    pub fn ready_state(&self) -> RTCDataChannelState {
        self.state
    }

    pub fn buffered_amount(&self) -> u64 {
        self.buffered_amount
    }

    pub fn buffered_amount_low_threshold(&self) -> u64 {
        self.buffered_amount_low_threshold
    }

    pub fn set_buffered_amount_low_threshold(&mut self, threshold: u64) {
        self.buffered_amount_low_threshold = threshold;
    }

    /// Not part of the W3C dictionary: an escape hatch so a caller can be
    /// told a send is about to make `bufferedAmount` unreasonably large,
    /// before it happens rather than after, mirroring the low-threshold
    /// event on the other side of the queue.
    pub fn set_buffered_amount_high_threshold(&mut self, threshold: Option<u64>) {
        self.buffered_amount_high_threshold = threshold;
        self.crossed_high_threshold = false;
    }

    pub fn send(&mut self, data: &[u8], is_string: bool) -> Result<()> {
        if self.state != RTCDataChannelState::Open {
            return Err(Error::ErrDataChannelClosed);
        }
        self.engine.send(data, is_string)?;
        self.buffered_amount += data.len() as u64;
        if let Some(high) = self.buffered_amount_high_threshold {
            if self.buffered_amount >= high && !self.crossed_high_threshold {
                self.crossed_high_threshold = true;
            }
        }
        Ok(())
    }

    /// Called once a queued send has actually left for the wire (its bytes
    /// handed off to the SCTP transport adapter), shrinking
    /// `bufferedAmount` and firing `bufferedamountlow` if it crosses the
    /// threshold on the way down. Strictly a downward crossing: sends that
    /// keep `bufferedAmount` above the threshold, or that start below it,
    /// never re-fire the event.
    pub fn on_bytes_sent(&mut self, len: u64) {
        let was_above = self.buffered_amount > self.buffered_amount_low_threshold;
        self.buffered_amount = self.buffered_amount.saturating_sub(len);
        let now_at_or_below = self.buffered_amount <= self.buffered_amount_low_threshold;
        if was_above && now_at_or_below {
            self.events.push_back(RTCDataChannelEvent::BufferedAmountLow);
        }
        if let Some(high) = self.buffered_amount_high_threshold {
            if self.buffered_amount < high {
                self.crossed_high_threshold = false;
            }
        }
    }

    pub fn close(&mut self) {
        if self.state == RTCDataChannelState::Open || self.state == RTCDataChannelState::Connecting {
            self.state = RTCDataChannelState::Closing;
            self.events
                .push_back(RTCDataChannelEvent::StateChange(RTCDataChannelState::Closing));
        }
        self.engine.close();
    }

    pub fn handle_read(&mut self, data: Inbound) -> Result<()> {
        self.engine.handle_read(data)?;
        while let Some(event) = self.engine.poll_event() {
            self.translate_engine_event(event);
        }
        Ok(())
    }

    fn translate_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Open => {
                self.state = RTCDataChannelState::Open;
                self.events
                    .push_back(RTCDataChannelEvent::StateChange(RTCDataChannelState::Open));
            }
            EngineEvent::Closed => {
                self.state = RTCDataChannelState::Closed;
                self.events
                    .push_back(RTCDataChannelEvent::StateChange(RTCDataChannelState::Closed));
            }
            EngineEvent::Message { data, is_string } => {
                self.events
                    .push_back(RTCDataChannelEvent::Message(RTCDataChannelMessage {
                        data,
                        is_string,
                    }));
            }
            EngineEvent::BufferedAmountLow | EngineEvent::RequestClose => {}
        }
    }

    pub fn poll_write(&mut self) -> Option<(u16, PayloadProtocolIdentifier, bool, bytes::Bytes)> {
        let out = match self.engine.poll_write() {
            Some(Outbound::Dcep(msg)) => {
                use shared::marshal::Marshal;
                let bytes = msg.marshal().ok()?.freeze();
                (PayloadProtocolIdentifier::Dcep, true, bytes)
            }
            Some(Outbound::Data { ppid, ordered, payload }) => (ppid, ordered, payload),
            None => return None,
        };
        let seq = self.stream_seq;
        self.stream_seq = self.stream_seq.wrapping_add(1);
        Some((seq, out.0, out.1, out.2))
    }

    pub fn poll_event(&mut self) -> Option<RTCDataChannelEvent> {
        self.events.pop_front()
    }
}
