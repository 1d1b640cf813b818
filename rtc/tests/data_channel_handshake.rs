//! End-to-end exercise of the sans-I/O pipeline: two `RTCPeerConnection`s,
//! wired directly to each other's `poll_transmit`/`handle_incoming` (no real
//! socket), carry an SCTP association and a DCEP handshake through to an
//! open data channel and back.
//!
//! The DTLS and SCTP layers are out of scope for this crate, so both are
//! stood in here with the smallest stub that can carry a two-way handshake
//! and DATA chunks: a one-byte tag in the DTLS first-byte range (RFC 7983)
//! so the demuxer still classifies it correctly, followed by this test's own
//! trivial framing.

use std::collections::VecDeque;
use std::time::Instant;

use bytes::Bytes;
use rtc::data_channel::RTCDataChannelEvent;
use rtc::peer_connection::configuration::RTCConfigurationBuilder;
use rtc::peer_connection::event::RTCPeerConnectionEvent;
use rtc::peer_connection::transport::dtls::{DtlsTransport, DtlsTransportState, RTCDtlsRole};
use rtc::peer_connection::transport::ice::{IceTransport, RTCIceCandidate};
use rtc::peer_connection::RTCPeerConnection;
use rtc::{RTCCertificate, RTCDataChannelInit, RTCIceConnectionState, RTCIceGatheringState};
use sctp::{EngineEvent, PayloadProtocolIdentifier, SctpEngine};
use shared::error::Result;

fn init_logging() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

const DTLS_TAG: u8 = 20;
const MARK_INIT: u8 = 1;
const MARK_INIT_ACK: u8 = 2;
const MARK_DATA: u8 = 3;

/// Stands in for a real SCTP engine: a three-message wire format (INIT,
/// INIT_ACK, DATA) just rich enough to carry a data channel handshake and
/// its payload through `PeerAssociation`.
struct LoopbackSctpEngine {
    transmit: VecDeque<Bytes>,
}

impl LoopbackSctpEngine {
    fn new() -> Self {
        Self {
            transmit: VecDeque::new(),
        }
    }

    fn frame_data(
        stream_id: u16,
        stream_seq: u16,
        ppid: PayloadProtocolIdentifier,
        ordered: bool,
        payload: &[u8],
    ) -> Bytes {
        let mut buf = Vec::with_capacity(15 + payload.len());
        buf.push(DTLS_TAG);
        buf.push(MARK_DATA);
        buf.extend_from_slice(&stream_id.to_be_bytes());
        buf.extend_from_slice(&stream_seq.to_be_bytes());
        buf.extend_from_slice(&u32::from(ppid).to_be_bytes());
        buf.push(u8::from(ordered));
        buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        buf.extend_from_slice(payload);
        Bytes::from(buf)
    }
}

impl SctpEngine for LoopbackSctpEngine {
    fn initiate(&mut self, is_client: bool) -> Result<()> {
        if is_client {
            self.transmit.push_back(Bytes::from_static(&[DTLS_TAG, MARK_INIT]));
        }
        Ok(())
    }

    fn handle_packet(&mut self, data: &[u8]) -> Result<Vec<EngineEvent>> {
        if data.len() < 2 || data[0] != DTLS_TAG {
            return Ok(vec![]);
        }
        match data[1] {
            MARK_INIT => {
                self.transmit.push_back(Bytes::from_static(&[DTLS_TAG, MARK_INIT_ACK]));
                Ok(vec![EngineEvent::Associated])
            }
            MARK_INIT_ACK => Ok(vec![EngineEvent::Associated]),
            MARK_DATA => {
                let stream_id = u16::from_be_bytes([data[2], data[3]]);
                let stream_seq = u16::from_be_bytes([data[4], data[5]]);
                let ppid = u32::from_be_bytes([data[6], data[7], data[8], data[9]]);
                let ppid = PayloadProtocolIdentifier::try_from(ppid)?;
                let len = u32::from_be_bytes([data[11], data[12], data[13], data[14]]) as usize;
                let payload = Bytes::copy_from_slice(&data[15..15 + len]);
                Ok(vec![EngineEvent::Data {
                    stream_id,
                    stream_seq,
                    ppid,
                    payload,
                }])
            }
            _ => Ok(vec![]),
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
        self.transmit
            .push_back(Self::frame_data(stream_id, stream_seq, ppid, ordered, payload));
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

/// A DTLS transport with no encryption and no framing of its own: every
/// byte handed to `handle_receive` is handed straight to the association,
/// and every byte the association hands to `send_app_data` is handed
/// straight back out `poll_transmit`. Good enough since `LoopbackSctpEngine`
/// already puts its own tag in the DTLS first-byte range.
struct PassthroughDtls {
    role: RTCDtlsRole,
    app_data: VecDeque<Bytes>,
    transmit: VecDeque<Bytes>,
}

impl PassthroughDtls {
    fn new(role: RTCDtlsRole) -> Self {
        Self {
            role,
            app_data: VecDeque::new(),
            transmit: VecDeque::new(),
        }
    }
}

impl DtlsTransport for PassthroughDtls {
    fn role(&self) -> RTCDtlsRole {
        self.role
    }

    fn state(&self) -> DtlsTransportState {
        DtlsTransportState::Connected
    }

    fn handle_receive(&mut self, data: &[u8]) -> Result<()> {
        self.app_data.push_back(Bytes::copy_from_slice(data));
        Ok(())
    }

    fn poll_app_data(&mut self) -> Option<Bytes> {
        self.app_data.pop_front()
    }

    fn send_app_data(&mut self, data: &[u8]) -> Result<()> {
        self.transmit.push_back(Bytes::copy_from_slice(data));
        Ok(())
    }

    fn poll_transmit(&mut self) -> Option<Bytes> {
        self.transmit.pop_front()
    }

    fn close(&mut self) {}
}

/// No STUN traffic in this test; ICE is reported connected from the start
/// so `combine_connection_state` doesn't hold the overall state back.
struct ConnectedIce;

impl IceTransport for ConnectedIce {
    fn connection_state(&self) -> RTCIceConnectionState {
        RTCIceConnectionState::Connected
    }

    fn gathering_state(&self) -> RTCIceGatheringState {
        RTCIceGatheringState::Complete
    }

    fn add_remote_candidate(&mut self, _candidate: RTCIceCandidate) -> Result<()> {
        Ok(())
    }

    fn handle_receive(&mut self, _data: &[u8]) -> Result<()> {
        Ok(())
    }

    fn poll_transmit(&mut self) -> Option<Bytes> {
        None
    }

    fn send(&mut self, _data: &[u8]) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) {}
}

fn new_pc() -> RTCPeerConnection {
    RTCPeerConnection::new(
        RTCConfigurationBuilder::new().build(),
        RTCCertificate::new("sha-256", "00:11:22:33"),
        Box::new(ConnectedIce),
    )
}

fn pump(from: &mut RTCPeerConnection, to: &mut RTCPeerConnection) {
    while let Some(packet) = from.poll_transmit() {
        let transmit = shared::Transmit {
            now: Instant::now(),
            transport: shared::TransportContext::default(),
            message: packet,
        };
        to.handle_incoming(transmit).unwrap();
    }
}

#[test]
fn offer_answer_open_channel_and_exchange_a_message() {
    init_logging();

    let mut offerer = new_pc();
    let mut answerer = new_pc();

    offerer
        .set_local_description(rtc::RTCSessionDescription::offer("v=0".into()))
        .unwrap();
    answerer
        .set_remote_description(rtc::RTCSessionDescription::offer("v=0".into()))
        .unwrap();
    answerer
        .set_local_description(rtc::RTCSessionDescription::answer("v=0".into()))
        .unwrap();
    offerer
        .set_remote_description(rtc::RTCSessionDescription::answer("v=0".into()))
        .unwrap();
    assert_eq!(offerer.signaling_state(), rtc::RTCSignalingState::Stable);
    assert_eq!(answerer.signaling_state(), rtc::RTCSignalingState::Stable);

    offerer
        .start_sctp(
            Box::new(PassthroughDtls::new(RTCDtlsRole::Client)),
            Box::new(LoopbackSctpEngine::new()),
        )
        .unwrap();
    answerer
        .start_sctp(
            Box::new(PassthroughDtls::new(RTCDtlsRole::Server)),
            Box::new(LoopbackSctpEngine::new()),
        )
        .unwrap();

    // INIT -> INIT_ACK, both directions, until the association is Established
    // on both sides.
    pump(&mut offerer, &mut answerer);
    pump(&mut answerer, &mut offerer);

    let mut saw_connected = false;
    while let Some(event) = offerer.poll_event() {
        if matches!(event, RTCPeerConnectionEvent::ConnectionStateChange(rtc::RTCPeerConnectionState::Connected)) {
            saw_connected = true;
        }
    }
    assert!(saw_connected, "offerer should observe the association completing");

    let channel = offerer
        .create_data_channel("chat", RTCDataChannelInit::default())
        .unwrap();
    let stream_id = channel.id().unwrap();
    assert_eq!(stream_id % 2, 0, "the offerer dials with the client's even parity");

    // OPEN -> ACK.
    pump(&mut offerer, &mut answerer);
    pump(&mut answerer, &mut offerer);

    assert_eq!(offerer.poll_data_channel_event(stream_id), Some(RTCDataChannelEvent::StateChange(rtc::RTCDataChannelState::Open)));

    let mut accepted_label = None;
    while let Some(event) = answerer.poll_event() {
        if let RTCPeerConnectionEvent::DataChannel(dc) = event {
            accepted_label = Some(dc.label().to_string());
        }
    }
    assert_eq!(accepted_label.as_deref(), Some("chat"));
    assert_eq!(
        answerer.poll_data_channel_event(stream_id),
        Some(RTCDataChannelEvent::StateChange(rtc::RTCDataChannelState::Open))
    );

    offerer
        .send_data_channel_message(stream_id, b"hello", true)
        .unwrap();
    pump(&mut offerer, &mut answerer);

    let mut received = None;
    while let Some(event) = answerer.poll_data_channel_event(stream_id) {
        if let RTCDataChannelEvent::Message(msg) = event {
            received = Some(msg);
        }
    }
    let received = received.expect("answerer should have received the message");
    assert!(received.is_string);
    assert_eq!(&received.data[..], b"hello");
}
