pub mod certificate;
pub mod configuration;
pub mod event;
pub mod handler;
pub mod state;
pub mod transport;

use std::collections::VecDeque;

use datachannel::{DataChannel as EngineDataChannel, DataChannelParams};
use log::{debug, warn};
use sctp::{PeerAssociation, SctpEngine};
use shared::error::{Error, Result};

use crate::data_channel::{
    DataChannelCollection, DataChannelParameters, RTCDataChannel, RTCDataChannelEvent,
    RTCDataChannelInit, RTCDataChannelInternal,
};
use crate::sdp::{RTCSdpType, RTCSessionDescription};
use certificate::RTCCertificate;
use configuration::RTCConfiguration;
use event::RTCPeerConnectionEvent;
use handler::demuxer::Demuxer;
use state::{
    check_next_signaling_state, RTCIceConnectionState, RTCIceGatheringState,
    RTCPeerConnectionState, RTCSignalingState, StateChangeOp,
};
use transport::dtls::{DtlsTransport, RTCDtlsRole};
use transport::ice::{IceTransport, RTCIceCandidate};
use transport::sctp::SctpTransportAdapter;

/// https://www.w3.org/TR/webrtc/#rtcpeerconnection-interface
///
/// Owns the whole data-channel-only pipeline: the demuxer (C2) splits
/// inbound datagrams by protocol, ICE and DTLS are driven through their
/// trait boundaries (media/STUN/handshake internals out of scope), the
/// SCTP transport adapter (C3) bridges DTLS to the association (C4), and
/// the data channel collection (C5/C6) rides on top of that.
pub struct RTCPeerConnection {
    configuration: RTCConfiguration,
    certificate: RTCCertificate,
    signaling_state: RTCSignalingState,
    connection_state: RTCPeerConnectionState,
    local_description: Option<RTCSessionDescription>,
    remote_description: Option<RTCSessionDescription>,
    dtls_role: Option<RTCDtlsRole>,
    demuxer: Demuxer,
    ice: Box<dyn IceTransport>,
    sctp: Option<SctpTransportAdapter>,
    channels: DataChannelCollection,
    events: VecDeque<RTCPeerConnectionEvent>,
}

impl RTCPeerConnection {
    pub fn new(configuration: RTCConfiguration, certificate: RTCCertificate, ice: Box<dyn IceTransport>) -> Self {
        Self {
            configuration,
            certificate,
            signaling_state: RTCSignalingState::Stable,
            connection_state: RTCPeerConnectionState::New,
            local_description: None,
            remote_description: None,
            dtls_role: None,
            demuxer: Demuxer::new(),
            ice,
            sctp: None,
            // Client/server parity is only known once the DTLS role is
            // resolved by setRemoteDescription/setLocalDescription;
            // defaulted to client here and corrected in `start_sctp`.
            channels: DataChannelCollection::new(true),
            events: VecDeque::new(),
        }
    }

    pub fn signaling_state(&self) -> RTCSignalingState {
        self.signaling_state
    }

    pub fn connection_state(&self) -> RTCPeerConnectionState {
        self.connection_state
    }

    pub fn ice_connection_state(&self) -> RTCIceConnectionState {
        self.ice.connection_state()
    }

    pub fn ice_gathering_state(&self) -> RTCIceGatheringState {
        self.ice.gathering_state()
    }

    pub fn local_description(&self) -> Option<&RTCSessionDescription> {
        self.local_description.as_ref()
    }

    pub fn remote_description(&self) -> Option<&RTCSessionDescription> {
        self.remote_description.as_ref()
    }

    /// https://www.w3.org/TR/webrtc/#dom-peerconnection-createoffer
    ///
    /// SDP media section generation (ICE candidates, DTLS fingerprint,
    /// data channel `m=` line) is out of scope; the returned description
    /// carries an opaque placeholder body and exists to drive the
    /// signaling state machine and advertise `sdp_type`.
    pub fn create_offer(&self) -> Result<RTCSessionDescription> {
        if self.signaling_state == RTCSignalingState::Closed {
            return Err(Error::ErrPeerConnectionClosed);
        }
        Ok(RTCSessionDescription::offer(self.placeholder_sdp()))
    }

    /// https://www.w3.org/TR/webrtc/#dom-peerconnection-createanswer
    pub fn create_answer(&self) -> Result<RTCSessionDescription> {
        if self.signaling_state == RTCSignalingState::Closed {
            return Err(Error::ErrPeerConnectionClosed);
        }
        if self.remote_description.is_none() {
            return Err(Error::ErrNoRemoteDescription);
        }
        Ok(RTCSessionDescription::answer(self.placeholder_sdp()))
    }

    fn placeholder_sdp(&self) -> String {
        "v=0".to_string()
    }

    /// https://www.w3.org/TR/webrtc/#dom-peerconnection-addicecandidate
    pub fn add_ice_candidate(&mut self, candidate: RTCIceCandidate) -> Result<()> {
        self.ice.add_remote_candidate(candidate)
    }

    /// https://www.w3.org/TR/webrtc/#dom-peerconnection-setlocaldescription
    pub fn set_local_description(&mut self, description: RTCSessionDescription) -> Result<()> {
        let op = StateChangeOp::SetLocal;
        let next = self.next_signaling_state(op, description.sdp_type)?;
        if self.dtls_role.is_none() {
            self.dtls_role = Some(RTCDtlsRole::default_for(description.sdp_type));
        }
        self.local_description = Some(description);
        self.apply_signaling_state(next);
        Ok(())
    }

    /// https://www.w3.org/TR/webrtc/#dom-peerconnection-setremotedescription
    pub fn set_remote_description(&mut self, description: RTCSessionDescription) -> Result<()> {
        let op = StateChangeOp::SetRemote;
        let next = self.next_signaling_state(op, description.sdp_type)?;
        if self.dtls_role.is_none() {
            self.dtls_role = Some(RTCDtlsRole::default_for(description.sdp_type));
        }
        self.remote_description = Some(description);
        self.apply_signaling_state(next);
        Ok(())
    }

    fn next_signaling_state(&self, op: StateChangeOp, sdp_type: RTCSdpType) -> Result<RTCSignalingState> {
        if self.signaling_state == RTCSignalingState::Closed {
            return Err(Error::ErrPeerConnectionClosed);
        }
        let guess = match (self.signaling_state, op, sdp_type) {
            (RTCSignalingState::Stable, StateChangeOp::SetLocal, RTCSdpType::Offer) => {
                RTCSignalingState::HaveLocalOffer
            }
            (RTCSignalingState::Stable, StateChangeOp::SetRemote, RTCSdpType::Offer) => {
                RTCSignalingState::HaveRemoteOffer
            }
            (RTCSignalingState::HaveLocalOffer, StateChangeOp::SetRemote, RTCSdpType::Answer) => {
                RTCSignalingState::Stable
            }
            (RTCSignalingState::HaveLocalOffer, StateChangeOp::SetRemote, RTCSdpType::Pranswer) => {
                RTCSignalingState::HaveRemotePranswer
            }
            (RTCSignalingState::HaveRemotePranswer, StateChangeOp::SetRemote, RTCSdpType::Answer) => {
                RTCSignalingState::Stable
            }
            (RTCSignalingState::HaveRemoteOffer, StateChangeOp::SetLocal, RTCSdpType::Answer) => {
                RTCSignalingState::Stable
            }
            (RTCSignalingState::HaveRemoteOffer, StateChangeOp::SetLocal, RTCSdpType::Pranswer) => {
                RTCSignalingState::HaveLocalPranswer
            }
            (RTCSignalingState::HaveLocalPranswer, StateChangeOp::SetLocal, RTCSdpType::Answer) => {
                RTCSignalingState::Stable
            }
            _ => self.signaling_state,
        };
        check_next_signaling_state(self.signaling_state, guess, op, sdp_type)
    }

    fn apply_signaling_state(&mut self, next: RTCSignalingState) {
        if next != self.signaling_state {
            self.signaling_state = next;
            self.events
                .push_back(RTCPeerConnectionEvent::SignalingStateChange(next));
        }
        if next == RTCSignalingState::Stable && self.sctp.is_none() {
            if let Some(role) = self.dtls_role {
                if role != RTCDtlsRole::Auto {
                    self.channels = DataChannelCollection::new(role.is_client());
                }
            }
        }
    }

    /// Wires up the SCTP transport adapter once DTLS has produced a
    /// concrete transport (normally right after the handshake completes).
    pub fn start_sctp(&mut self, dtls: Box<dyn DtlsTransport>, engine: Box<dyn SctpEngine>) -> Result<()> {
        let is_client = dtls.role().is_client();
        let mut adapter = SctpTransportAdapter::new(dtls, PeerAssociation::new(engine));
        adapter.start(is_client)?;
        self.sctp = Some(adapter);
        self.channels = DataChannelCollection::new(is_client);
        Ok(())
    }

    /// https://www.w3.org/TR/webrtc/#dom-peerconnection-createdatachannel
    pub fn create_data_channel(&mut self, label: &str, init: RTCDataChannelInit) -> Result<RTCDataChannel> {
        init.validate()?;
        let mut parameters = DataChannelParameters::from_init(label, &init);

        let engine_params = DataChannelParams {
            label: label.to_string(),
            protocol: parameters.protocol.clone(),
            channel_type: parameters.channel_type(),
            priority: parameters.priority,
            reliability_parameter: parameters.reliability_parameter(),
            ordered: parameters.ordered,
        };

        let stream_id = if parameters.negotiated {
            parameters.id
        } else {
            Some(self.channels.allocate_id()?)
        };
        parameters.id = stream_id;

        let engine = if parameters.negotiated {
            EngineDataChannel::negotiated(parameters.ordered)
        } else {
            EngineDataChannel::dial(engine_params)
        };

        let handle = RTCDataChannel::new(&parameters);
        let internal = RTCDataChannelInternal::new(engine, parameters, stream_id);
        if let Some(id) = stream_id {
            self.channels.insert(id, internal)?;
        }
        Ok(handle)
    }

    pub fn poll_event(&mut self) -> Option<RTCPeerConnectionEvent> {
        self.events.pop_front()
    }

    pub fn poll_data_channel_event(&mut self, stream_id: u16) -> Option<RTCDataChannelEvent> {
        self.channels.get_mut(stream_id).and_then(|c| c.poll_event())
    }

    /// https://www.w3.org/TR/webrtc/#dom-rtcdatachannel-send
    pub fn send_data_channel_message(&mut self, stream_id: u16, data: &[u8], is_string: bool) -> Result<()> {
        let channel = self
            .channels
            .get_mut(stream_id)
            .ok_or(Error::ErrStreamNotFound(stream_id))?;
        channel.send(data, is_string)
    }

    /// Push whatever every data channel has queued (the DCEP handshake, then
    /// application sends) down into the SCTP transport. Run before every
    /// `poll_transmit` so a channel opened or sent to since the last drain
    /// actually reaches the wire.
    fn drain_data_channel_writes(&mut self) {
        let Some(sctp) = self.sctp.as_mut() else { return };
        for (stream_id, channel) in self.channels.iter_mut() {
            while let Some((stream_seq, ppid, ordered, payload)) = channel.poll_write() {
                if let Err(err) = sctp.send(*stream_id, stream_seq, ppid, ordered, &payload) {
                    warn!("drop write on stream {stream_id}: {err}");
                    continue;
                }
                if ppid != sctp::PayloadProtocolIdentifier::Dcep {
                    channel.on_bytes_sent(payload.len() as u64);
                }
            }
        }
    }

    /// Feed one inbound datagram off the wire: classified by the demuxer
    /// (C2) and handed to whichever of ICE/the SCTP transport adapter owns
    /// that protocol. RTP/RTCP and unrecognized first bytes are dropped,
    /// media being out of scope.
    pub fn handle_incoming(&mut self, transmit: shared::Transmit<bytes::Bytes>) -> Result<()> {
        self.demuxer.handle_read(transmit);
        while let Some(packet) = self.demuxer.poll_read() {
            match packet.message.kind {
                handler::demuxer::PacketKind::Stun => {
                    self.ice.handle_receive(&packet.message.payload)?;
                }
                handler::demuxer::PacketKind::Dtls => {
                    if let Some(sctp) = self.sctp.as_mut() {
                        sctp.handle_receive(&packet.message.payload)?;
                    }
                }
                handler::demuxer::PacketKind::RtpOrRtcp => {
                    debug!("drop RTP/RTCP packet, media is out of scope");
                }
                handler::demuxer::PacketKind::Unknown => {
                    debug!("drop packet of unrecognized kind");
                }
            }
        }
        self.drain_sctp_events();
        Ok(())
    }

    fn drain_sctp_events(&mut self) {
        let Some(sctp) = self.sctp.as_mut() else { return };
        while let Some(event) = sctp.poll_event() {
            match event {
                sctp::AssociationEvent::Associated => {
                    self.connection_state = state::combine_connection_state(
                        self.ice.connection_state(),
                        transport::dtls::DtlsTransportState::Connected,
                    );
                    self.events
                        .push_back(RTCPeerConnectionEvent::ConnectionStateChange(self.connection_state));
                }
                sctp::AssociationEvent::Disassociated => {}
                sctp::AssociationEvent::Data {
                    stream_id,
                    stream_seq: _,
                    ppid,
                    payload,
                } => {
                    if self.channels.get(stream_id).is_none() {
                        // No channel answers this stream yet: the remote is
                        // opening one (https://www.w3.org/TR/webrtc/#data-channel-establishment-protocol
                        // step 2.2). Anything other than a DCEP OPEN on an
                        // unknown stream is dropped; there is no channel to
                        // hand it to.
                        if ppid != sctp::PayloadProtocolIdentifier::Dcep {
                            debug!("drop {ppid:?} on unknown stream {stream_id}");
                            continue;
                        }
                        let open = match datachannel::Message::unmarshal_bytes(&payload) {
                            Ok(datachannel::Message::Open(open)) => open,
                            _ => {
                                warn!("malformed DCEP OPEN on stream {stream_id}");
                                continue;
                            }
                        };
                        let parameters = DataChannelParameters::from_dcep_open(stream_id, &open);
                        let handle = RTCDataChannel::new(&parameters);
                        let ordered = parameters.ordered;
                        let internal = RTCDataChannelInternal::new(
                            EngineDataChannel::accept(ordered),
                            parameters,
                            Some(stream_id),
                        );
                        if self.channels.insert(stream_id, internal).is_err() {
                            warn!("could not accept channel on stream {stream_id}");
                            continue;
                        }
                        debug!("accepted data channel {:?} on stream {stream_id}", handle.label());
                        self.events.push_back(RTCPeerConnectionEvent::DataChannel(handle));
                    }
                    if let Some(channel) = self.channels.get_mut(stream_id) {
                        let inbound = if ppid == sctp::PayloadProtocolIdentifier::Dcep {
                            match datachannel::Message::unmarshal_bytes(&payload) {
                                Ok(msg) => datachannel::Inbound::Dcep(msg),
                                Err(_) => continue,
                            }
                        } else {
                            datachannel::Inbound::Data { ppid, payload }
                        };
                        let _ = channel.handle_read(inbound);
                    }
                }
            }
        }
    }

    /// Drain every wire unit this peer connection wants transmitted: STUN
    /// from ICE first, then whatever DTLS/SCTP has queued.
    pub fn poll_transmit(&mut self) -> Option<bytes::Bytes> {
        self.drain_data_channel_writes();
        if let Some(packet) = self.ice.poll_transmit() {
            return Some(packet);
        }
        self.sctp.as_mut().and_then(|sctp| sctp.poll_transmit())
    }

    pub fn close(&mut self) {
        if self.signaling_state == RTCSignalingState::Closed {
            return;
        }
        self.signaling_state = RTCSignalingState::Closed;
        self.connection_state = RTCPeerConnectionState::Closed;
        if let Some(sctp) = self.sctp.as_mut() {
            sctp.close();
        }
        self.ice.close();
        self.events
            .push_back(RTCPeerConnectionEvent::SignalingStateChange(RTCSignalingState::Closed));
        self.events
            .push_back(RTCPeerConnectionEvent::ConnectionStateChange(RTCPeerConnectionState::Closed));
    }

    pub fn certificate(&self) -> &RTCCertificate {
        &self.certificate
    }

    pub fn configuration(&self) -> &RTCConfiguration {
        &self.configuration
    }
}

/// The whole pipeline (demuxer -> ICE/DTLS/SCTP -> data channels) driven as
/// one sans-I/O unit: push tagged datagrams in via `handle_read`, drain
/// outbound datagrams via `poll_write`, drain `RTCPeerConnectionEvent`s via
/// `poll_event`. A caller owns the socket and the clock; nothing here reads
/// or writes one directly.
impl sansio::Protocol<shared::Transmit<bytes::Bytes>, bytes::Bytes, RTCPeerConnectionEvent>
    for RTCPeerConnection
{
    type Rout = bytes::Bytes;
    type Wout = shared::Transmit<bytes::Bytes>;
    type Eout = RTCPeerConnectionEvent;
    type Error = Error;
    type Time = std::time::Instant;

    fn handle_read(&mut self, msg: shared::Transmit<bytes::Bytes>) -> Result<()> {
        self.handle_incoming(msg)
    }

    fn poll_read(&mut self) -> Option<Self::Rout> {
        None
    }

    fn handle_write(&mut self, _msg: bytes::Bytes) -> Result<()> {
        Ok(())
    }

    fn poll_write(&mut self) -> Option<Self::Wout> {
        let message = self.poll_transmit()?;
        Some(shared::Transmit {
            now: std::time::Instant::now(),
            transport: shared::TransportContext::default(),
            message,
        })
    }

    fn handle_event(&mut self, event: RTCPeerConnectionEvent) -> Result<()> {
        self.events.push_back(event);
        Ok(())
    }

    fn poll_event(&mut self) -> Option<Self::Eout> {
        RTCPeerConnection::poll_event(self)
    }

    fn handle_timeout(&mut self, _now: Self::Time) -> Result<()> {
        Ok(())
    }

    fn poll_timeout(&mut self) -> Option<Self::Time> {
        None
    }

    fn close(&mut self) -> Result<()> {
        RTCPeerConnection::close(self);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;

    use super::*;
    use crate::peer_connection::transport::ice::RTCIceCandidate;

    struct NullIceTransport;

    impl IceTransport for NullIceTransport {
        fn connection_state(&self) -> RTCIceConnectionState {
            RTCIceConnectionState::New
        }
        fn gathering_state(&self) -> RTCIceGatheringState {
            RTCIceGatheringState::New
        }
        fn add_remote_candidate(&mut self, _candidate: RTCIceCandidate) -> Result<()> {
            Ok(())
        }
        fn handle_receive(&mut self, _data: &[u8]) -> Result<()> {
            Ok(())
        }
        fn poll_transmit(&mut self) -> Option<bytes::Bytes> {
            None
        }
        fn send(&mut self, _data: &[u8]) -> Result<()> {
            Ok(())
        }
        fn close(&mut self) {}
    }

    fn new_pc() -> RTCPeerConnection {
        RTCPeerConnection::new(
            RTCConfiguration::default(),
            RTCCertificate::new("sha-256", "AA:BB"),
            Box::new(NullIceTransport),
        )
    }

    #[test]
    fn offer_answer_moves_to_stable() {
        let mut pc = new_pc();
        pc.set_local_description(RTCSessionDescription::offer("v=0".into()))
            .unwrap();
        assert_eq!(pc.signaling_state(), RTCSignalingState::HaveLocalOffer);
        pc.set_remote_description(RTCSessionDescription::answer("v=0".into()))
            .unwrap();
        assert_eq!(pc.signaling_state(), RTCSignalingState::Stable);
    }

    #[test]
    fn answer_without_offer_is_rejected() {
        let mut pc = new_pc();
        let err = pc
            .set_local_description(RTCSessionDescription::answer("v=0".into()))
            .unwrap_err();
        assert_matches!(err, Error::ErrInvalidSignalingState(_));
    }

    #[test]
    fn create_data_channel_allocates_parity_correct_id() {
        let mut pc = new_pc();
        pc.set_local_description(RTCSessionDescription::offer("v=0".into()))
            .unwrap();
        pc.set_remote_description(RTCSessionDescription::answer("v=0".into()))
            .unwrap();
        let handle = pc.create_data_channel("chat", RTCDataChannelInit::default()).unwrap();
        assert_eq!(handle.label(), "chat");
        assert_eq!(handle.id().unwrap() % 2, 0);
    }

    #[test]
    fn create_answer_without_remote_description_fails() {
        let pc = new_pc();
        let err = pc.create_answer().unwrap_err();
        assert_eq!(err, Error::ErrNoRemoteDescription);
    }

    #[test]
    fn create_answer_succeeds_once_remote_description_is_set() {
        let mut pc = new_pc();
        pc.set_remote_description(RTCSessionDescription::offer("v=0".into()))
            .unwrap();
        let answer = pc.create_answer().unwrap();
        assert_eq!(answer.sdp_type, RTCSdpType::Answer);
    }

    #[test]
    fn create_offer_on_closed_connection_fails() {
        let mut pc = new_pc();
        pc.close();
        let err = pc.create_offer().unwrap_err();
        assert_eq!(err, Error::ErrPeerConnectionClosed);
    }

    #[test]
    fn add_ice_candidate_forwards_to_ice_transport() {
        let mut pc = new_pc();
        pc.add_ice_candidate(RTCIceCandidate {
            foundation: "1".to_string(),
            component: 1,
            priority: 0,
            address: "127.0.0.1".to_string(),
            port: 12345,
            sdp_mid: None,
            sdp_mline_index: None,
        })
        .unwrap();
    }

    #[test]
    fn close_is_idempotent_and_terminal() {
        let mut pc = new_pc();
        pc.close();
        assert_eq!(pc.signaling_state(), RTCSignalingState::Closed);
        let err = pc
            .set_local_description(RTCSessionDescription::offer("v=0".into()))
            .unwrap_err();
        assert_eq!(err, Error::ErrPeerConnectionClosed);
    }
}
