use std::fmt;

use bytes::Bytes;
use sctp::{AssociationEvent, PeerAssociation};
use shared::error::Result;

use crate::peer_connection::transport::dtls::DtlsTransport;

/// https://www.w3.org/TR/webrtc/#dom-rtcsctptransportstate
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RTCSctpTransportState {
    #[default]
    Connecting,
    Connected,
    Closed,
}

impl fmt::Display for RTCSctpTransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Closed => "closed",
        };
        write!(f, "{s}")
    }
}

/// https://www.w3.org/TR/webrtc/#dom-rtcsctptransport-maxmessagesize
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SctpCapabilities {
    pub max_message_size: u64,
}

impl Default for SctpCapabilities {
    fn default() -> Self {
        Self {
            max_message_size: 262_144,
        }
    }
}

/// The SCTP transport adapter (C3): owns the DTLS transport exclusively and
/// is the only thing that ever touches it once the data channel subsystem
/// is wired up, so the association (C4) and the data channels on top of it
/// never need a reference to DTLS at all.
pub struct SctpTransportAdapter {
    dtls: Box<dyn DtlsTransport>,
    association: PeerAssociation,
    state: RTCSctpTransportState,
    capabilities: SctpCapabilities,
}

impl SctpTransportAdapter {
    pub fn new(dtls: Box<dyn DtlsTransport>, association: PeerAssociation) -> Self {
        Self {
            dtls,
            association,
            state: RTCSctpTransportState::Connecting,
            capabilities: SctpCapabilities::default(),
        }
    }

    pub fn state(&self) -> RTCSctpTransportState {
        self.state
    }

    pub fn capabilities(&self) -> SctpCapabilities {
        self.capabilities
    }

    pub fn start(&mut self, is_client: bool) -> Result<()> {
        self.association.associate(is_client)
    }

    /// Feed one inbound datagram already identified as DTLS by the demuxer
    /// down through DTLS and into the association.
    pub fn handle_receive(&mut self, data: &[u8]) -> Result<()> {
        self.dtls.handle_receive(data)?;
        while let Some(packet) = self.dtls.poll_app_data() {
            self.association.handle_receive(&packet)?;
        }
        Ok(())
    }

    pub fn send(
        &mut self,
        stream_id: u16,
        stream_seq: u16,
        ppid: sctp::PayloadProtocolIdentifier,
        ordered: bool,
        payload: &[u8],
    ) -> Result<()> {
        self.association
            .send_data(stream_id, stream_seq, ppid, ordered, payload)
    }

    /// Drain everything the association queued for transmission through
    /// DTLS, then drain DTLS's own outbound record queue for the ICE
    /// transport to send.
    pub fn poll_transmit(&mut self) -> Option<Bytes> {
        while let Some(sctp_packet) = self.association.poll_transmit() {
            if self.dtls.send_app_data(&sctp_packet).is_err() {
                continue;
            }
        }
        self.dtls.poll_transmit()
    }

    pub fn poll_event(&mut self) -> Option<AssociationEvent> {
        let event = self.association.poll_event();
        if let Some(AssociationEvent::Associated) = event {
            self.state = RTCSctpTransportState::Connected;
        }
        if let Some(AssociationEvent::Disassociated) = event {
            self.state = RTCSctpTransportState::Closed;
        }
        event
    }

    pub fn close_stream(&mut self, stream_id: u16) {
        self.association.close_stream(stream_id);
    }

    pub fn close(&mut self) {
        self.association.close();
        self.dtls.close();
        self.state = RTCSctpTransportState::Closed;
    }
}
