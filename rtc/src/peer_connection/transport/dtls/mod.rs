mod role;

use std::fmt;

use bytes::Bytes;
use shared::error::Result;

pub use role::{RTCDtlsRole, DEFAULT_DTLS_ROLE_ANSWER, DEFAULT_DTLS_ROLE_OFFER};

/// https://www.w3.org/TR/webrtc/#dom-rtcdtlstransportstate
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DtlsTransportState {
    #[default]
    New,
    Connecting,
    Connected,
    Closed,
    Failed,
}

impl fmt::Display for DtlsTransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::New => "new",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Closed => "closed",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// The boundary this crate drives a DTLS implementation through. A full
/// DTLS 1.2/1.3 handshake and record layer is out of scope; this crate only
/// needs to hand it inbound datagrams classified by the demuxer (C2) and
/// pull decrypted SCTP packets and outbound records back out, sans-io
/// style, so the association (C3/C4) never has to know DTLS exists.
pub trait DtlsTransport: Send {
    fn role(&self) -> RTCDtlsRole;
    fn state(&self) -> DtlsTransportState;

    /// Feed one inbound datagram already identified as DTLS by the demuxer.
    fn handle_receive(&mut self, data: &[u8]) -> Result<()>;

    /// Decrypted application data (SCTP packets) ready for the association.
    fn poll_app_data(&mut self) -> Option<Bytes>;

    /// Encrypt and queue an outbound SCTP packet.
    fn send_app_data(&mut self, data: &[u8]) -> Result<()>;

    /// DTLS records ready to hand to the ICE transport.
    fn poll_transmit(&mut self) -> Option<Bytes>;

    fn close(&mut self);
}
