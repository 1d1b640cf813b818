#![allow(dead_code)]

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the DCEP codec, the SCTP association layer, and
/// the peer connection / signaling state machine.
///
/// Parse and framing errors (`ErrMalformedDcep`, `ErrInvalidSdp`, ...) are
/// handled locally by their component and never tear down a peer connection.
/// State-machine violations (`ErrInvalidSignalingState`, `ErrNoRemoteDescription`,
/// ...) are returned to the caller. `ErrTransportFailure` propagates upward and
/// terminates the connection.
#[derive(Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    // --- DCEP / wire framing (C1) ---
    #[error("buffer too short: expected at least {expected} bytes, got {actual}")]
    UnexpectedEndOfBuffer { expected: usize, actual: usize },
    #[error("malformed DCEP message: {0}")]
    ErrMalformedDcep(String),
    #[error("invalid DCEP message type {0}")]
    ErrInvalidMessageType(u8),
    #[error("invalid payload protocol identifier {0}")]
    ErrInvalidPayloadProtocolIdentifier(u8),
    #[error("label/protocol is not valid UTF-8")]
    ErrInvalidUtf8,

    // --- SCTP association (C4) ---
    #[error("SCTP association is not yet established")]
    ErrNotAssociated,
    #[error("stream id {0} is already in use")]
    ErrStreamIdCollision(u16),
    #[error("no stream ids available for allocation")]
    ErrStreamIdsExhausted,
    #[error("unknown stream id {0}")]
    ErrStreamNotFound(u16),

    // --- Data channel (C6) ---
    #[error("data channel is closed")]
    ErrDataChannelClosed,
    #[error("max_packet_lifetime_ms and max_retransmits are mutually exclusive")]
    ErrRetransmitsAndLifetimeBothSet,

    // --- Signaling (C7) / Peer connection (C8) ---
    #[error("signaling state {0} does not allow this operation")]
    ErrInvalidSignalingState(String),
    #[error("signaling state is already stable; cannot roll back")]
    ErrSignalingStateCannotRollback,
    #[error("createAnswer called without a remote description")]
    ErrNoRemoteDescription,
    #[error("invalid SDP: {0}")]
    ErrInvalidSdp(String),
    #[error("peer connection is closed")]
    ErrPeerConnectionClosed,
    #[error("transport failed unrecoverably: {0}")]
    ErrTransportFailure(String),

    // --- Signaling bridge (C9) ---
    #[error("unrecognized signaling message shape")]
    ErrUnknownSignalingShape,
    #[error("failed to parse signaling JSON: {0}")]
    ErrSignalingParse(String),

    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(_: std::string::FromUtf8Error) -> Self {
        Error::ErrInvalidUtf8
    }
}
