use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Instant;

/// Type of transport protocol carrying a datagram. This workspace only ever
/// runs over UDP; the variant is kept so `TransportContext` can be reused
/// verbatim from the collaborator transports it is exchanged with.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransportProtocol {
    #[default]
    Udp,
    Tcp,
}

/// Local/peer address pair a packet was sent on or received from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransportContext {
    pub local_addr: SocketAddr,
    pub peer_addr: SocketAddr,
    pub transport_protocol: TransportProtocol,
}

impl Default for TransportContext {
    fn default() -> Self {
        Self {
            local_addr: SocketAddr::from_str("0.0.0.0:0").unwrap(),
            peer_addr: SocketAddr::from_str("0.0.0.0:0").unwrap(),
            transport_protocol: TransportProtocol::Udp,
        }
    }
}

/// A value tagged with the time it was observed and the transport context it
/// arrived on or is destined for. Used throughout the sans-I/O `Protocol`
/// pipeline (demuxer -> dtls -> sctp -> data channel) to carry a message
/// alongside its provenance.
#[derive(Debug, Clone)]
pub struct Transmit<T> {
    pub now: Instant,
    pub transport: TransportContext,
    pub message: T,
}
