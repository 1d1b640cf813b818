use std::collections::VecDeque;

use bytes::Bytes;
use shared::Transmit;

/// What kind of packet a datagram's first byte identifies it as.
///
/// RTP/RTCP is classified but never produced further downstream by this
/// workspace (media is out of scope); it exists here only so the demuxer's
/// classification matches the full first-byte rule instead of a
/// two-way STUN/DTLS split that would silently misroute a media packet
/// arriving on the same 5-tuple.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PacketKind {
    Stun,
    Dtls,
    RtpOrRtcp,
    Unknown,
}

/// Classifies one datagram by its first byte, per the multiplexing scheme
/// every ICE-DTLS-SCTP stack uses to share a single 5-tuple.
pub fn classify_packet(data: &[u8]) -> PacketKind {
    match data.first() {
        None => PacketKind::Unknown,
        Some(&b) if b < 2 => PacketKind::Stun,
        Some(&b) if (19..=63).contains(&b) => PacketKind::Dtls,
        Some(&b) if (127..=191).contains(&b) => PacketKind::RtpOrRtcp,
        Some(_) => PacketKind::Unknown,
    }
}

/// One datagram, classified and still tagged with its transport context.
#[derive(Debug, Clone)]
pub struct DemuxedPacket {
    pub kind: PacketKind,
    pub payload: Bytes,
}

/// C2: classifies every inbound datagram on the 5-tuple and hands it to
/// whichever collaborator owns that protocol. Sans-I/O: `handle_read` never
/// calls into the ICE/DTLS collaborators itself, it only queues the
/// classification for `poll_read` so the owner decides how to route it.
#[derive(Default)]
pub struct Demuxer {
    queue: VecDeque<Transmit<DemuxedPacket>>,
}

impl Demuxer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_read(&mut self, transmit: Transmit<Bytes>) {
        let kind = classify_packet(&transmit.message);
        self.queue.push_back(Transmit {
            now: transmit.now,
            transport: transmit.transport,
            message: DemuxedPacket {
                kind,
                payload: transmit.message,
            },
        });
    }

    pub fn poll_read(&mut self) -> Option<Transmit<DemuxedPacket>> {
        self.queue.pop_front()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use shared::TransportContext;
    use std::time::Instant;

    fn wrap(bytes: &[u8]) -> Transmit<Bytes> {
        Transmit {
            now: Instant::now(),
            transport: TransportContext::default(),
            message: Bytes::copy_from_slice(bytes),
        }
    }

    #[test]
    fn classifies_stun() {
        assert_eq!(classify_packet(&[0x00, 0x01]), PacketKind::Stun);
        assert_eq!(classify_packet(&[0x01, 0xff]), PacketKind::Stun);
    }

    #[test]
    fn classifies_dtls() {
        assert_eq!(classify_packet(&[19]), PacketKind::Dtls);
        assert_eq!(classify_packet(&[20]), PacketKind::Dtls);
        assert_eq!(classify_packet(&[63]), PacketKind::Dtls);
    }

    #[test]
    fn classifies_rtp_rtcp() {
        assert_eq!(classify_packet(&[127]), PacketKind::RtpOrRtcp);
        assert_eq!(classify_packet(&[128]), PacketKind::RtpOrRtcp);
        assert_eq!(classify_packet(&[191]), PacketKind::RtpOrRtcp);
    }

    #[test]
    fn classifies_unknown() {
        assert_eq!(classify_packet(&[2]), PacketKind::Unknown);
        assert_eq!(classify_packet(&[64]), PacketKind::Unknown);
        assert_eq!(classify_packet(&[]), PacketKind::Unknown);
    }

    #[test]
    fn queues_preserve_transport_context() {
        let mut demux = Demuxer::new();
        demux.handle_read(wrap(&[20, 1, 2, 3]));
        let out = demux.poll_read().unwrap();
        assert_eq!(out.message.kind, PacketKind::Dtls);
        assert!(demux.poll_read().is_none());
    }
}
