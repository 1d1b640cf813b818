use std::fmt;

use crate::sdp::RTCSdpType;

/// https://www.w3.org/TR/webrtc/#dom-rtcdtlsrole
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RTCDtlsRole {
    #[default]
    Auto,
    Client,
    Server,
}

/// The answerer defaults to the DTLS server role absent an `a=setup`
/// attribute saying otherwise (RFC 8842 section 5.3).
pub const DEFAULT_DTLS_ROLE_ANSWER: RTCDtlsRole = RTCDtlsRole::Client;
pub const DEFAULT_DTLS_ROLE_OFFER: RTCDtlsRole = RTCDtlsRole::Auto;

impl fmt::Display for RTCDtlsRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Auto => "auto",
            Self::Client => "client",
            Self::Server => "server",
        };
        write!(f, "{s}")
    }
}

impl RTCDtlsRole {
    /// The default role to offer/answer with, absent any negotiated
    /// `a=setup` attribute, given which side of the offer/answer exchange
    /// we are on.
    pub fn default_for(sdp_type: RTCSdpType) -> Self {
        match sdp_type {
            RTCSdpType::Answer | RTCSdpType::Pranswer => DEFAULT_DTLS_ROLE_ANSWER,
            _ => DEFAULT_DTLS_ROLE_OFFER,
        }
    }

    /// Whether this side sends the SCTP INIT (RFC 8261 section 5): the
    /// DTLS client always opens the association.
    pub fn is_client(&self) -> bool {
        matches!(self, Self::Client)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn offerer_defaults_to_auto() {
        assert_eq!(RTCDtlsRole::default_for(RTCSdpType::Offer), RTCDtlsRole::Auto);
    }

    #[test]
    fn answerer_defaults_to_client() {
        assert_eq!(
            RTCDtlsRole::default_for(RTCSdpType::Answer),
            DEFAULT_DTLS_ROLE_ANSWER
        );
    }

    #[test]
    fn only_client_role_opens_association() {
        assert!(RTCDtlsRole::Client.is_client());
        assert!(!RTCDtlsRole::Server.is_client());
        assert!(!RTCDtlsRole::Auto.is_client());
    }
}
