use std::net::SocketAddr;

/// https://www.w3.org/TR/webrtc/#dom-rtciceserver
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RTCIceServer {
    pub urls: Vec<String>,
    pub username: String,
    pub credential: String,
}

/// https://www.w3.org/TR/webrtc/#dom-rtcicetransportpolicy
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RTCIceTransportPolicy {
    #[default]
    All,
    Relay,
}

/// https://www.w3.org/TR/webrtc/#dom-rtcbundlepolicy
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RTCBundlePolicy {
    Balanced,
    MaxCompat,
    #[default]
    MaxBundle,
}

/// https://www.w3.org/TR/webrtc/#dom-rtcrtcpmuxpolicy
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RTCRtcpMuxPolicy {
    Negotiate,
    #[default]
    Require,
}

/// https://www.w3.org/TR/webrtc/#dom-rtcconfiguration
#[derive(Debug, Clone, PartialEq)]
pub struct RTCConfiguration {
    pub ice_servers: Vec<RTCIceServer>,
    pub ice_transport_policy: RTCIceTransportPolicy,
    pub bundle_policy: RTCBundlePolicy,
    pub rtcp_mux_policy: RTCRtcpMuxPolicy,
    pub ice_candidate_pool_size: u8,
    /// Local address to bind the underlying UDP socket to; not part of the
    /// W3C dictionary, but every embedding of this stack needs to say which
    /// interface to gather host candidates from.
    pub bind_address: Option<SocketAddr>,
}

impl Default for RTCConfiguration {
    fn default() -> Self {
        Self {
            ice_servers: Vec::new(),
            ice_transport_policy: RTCIceTransportPolicy::default(),
            bundle_policy: RTCBundlePolicy::default(),
            rtcp_mux_policy: RTCRtcpMuxPolicy::default(),
            ice_candidate_pool_size: 0,
            bind_address: None,
        }
    }
}

/// Builder for [`RTCConfiguration`], following the same fluent pattern the
/// rest of this workspace uses for multi-field dictionaries instead of
/// requiring callers to spell out every field.
#[derive(Debug, Clone, Default)]
pub struct RTCConfigurationBuilder {
    config: RTCConfiguration,
}

impl RTCConfigurationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ice_servers(mut self, ice_servers: Vec<RTCIceServer>) -> Self {
        self.config.ice_servers = ice_servers;
        self
    }

    pub fn with_ice_transport_policy(mut self, policy: RTCIceTransportPolicy) -> Self {
        self.config.ice_transport_policy = policy;
        self
    }

    pub fn with_bundle_policy(mut self, policy: RTCBundlePolicy) -> Self {
        self.config.bundle_policy = policy;
        self
    }

    pub fn with_rtcp_mux_policy(mut self, policy: RTCRtcpMuxPolicy) -> Self {
        self.config.rtcp_mux_policy = policy;
        self
    }

    pub fn with_ice_candidate_pool_size(mut self, size: u8) -> Self {
        self.config.ice_candidate_pool_size = size;
        self
    }

    pub fn with_bind_address(mut self, addr: SocketAddr) -> Self {
        self.config.bind_address = Some(addr);
        self
    }

    pub fn build(self) -> RTCConfiguration {
        self.config
    }
}
