use bytes::Bytes;

/// https://www.w3.org/TR/webrtc/#dom-rtcdatachannelevent
/// (the `data` half of the `message` event; string vs binary is carried as
/// a flag rather than two separate variants so callers can match once).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RTCDataChannelMessage {
    pub data: Bytes,
    pub is_string: bool,
}
