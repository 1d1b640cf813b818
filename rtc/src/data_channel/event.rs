use super::message::RTCDataChannelMessage;
use super::state::RTCDataChannelState;

/// Events `RTCDataChannel` surfaces to its owner via `poll_event`, mirroring
/// the W3C `RTCDataChannel` event set (`open`, `close`, `closing`,
/// `message`, `error`, `bufferedamountlow`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RTCDataChannelEvent {
    StateChange(RTCDataChannelState),
    Message(RTCDataChannelMessage),
    BufferedAmountLow,
    Error(String),
}
