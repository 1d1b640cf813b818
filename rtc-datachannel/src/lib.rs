#![warn(rust_2018_idioms)]
#![allow(dead_code)]

//! DCEP framing (RFC 8832) and the per-stream data channel protocol engine
//! built on it.

pub mod data_channel;
pub mod message;

pub use data_channel::{
    ChannelState, DataChannel, DataChannelEvent, DataChannelParams, Inbound, Outbound,
};
pub use message::{ChannelType, DataChannelAck, DataChannelOpen, Message, MessageType};
