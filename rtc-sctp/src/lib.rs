#![warn(rust_2018_idioms)]
#![allow(dead_code)]

//! The peer SCTP association abstraction (RFC 4960/8831 as used by WebRTC
//! data channels). This crate does not implement SCTP itself; it defines the
//! [`association::SctpEngine`] boundary an engine plugs into and the
//! stream-oriented [`association::PeerAssociation`] built on top of it.

mod association;
mod ppid;

pub use association::{AssociationEvent, AssociationState, EngineEvent, PeerAssociation, SctpEngine};
pub use ppid::PayloadProtocolIdentifier;
