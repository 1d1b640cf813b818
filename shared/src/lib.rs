#![warn(rust_2018_idioms)]
#![allow(dead_code)]

pub mod error;
pub mod marshal;
pub(crate) mod transport;

pub use transport::{TransportContext, TransportProtocol, Transmit};
