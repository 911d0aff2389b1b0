//! USB Function controller layer.
//!
//! Tunnels debugger traffic over a USB device-mode controller. A miniport
//! drives one controller IP; [`MiniportBackend`] puts it behind the same
//! dispatch controller the NIC backends use.
//!
//! # What This Module Does NOT Do
//!
//! - Enumeration (descriptors, SET_ADDRESS, SET_CONFIGURATION)
//! - Controller register programming

pub mod ids;
pub mod miniport;
pub mod types;

use crate::error::{BackendFailure, TransportError};

// Re-exports
pub use miniport::{MiniportBackend, UsbFnMiniport, UsbFnRequest};
pub use types::{
    Direction, EndpointAddress, EndpointDescriptor, EndpointType, SetupPacket, UsbBusSpeed,
    UsbFnEvent,
};

/// USB Function errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UsbFnError {
    #[error("buffer too short: {expected} bytes expected, {actual} provided")]
    ShortBuffer { expected: usize, actual: usize },
    #[error("malformed descriptor")]
    InvalidDescriptor,
    #[error("endpoint {0:#04x} not configured")]
    EndpointNotConfigured(u8),
    #[error("endpoint {0:#04x} stalled")]
    EndpointStalled(u8),
    #[error("controller not started")]
    NotStarted,
    #[error("max packet size {requested} above {limit} for bus speed")]
    PacketTooLarge { requested: u16, limit: u16 },
}

impl From<UsbFnError> for TransportError {
    fn from(err: UsbFnError) -> Self {
        TransportError::Backend(BackendFailure::UsbFn(err))
    }
}
