//! KdLink transport core
//!
//! Device identification and backend dispatch for kernel debugger
//! transports that come up before the OS does.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    BackendDispatch                          │
//! │  Validate → Size check → Probe backends → Remember choice   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!         ┌────────────────────┼────────────────────┐
//!         ▼                    ▼                    ▼
//!    Intel i40e           Intel ixgbe          Intel e1000
//!    (40GbE UNDI)         (10GbE UNDI)         (1GbE UNDI)
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │              BrandingTable / resolver                       │
//! │  Most specific (vendor, device, subvendor, subdevice) wins  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! USB Function controllers go through the same controller via
//! [`usbfn::MiniportBackend`].
//!
//! # What This Crate Does NOT Do
//!
//! - Register-level NIC or USB controller programming
//! - DMA buffer management
//! - Packet transmit/receive

#![cfg_attr(not(test), no_std)]

pub mod boot;
pub mod branding;
pub mod driver;
pub mod error;
pub mod pci;
pub mod usbfn;

pub use boot::dispatch::{BackendDispatch, DevicePolicy, DispatchState};
pub use branding::{BrandRecord, BrandingTable, MatchTier, WILDCARD};
pub use driver::traits::TransportBackend;
pub use error::{BackendFailure, Diagnostic, Result, TransportError};
pub use pci::types::{DebugDevice, DeviceKey, PciClass};
