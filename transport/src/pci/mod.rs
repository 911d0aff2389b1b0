//! PCI identification types.
//!
//! Only what the identification and dispatch core needs: identifier
//! tuples, class codes and the device descriptor handed over by the boot
//! sequence. Configuration-space access lives with the platform.
//!
//! # Reference
//! PCI Local Bus Specification 3.0, §6.2.1 (Device Identification)

pub mod ids;
pub mod types;

pub use ids::{INTEL_VENDOR_ID, SYNOPSYS_VENDOR_ID};
pub use types::{DebugDevice, DeviceKey, PciClass};
