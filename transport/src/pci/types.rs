//! PCI type definitions.
//!
//! # Reference
//! PCI Local Bus Specification 3.0

use core::fmt;

use super::ids::{
    CLASS_NETWORK, CLASS_SERIAL_BUS, NO_DEVICE_ID, PROG_IF_USB_DEVICE, SUBCLASS_ETHERNET,
    SUBCLASS_USB,
};

// ═══════════════════════════════════════════════════════════════════════════
// DEVICE KEY
// ═══════════════════════════════════════════════════════════════════════════

/// Identifier 4-tuple read from configuration space.
///
/// Keys built from hardware never contain [`crate::WILDCARD`]; only table
/// records do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceKey {
    pub vendor: u16,
    pub device: u16,
    pub subvendor: u16,
    pub subdevice: u16,
}

impl DeviceKey {
    pub const fn new(vendor: u16, device: u16, subvendor: u16, subdevice: u16) -> Self {
        Self {
            vendor,
            device,
            subvendor,
            subdevice,
        }
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04x}:{:04x} ({:04x}:{:04x})",
            self.vendor, self.device, self.subvendor, self.subdevice
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CLASS CODE
// ═══════════════════════════════════════════════════════════════════════════

/// 24-bit class code split into its three bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PciClass {
    pub base: u8,
    pub sub: u8,
    pub prog_if: u8,
}

impl PciClass {
    /// Ethernet controller.
    pub const NETWORK_ETHERNET: Self = Self::new(CLASS_NETWORK, SUBCLASS_ETHERNET, 0x00);

    /// USB device-mode (function) controller.
    pub const USB_DEVICE_CONTROLLER: Self =
        Self::new(CLASS_SERIAL_BUS, SUBCLASS_USB, PROG_IF_USB_DEVICE);

    pub const fn new(base: u8, sub: u8, prog_if: u8) -> Self {
        Self { base, sub, prog_if }
    }

    /// Decode the class register (offset 0x08), ignoring the revision byte.
    pub const fn from_class_register(reg: u32) -> Self {
        Self {
            base: (reg >> 24) as u8,
            sub: (reg >> 16) as u8,
            prog_if: (reg >> 8) as u8,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// DEVICE DESCRIPTOR
// ═══════════════════════════════════════════════════════════════════════════

/// Physical device handed to the dispatch controller by the boot sequence.
///
/// `memory` is the caller-allocated region backends keep their hardware
/// context in. Its length is checked against the summed context sizes
/// before any backend runs.
#[derive(Debug)]
pub struct DebugDevice<'m> {
    pub class: PciClass,
    pub key: DeviceKey,
    /// PCI function number; non-zero for secondary ports of multi-port chips.
    pub function: u8,
    pub memory: Option<&'m mut [u8]>,
}

impl<'m> DebugDevice<'m> {
    pub const fn new(class: PciClass, key: DeviceKey) -> Self {
        Self {
            class,
            key,
            function: 0,
            memory: None,
        }
    }

    pub fn with_function(mut self, function: u8) -> Self {
        self.function = function;
        self
    }

    pub fn with_memory(mut self, memory: &'m mut [u8]) -> Self {
        self.memory = Some(memory);
        self
    }

    /// Length of the context region, zero when none was provided.
    pub fn memory_len(&self) -> usize {
        self.memory.as_ref().map_or(0, |m| m.len())
    }

    /// Structural checks that do not depend on any backend.
    pub fn is_well_formed(&self) -> bool {
        self.memory.is_some() && self.key.vendor != NO_DEVICE_ID && self.function < 8
    }
}
