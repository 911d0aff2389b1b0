//! PCI vendor IDs and class codes.
//!
//! # Reference
//! PCI Code and ID Assignment Specification 1.12

/// Intel Corporation.
pub const INTEL_VENDOR_ID: u16 = 0x8086;

/// Synopsys, Inc. (DesignWare USB3 DRD reference platforms).
pub const SYNOPSYS_VENDOR_ID: u16 = 0x16C3;

/// Dell.
pub const DELL_SUBVENDOR_ID: u16 = 0x1028;

/// Hewlett-Packard.
pub const HP_SUBVENDOR_ID: u16 = 0x103C;

/// Lenovo.
pub const LENOVO_SUBVENDOR_ID: u16 = 0x17AA;

/// Vendor ID read back from an empty slot.
pub const NO_DEVICE_ID: u16 = 0xFFFF;

/// Base class: network controller.
pub const CLASS_NETWORK: u8 = 0x02;
/// Network subclass: Ethernet.
pub const SUBCLASS_ETHERNET: u8 = 0x00;

/// Base class: serial bus controller.
pub const CLASS_SERIAL_BUS: u8 = 0x0C;
/// Serial bus subclass: USB.
pub const SUBCLASS_USB: u8 = 0x03;
/// USB programming interface: USB device (not host controller).
pub const PROG_IF_USB_DEVICE: u8 = 0xFE;
