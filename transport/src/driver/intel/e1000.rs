//! Intel 1GbE (e1000/e1000e/igb) branding.
//!
//! # Supported Devices
//! - 82574L (0x10D3) - QEMU e1000e emulation
//! - 82579LM/V (0x1502/0x1503)
//! - I217, I218, I219 LOM parts
//! - I210/I211 (0x1533/0x1539)
//! - I350 (0x1521) - multi-port server adapters
//!
//! # Reference
//! Intel 82579 Datasheet, Section 10 (Programming Interface)

use crate::branding::{BrandRecord, BrandingTable, SubdeviceAlias, WILDCARD as W};
use crate::pci::ids::{DELL_SUBVENDOR_ID, HP_SUBVENDOR_ID, INTEL_VENDOR_ID, LENOVO_SUBVENDOR_ID};

/// Context bytes: 32 RX + 32 TX legacy descriptors plus driver state.
pub const CONTEXT_SIZE: usize = 0x1000;

const I: u16 = INTEL_VENDOR_ID;

pub const RECORDS: &[BrandRecord] = &[
    BrandRecord::new(I, 0x10D3, W, W, "Intel(R) 82574L Gigabit Network Connection"),
    BrandRecord::new(I, 0x10D3, I, 0xA01F, "Intel(R) Gigabit CT Desktop Adapter"),
    BrandRecord::new(I, 0x10D3, I, 0x0001, "Intel(R) Gigabit CT Desktop Adapter"),
    BrandRecord::new(I, 0x1502, W, W, "Intel(R) 82579LM Gigabit Network Connection"),
    BrandRecord::new(I, 0x1503, W, W, "Intel(R) 82579V Gigabit Network Connection"),
    BrandRecord::new(I, 0x153A, W, W, "Intel(R) Ethernet Connection I217-LM"),
    BrandRecord::new(I, 0x153B, W, W, "Intel(R) Ethernet Connection I217-V"),
    BrandRecord::new(I, 0x155A, W, W, "Intel(R) Ethernet Connection I218-LM"),
    BrandRecord::new(I, 0x1559, W, W, "Intel(R) Ethernet Connection I218-V"),
    BrandRecord::new(I, 0x15A0, W, W, "Intel(R) Ethernet Connection (2) I218-LM"),
    BrandRecord::new(I, 0x15A1, W, W, "Intel(R) Ethernet Connection (2) I218-V"),
    BrandRecord::new(I, 0x156F, W, W, "Intel(R) Ethernet Connection I219-LM"),
    BrandRecord::new(I, 0x1570, W, W, "Intel(R) Ethernet Connection I219-V"),
    BrandRecord::new(I, 0x15B7, W, W, "Intel(R) Ethernet Connection (2) I219-LM"),
    BrandRecord::new(I, 0x15B8, W, W, "Intel(R) Ethernet Connection (2) I219-V"),
    BrandRecord::new(I, 0x1533, W, W, "Intel(R) Ethernet Controller I210"),
    BrandRecord::new(I, 0x1533, I, 0x0001, "Intel(R) Ethernet Server Adapter I210-T1"),
    BrandRecord::new(I, 0x1539, W, W, "Intel(R) Ethernet Controller I211"),
    BrandRecord::new(I, 0x1521, W, W, "Intel(R) Ethernet Controller I350"),
    BrandRecord::new(I, 0x1521, I, 0x0001, "Intel(R) Ethernet Server Adapter I350-T4"),
    BrandRecord::new(I, 0x1521, DELL_SUBVENDOR_ID, W, "Intel(R) Gigabit 4P I350-t rNDC"),
    BrandRecord::new(I, 0x1521, HP_SUBVENDOR_ID, 0x337F, "HP Ethernet 1Gb 4-port 366i Adapter"),
    BrandRecord::new(I, 0x1521, LENOVO_SUBVENDOR_ID, W, "Lenovo I350-T4 Ethernet Adapter"),
    BrandRecord::new(I, W, W, W, "Intel(R) Gigabit Network Connection"),
    BrandRecord::invalid(),
];

/// I350-T4 ports 1-3 report per-port subsystem IDs.
pub const ALIASES: &[SubdeviceAlias] = &[SubdeviceAlias {
    device: 0x1521,
    canonical_subdevice: 0x0001,
}];

pub const BRANDING: BrandingTable = BrandingTable::new(INTEL_VENDOR_ID, RECORDS).with_aliases(ALIASES);
