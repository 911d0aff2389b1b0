//! Intel 10GbE (ixgbe) branding.
//!
//! # Supported Devices
//! - 82599 (0x10FB) - X520 adapters
//! - X540 (0x1528)
//! - X550 (0x1563)
//!
//! # Reference
//! Intel 82599 10 GbE Controller Datasheet, Section 8 (Programming Interface)

use crate::branding::{BrandRecord, BrandingTable, SubdeviceAlias, WILDCARD as W};
use crate::pci::ids::{DELL_SUBVENDOR_ID, INTEL_VENDOR_ID};

/// Context bytes: 64 RX + 64 TX advanced descriptors plus driver state.
pub const CONTEXT_SIZE: usize = 0x2000;

const I: u16 = INTEL_VENDOR_ID;

pub const RECORDS: &[BrandRecord] = &[
    BrandRecord::new(I, 0x10FB, W, W, "Intel(R) 82599 10 Gigabit Network Connection"),
    BrandRecord::new(I, 0x10FB, I, 0x0003, "Intel(R) Ethernet Server Adapter X520-2"),
    BrandRecord::new(I, 0x10FB, I, 0x7A11, "Intel(R) Ethernet Server Adapter X520-2"),
    BrandRecord::new(I, 0x10FB, I, 0x0006, "Intel(R) Ethernet Server Adapter X520-1"),
    BrandRecord::new(I, 0x10FB, DELL_SUBVENDOR_ID, W, "Intel(R) Ethernet 10G 2P X520 Adapter"),
    BrandRecord::new(I, 0x1528, W, W, "Intel(R) Ethernet Controller X540-AT2"),
    BrandRecord::new(I, 0x1528, I, 0x0001, "Intel(R) Ethernet Converged Network Adapter X540-T2"),
    BrandRecord::new(I, 0x1528, I, 0x5003, "Intel(R) Ethernet Converged Network Adapter X540-T1"),
    BrandRecord::new(I, 0x1563, W, W, "Intel(R) Ethernet Controller X550"),
    BrandRecord::new(I, 0x1563, I, 0x0001, "Intel(R) Ethernet Converged Network Adapter X550-T2"),
    BrandRecord::new(I, W, W, W, "Intel(R) 10 Gigabit Network Connection"),
    BrandRecord::invalid(),
];

/// X540-T2 port 1 reports its own subsystem ID.
pub const ALIASES: &[SubdeviceAlias] = &[SubdeviceAlias {
    device: 0x1528,
    canonical_subdevice: 0x0001,
}];

pub const BRANDING: BrandingTable = BrandingTable::new(INTEL_VENDOR_ID, RECORDS).with_aliases(ALIASES);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pci::types::DeviceKey;

    #[test]
    fn test_x520_subsystem() {
        let key = DeviceKey::new(I, 0x10FB, I, 0x0003);
        assert_eq!(BRANDING.display_name(&key), Some("Intel(R) Ethernet Server Adapter X520-2"));
    }

    #[test]
    fn test_oem_x520_falls_back_to_device() {
        let key = DeviceKey::new(I, 0x10FB, 0x15D9, 0x0611);
        assert_eq!(
            BRANDING.display_name(&key),
            Some("Intel(R) 82599 10 Gigabit Network Connection")
        );
    }

    #[test]
    fn test_support_excludes_1gbe_parts() {
        assert!(BRANDING.is_vendor_device_supported(I, 0x1563));
        assert!(!BRANDING.is_vendor_device_supported(I, 0x1533));
    }
}
