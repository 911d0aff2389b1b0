//! USB device-mode controller identification.
//!
//! DesignWare USB3 DRD instances on PCI, identified through the same
//! best-effort resolver as the NIC branding tables.
//!
//! # Reference
//! Linux `drivers/usb/dwc3/dwc3-pci.c`

use crate::branding::{BrandRecord, BrandingTable, WILDCARD as W};
use crate::pci::ids::{INTEL_VENDOR_ID, SYNOPSYS_VENDOR_ID};
use crate::pci::types::DeviceKey;

const S: u16 = SYNOPSYS_VENDOR_ID;
const I: u16 = INTEL_VENDOR_ID;

pub const SYNOPSYS_RECORDS: &[BrandRecord] = &[
    BrandRecord::new(S, 0xABCD, W, W, "Synopsys HAPS USB3 DRD"),
    BrandRecord::new(S, 0xABCE, W, W, "Synopsys HAPS USB3 DRD (AXI)"),
    BrandRecord::new(S, 0xABCF, W, W, "Synopsys HAPS USB3.1 DRD"),
    BrandRecord::invalid(),
];

pub const INTEL_RECORDS: &[BrandRecord] = &[
    BrandRecord::new(I, 0x0F37, W, W, "Intel Bay Trail USB Device Controller"),
    BrandRecord::new(I, 0x119E, W, W, "Intel Merrifield USB Device Controller"),
    BrandRecord::new(I, 0x22B7, W, W, "Intel Braswell USB Device Controller"),
    BrandRecord::new(I, 0x9D30, W, W, "Intel Sunrise Point-LP USB Device Controller"),
    BrandRecord::new(I, 0xA130, W, W, "Intel Sunrise Point-H USB Device Controller"),
    BrandRecord::new(I, 0x0AAA, W, W, "Intel Broxton USB Device Controller"),
    BrandRecord::new(I, 0x5AAA, W, W, "Intel Apollo Lake USB Device Controller"),
    BrandRecord::new(I, 0xA2B0, W, W, "Intel Kaby Point USB Device Controller"),
    BrandRecord::new(I, 0x31AA, W, W, "Intel Gemini Lake USB Device Controller"),
    BrandRecord::new(I, 0x9DEE, W, W, "Intel Cannon Point-LP USB Device Controller"),
    BrandRecord::new(I, 0xA36E, W, W, "Intel Cannon Point-H USB Device Controller"),
    BrandRecord::new(I, 0x34EE, W, W, "Intel Ice Lake-LP USB Device Controller"),
    BrandRecord::new(I, W, W, W, "Intel USB Device Controller"),
    BrandRecord::invalid(),
];

pub const SYNOPSYS_CONTROLLERS: BrandingTable = BrandingTable::new(S, SYNOPSYS_RECORDS);
pub const INTEL_CONTROLLERS: BrandingTable = BrandingTable::new(I, INTEL_RECORDS);

/// Controller table for `vendor`.
pub fn controller_table(vendor: u16) -> Option<BrandingTable> {
    match vendor {
        SYNOPSYS_VENDOR_ID => Some(SYNOPSYS_CONTROLLERS),
        INTEL_VENDOR_ID => Some(INTEL_CONTROLLERS),
        _ => None,
    }
}

/// Device ID is listed explicitly for its vendor.
pub fn is_known_controller(key: &DeviceKey) -> bool {
    controller_table(key.vendor)
        .is_some_and(|table| table.is_vendor_device_supported(key.vendor, key.device))
}

pub fn controller_name(key: &DeviceKey) -> Option<&'static str> {
    controller_table(key.vendor)?.display_name(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_controllers() {
        assert!(is_known_controller(&DeviceKey::new(S, 0xABCF, S, 0xABCF)));
        assert!(is_known_controller(&DeviceKey::new(I, 0x9D30, 0x17AA, 0x2245)));
        assert!(!is_known_controller(&DeviceKey::new(I, 0x1533, I, 0x0001)));
        assert!(!is_known_controller(&DeviceKey::new(0x1B73, 0x1100, 0x1B73, 0x1100)));
    }

    #[test]
    fn test_controller_names() {
        let haps = DeviceKey::new(S, 0xABCE, S, 0x0000);
        assert_eq!(controller_name(&haps), Some("Synopsys HAPS USB3 DRD (AXI)"));

        // Unlisted Intel part still gets the vendor-wide name.
        let future = DeviceKey::new(I, 0x7E7E, I, 0x7270);
        assert_eq!(controller_name(&future), Some("Intel USB Device Controller"));

        // Synopsys has no vendor-wide record.
        let unknown = DeviceKey::new(S, 0x1234, S, 0x0000);
        assert_eq!(controller_name(&unknown), None);
    }
}
