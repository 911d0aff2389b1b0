//! Intel 700-series (i40e) branding.

use crate::branding::{BrandRecord, BrandingTable, WILDCARD as W};
use crate::pci::ids::INTEL_VENDOR_ID;

/// Context bytes: admin queue plus 128 RX + 128 TX descriptors.
pub const CONTEXT_SIZE: usize = 0x4000;

const I: u16 = INTEL_VENDOR_ID;

pub const RECORDS: &[BrandRecord] = &[
    BrandRecord::new(I, 0x1572, W, W, "Intel(R) Ethernet Controller X710 for 10GbE SFP+"),
    BrandRecord::new(I, 0x1572, I, 0x0001, "Intel(R) Ethernet Converged Network Adapter X710-4"),
    BrandRecord::new(I, 0x1572, I, 0x0007, "Intel(R) Ethernet Converged Network Adapter X710-2"),
    BrandRecord::new(I, 0x1583, W, W, "Intel(R) Ethernet Controller XL710 for 40GbE QSFP+"),
    BrandRecord::new(I, 0x1583, I, 0x0001, "Intel(R) Ethernet Converged Network Adapter XL710-Q2"),
    BrandRecord::new(I, 0x1584, W, W, "Intel(R) Ethernet Controller XL710 for 40GbE QSFP+"),
    BrandRecord::new(I, 0x1584, I, 0x0001, "Intel(R) Ethernet Converged Network Adapter XL710-Q1"),
    BrandRecord::new(I, 0x1589, W, W, "Intel(R) Ethernet Controller X710/X557-AT 10GBASE-T"),
    BrandRecord::new(I, 0x1589, I, 0x0001, "Intel(R) Ethernet Converged Network Adapter X710-T4"),
    BrandRecord::new(I, W, W, W, "Intel(R) Ethernet Controller 700 Series"),
    BrandRecord::invalid(),
];

pub const BRANDING: BrandingTable = BrandingTable::new(INTEL_VENDOR_ID, RECORDS);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pci::types::DeviceKey;

    #[test]
    fn test_xl710_branding() {
        let key = DeviceKey::new(I, 0x1583, I, 0x0001);
        assert_eq!(
            BRANDING.display_name(&key),
            Some("Intel(R) Ethernet Converged Network Adapter XL710-Q2")
        );
    }

    #[test]
    fn test_no_aliases_secondary_function_uses_own_subdevice() {
        let mut key = DeviceKey::new(I, 0x1572, I, 0x0002);
        assert_eq!(
            BRANDING.display_name_for_function(&mut key, 1),
            Some("Intel(R) Ethernet Controller X710 for 10GbE SFP+")
        );
    }
}
