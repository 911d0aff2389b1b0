//! Device branding tables.
//!
//! Static, read-only tables mapping (possibly wildcarded) identifier tuples
//! to display names, plus the two queries built on top of them.
//!
//! # Usage
//!
//! ```ignore
//! use kdlink_transport::driver::intel::IntelFamily;
//!
//! let table = IntelFamily::E1000.branding();
//! if table.is_vendor_device_supported(key.vendor, key.device) {
//!     let name = table.display_name_for_function(&mut key, function);
//! }
//! ```

pub mod resolver;

use core::ops::Deref;

use crate::pci::types::DeviceKey;

pub use resolver::{resolve_best_effort, resolve_exact, resolve_with_tier, MatchTier};

/// Table-only sentinel meaning "any value in this field".
///
/// Shares its value with the all-ones ID an empty slot reads back, so it can
/// never collide with an identifier reported by a real device.
pub const WILDCARD: u16 = 0xFFFF;

// ═══════════════════════════════════════════════════════════════════════════
// RECORDS
// ═══════════════════════════════════════════════════════════════════════════

/// One branding table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrandRecord {
    pub key: DeviceKey,
    pub display_name: &'static str,
    /// Catch-all marker: matching it means "no usable match".
    pub invalid: bool,
}

impl BrandRecord {
    pub const fn new(
        vendor: u16,
        device: u16,
        subvendor: u16,
        subdevice: u16,
        display_name: &'static str,
    ) -> Self {
        Self {
            key: DeviceKey::new(vendor, device, subvendor, subdevice),
            display_name,
            invalid: false,
        }
    }

    /// Terminal catch-all record. All fields wildcarded, no name.
    pub const fn invalid() -> Self {
        Self {
            key: DeviceKey::new(WILDCARD, WILDCARD, WILDCARD, WILDCARD),
            display_name: "",
            invalid: true,
        }
    }

    /// Display name, or `None` for the catch-all record.
    pub fn name(&self) -> Option<&'static str> {
        if self.invalid {
            None
        } else {
            Some(self.display_name)
        }
    }
}

/// Canonical subdevice to brand non-primary functions of a multi-port chip.
///
/// Some adapters report a different subsystem ID on every port; only the
/// first port's ID is in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubdeviceAlias {
    pub device: u16,
    pub canonical_subdevice: u16,
}

// ═══════════════════════════════════════════════════════════════════════════
// TABLE + QUERIES
// ═══════════════════════════════════════════════════════════════════════════

/// A branding table for a single vendor.
#[derive(Debug, Clone, Copy)]
pub struct BrandingTable {
    vendor: u16,
    records: &'static [BrandRecord],
    aliases: &'static [SubdeviceAlias],
}

impl BrandingTable {
    pub const fn new(vendor: u16, records: &'static [BrandRecord]) -> Self {
        Self {
            vendor,
            records,
            aliases: &[],
        }
    }

    pub const fn with_aliases(mut self, aliases: &'static [SubdeviceAlias]) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn vendor(&self) -> u16 {
        self.vendor
    }

    pub fn records(&self) -> &'static [BrandRecord] {
        self.records
    }

    /// Best-effort display name for `key`.
    pub fn display_name(&self, key: &DeviceKey) -> Option<&'static str> {
        resolve_best_effort(self.records, key).and_then(BrandRecord::name)
    }

    /// Display name for a specific PCI function of a device.
    ///
    /// For non-primary functions of aliased devices the subdevice in `key`
    /// is replaced by the canonical one for the duration of the lookup and
    /// restored before returning, whether or not a record matched.
    pub fn display_name_for_function(
        &self,
        key: &mut DeviceKey,
        function: u8,
    ) -> Option<&'static str> {
        match self.canonical_subdevice(key.device, function) {
            Some(canonical) => {
                let scoped = SubdeviceOverride::new(key, canonical);
                self.display_name(&scoped)
            }
            None => self.display_name(key),
        }
    }

    /// True when `vendor` is this table's vendor and some record names
    /// `device` explicitly. Wildcard device fields do not count.
    pub fn is_vendor_device_supported(&self, vendor: u16, device: u16) -> bool {
        vendor == self.vendor
            && self
                .records
                .iter()
                .any(|record| record.key.device != WILDCARD && record.key.device == device)
    }

    fn canonical_subdevice(&self, device: u16, function: u8) -> Option<u16> {
        if function == 0 {
            return None;
        }
        self.aliases
            .iter()
            .find(|alias| alias.device == device)
            .map(|alias| alias.canonical_subdevice)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SCOPED SUBDEVICE OVERRIDE
// ═══════════════════════════════════════════════════════════════════════════

/// Replaces a key's subdevice until dropped.
///
/// The original value is written back in `Drop`, so every exit path
/// (match, no match, early return) restores the caller's key.
pub struct SubdeviceOverride<'k> {
    key: &'k mut DeviceKey,
    original: u16,
}

impl<'k> SubdeviceOverride<'k> {
    pub fn new(key: &'k mut DeviceKey, subdevice: u16) -> Self {
        let original = key.subdevice;
        key.subdevice = subdevice;
        Self { key, original }
    }

    pub fn original(&self) -> u16 {
        self.original
    }
}

impl Deref for SubdeviceOverride<'_> {
    type Target = DeviceKey;

    fn deref(&self) -> &DeviceKey {
        &*self.key
    }
}

impl Drop for SubdeviceOverride<'_> {
    fn drop(&mut self) {
        self.key.subdevice = self.original;
    }
}
