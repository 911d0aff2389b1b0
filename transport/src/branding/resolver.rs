//! Identifier resolution over partially wildcarded tables.
//!
//! Two resolution modes:
//!
//! - **Exact**: all four fields equal, wildcards take no part.
//! - **Best effort**: the most specific tier wins.
//!
//! ```text
//! Tier            vendor  device  subvendor  subdevice
//! Subsystem         =       =        =          =       (returns immediately)
//! Subvendor         =       =        =          *
//! Device            =       =        *          -
//! Vendor            =       *        -          -
//! ```
//!
//! Within a tier the record seen *last* in table order wins.

use super::{BrandRecord, WILDCARD};
use crate::pci::types::DeviceKey;

/// How specifically a record matched a key. Ordered least to most specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchTier {
    Vendor,
    Device,
    Subvendor,
    Subsystem,
}

/// First record whose four fields equal `key` exactly.
///
/// The table is required to hold at most one such record, so the first hit
/// is the only hit.
pub fn resolve_exact<'t>(table: &'t [BrandRecord], key: &DeviceKey) -> Option<&'t BrandRecord> {
    table.iter().find(|record| record.key == *key)
}

/// Most specific record for `key`, or `None` when no tier is satisfied.
pub fn resolve_best_effort<'t>(
    table: &'t [BrandRecord],
    key: &DeviceKey,
) -> Option<&'t BrandRecord> {
    resolve_with_tier(table, key).map(|(_, record)| record)
}

/// Best-effort resolution that also reports which tier produced the match.
pub fn resolve_with_tier<'t>(
    table: &'t [BrandRecord],
    key: &DeviceKey,
) -> Option<(MatchTier, &'t BrandRecord)> {
    let mut subvendor_match = None;
    let mut device_match = None;
    let mut vendor_match = None;

    for record in table {
        let r = &record.key;
        if r.vendor != key.vendor {
            continue;
        }

        if r.device == key.device {
            if r.subvendor == key.subvendor {
                if r.subdevice == key.subdevice {
                    return Some((MatchTier::Subsystem, record));
                } else if r.subdevice == WILDCARD {
                    subvendor_match = Some(record);
                }
            } else if r.subvendor == WILDCARD {
                device_match = Some(record);
            }
        } else if r.device == WILDCARD {
            vendor_match = Some(record);
        }
    }

    subvendor_match
        .map(|record| (MatchTier::Subvendor, record))
        .or_else(|| device_match.map(|record| (MatchTier::Device, record)))
        .or_else(|| vendor_match.map(|record| (MatchTier::Vendor, record)))
}
