//! Transport presets and detection.
//!
//! Policies for the two controller flavours, plus a cheap detection pass
//! the boot sequence can run before committing memory to a controller.
//!
//! # Usage
//!
//! ```ignore
//! use kdlink_transport::boot::probe::{detect_transport, DetectedTransport};
//!
//! match detect_transport(&device) {
//!     Some(DetectedTransport::IntelNic(family)) => { /* build UNDI backends */ }
//!     Some(DetectedTransport::UsbFunction) => { /* build miniport backends */ }
//!     None => { /* fall back to serial */ }
//! }
//! ```

use super::dispatch::DevicePolicy;
use crate::driver::intel::IntelFamily;
use crate::pci::ids::{
    CLASS_NETWORK, CLASS_SERIAL_BUS, INTEL_VENDOR_ID, SUBCLASS_ETHERNET, SUBCLASS_USB,
    SYNOPSYS_VENDOR_ID,
};
use crate::pci::types::DebugDevice;
use crate::usbfn::ids as usbfn_ids;

// ═══════════════════════════════════════════════════════════════════════════
// POLICIES
// ═══════════════════════════════════════════════════════════════════════════

/// Intel Ethernet controllers.
pub const INTEL_UNDI_POLICY: DevicePolicy =
    DevicePolicy::new(CLASS_NETWORK, SUBCLASS_ETHERNET, &[INTEL_VENDOR_ID]);

/// USB device-mode controllers (DWC3 on Intel PCH/SoC and Synopsys HAPS).
pub const USBFN_POLICY: DevicePolicy = DevicePolicy::new(
    CLASS_SERIAL_BUS,
    SUBCLASS_USB,
    &[INTEL_VENDOR_ID, SYNOPSYS_VENDOR_ID],
);

// ═══════════════════════════════════════════════════════════════════════════
// DETECTION
// ═══════════════════════════════════════════════════════════════════════════

/// Transport a device can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedTransport {
    /// Intel NIC driven by the given family.
    IntelNic(IntelFamily),
    /// USB device-mode controller.
    UsbFunction,
}

/// Classify `device` without touching hardware.
///
/// Applies the same policy gates the dispatch controller applies, then
/// the per-family membership tests.
pub fn detect_transport(device: &DebugDevice<'_>) -> Option<DetectedTransport> {
    let vendor = device.key.vendor;

    if INTEL_UNDI_POLICY.accepts(device.class, vendor) {
        return IntelFamily::for_device(&device.key).map(DetectedTransport::IntelNic);
    }

    if USBFN_POLICY.accepts(device.class, vendor) && usbfn_ids::is_known_controller(&device.key) {
        return Some(DetectedTransport::UsbFunction);
    }

    None
}

/// Display name for a detected device, for boot banners.
pub fn transport_display_name(device: &DebugDevice<'_>) -> Option<&'static str> {
    let mut key = device.key;
    match detect_transport(device)? {
        DetectedTransport::IntelNic(family) => family
            .branding()
            .display_name_for_function(&mut key, device.function),
        DetectedTransport::UsbFunction => usbfn_ids::controller_name(&key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pci::types::{DeviceKey, PciClass};

    #[test]
    fn test_detect_intel_families() {
        let cases = [
            (0x1583, IntelFamily::I40e),
            (0x10FB, IntelFamily::Ixgbe),
            (0x15B8, IntelFamily::E1000),
        ];
        for (device_id, family) in cases {
            let dev = DebugDevice::new(
                PciClass::NETWORK_ETHERNET,
                DeviceKey::new(INTEL_VENDOR_ID, device_id, INTEL_VENDOR_ID, 0x0000),
            );
            let expected = family.is_linked().then_some(DetectedTransport::IntelNic(family));
            assert_eq!(detect_transport(&dev), expected);
        }
    }

    #[test]
    fn test_detect_rejects_wrong_class() {
        // Intel e1000e ID presented with a USB class code.
        let dev = DebugDevice::new(
            PciClass::USB_DEVICE_CONTROLLER,
            DeviceKey::new(INTEL_VENDOR_ID, 0x10D3, INTEL_VENDOR_ID, 0x0000),
        );
        assert_eq!(detect_transport(&dev), None);
    }

    #[test]
    fn test_detect_usb_function() {
        let dev = DebugDevice::new(
            PciClass::USB_DEVICE_CONTROLLER,
            DeviceKey::new(SYNOPSYS_VENDOR_ID, 0xABCD, SYNOPSYS_VENDOR_ID, 0xABCD),
        );
        assert_eq!(detect_transport(&dev), Some(DetectedTransport::UsbFunction));
        assert!(transport_display_name(&dev).is_some());
    }

    #[test]
    fn test_display_name_for_nic() {
        let dev = DebugDevice::new(
            PciClass::NETWORK_ETHERNET,
            DeviceKey::new(INTEL_VENDOR_ID, 0x10D3, INTEL_VENDOR_ID, 0xA01F),
        );
        if IntelFamily::E1000.is_linked() {
            assert_eq!(
                transport_display_name(&dev),
                Some("Intel(R) Gigabit CT Desktop Adapter")
            );
        }
    }
}
