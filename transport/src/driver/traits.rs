//! Backend capability set.
//!
//! Every hardware family (one NIC generation, one USB controller IP) is
//! presented to the dispatch controller through this trait.

use crate::error::Result;
use crate::pci::types::DebugDevice;

/// Capability entry points of one interchangeable hardware-family backend.
///
/// `R` is the request type accepted by [`TransportBackend::api_entry`]:
/// a UNDI command block for NICs, a miniport request for USB controllers.
pub trait TransportBackend<R> {
    /// Short family name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Bytes of caller memory this family needs for `device`.
    ///
    /// Pure function of the descriptor. Families that cannot drive the
    /// device contribute zero.
    fn context_size(&self, device: &DebugDevice<'_>) -> usize;

    /// One-time library initialisation against `device`.
    ///
    /// # Returns
    /// - `Ok(())`: device is driven by this backend
    /// - `Err(TransportError::DeviceAbsent)`: not this backend's device; the
    ///   controller moves on to the next one
    /// - any other error: fatal, surfaced to the caller unchanged
    fn initialize_library(&mut self, device: &mut DebugDevice<'_>) -> Result<()>;

    /// Cheap support check that touches no hardware.
    fn is_hardware_supported(&self, device: &DebugDevice<'_>) -> bool;

    /// Bring the controller up after a successful initialisation.
    fn start(&mut self, device: &mut DebugDevice<'_>) -> Result<()>;

    /// Family-specific command entry point.
    fn api_entry(&mut self, request: &mut R) -> Result<()>;
}
