//! Backend dispatch controller.
//!
//! Tries an ordered list of mutually exclusive backends against one
//! physical device and remembers which one took it.
//!
//! # State Machine
//!
//! ```text
//! Uninitialized ──► Probing(0) ──► Probing(1) ──► ... ──► Exhausted(DeviceAbsent)
//!                       │              │
//!                       ▼              ▼
//!                  Selected(0)    Selected(1)        (any other error)
//!                                                    ──► Exhausted(err)
//! ```
//!
//! Device validation, the class/vendor policy check and the context memory
//! check all run once per scan, before any backend is touched.
//!
//! Once `Selected(i)`, `initialize` goes straight to backend `i`.
//!
//! # Usage
//!
//! ```ignore
//! use kdlink_transport::boot::{BackendDispatch, INTEL_UNDI_POLICY};
//!
//! let mut backends: [&mut dyn TransportBackend<CommandBlock>; 3] = [&mut i40e, &mut ixgbe, &mut e1000];
//! let mut dispatch = BackendDispatch::new(&mut backends, INTEL_UNDI_POLICY);
//!
//! let required = dispatch.hardware_context_size(&device);
//! dispatch.initialize(&mut device)?;
//! dispatch.start(&mut device)?;
//! ```

use log::{debug, info, warn};

use crate::driver::traits::TransportBackend;
use crate::error::{BackendFailure, Diagnostic, Result, TransportError};
use crate::pci::ids::NO_DEVICE_ID;
use crate::pci::types::{DebugDevice, PciClass};

// ═══════════════════════════════════════════════════════════════════════════
// POLICY
// ═══════════════════════════════════════════════════════════════════════════

/// Which physical devices a controller is willing to probe at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevicePolicy {
    /// Accepted base class.
    pub base: u8,
    /// Accepted subclass.
    pub sub: u8,
    /// Accepted vendor IDs.
    pub vendors: &'static [u16],
}

impl DevicePolicy {
    pub const fn new(base: u8, sub: u8, vendors: &'static [u16]) -> Self {
        Self { base, sub, vendors }
    }

    /// Class and vendor gate. The programming interface is not checked.
    pub fn accepts(&self, class: PciClass, vendor: u16) -> bool {
        class.base == self.base && class.sub == self.sub && self.vendors.contains(&vendor)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// STATE
// ═══════════════════════════════════════════════════════════════════════════

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Uninitialized,
    /// Backend `i` is being initialised.
    Probing(usize),
    /// Backend `i` owns the device; capability calls go to it.
    Selected(usize),
    /// Scan ended without a selection.
    Exhausted(TransportError),
}

// ═══════════════════════════════════════════════════════════════════════════
// CONTROLLER
// ═══════════════════════════════════════════════════════════════════════════

/// Selection context owned by the boot sequence.
///
/// `R` is the api-entry request type shared by all backends in the list.
pub struct BackendDispatch<'a, 'b, R> {
    backends: &'a mut [&'b mut dyn TransportBackend<R>],
    policy: DevicePolicy,
    state: DispatchState,
    diagnostic: Diagnostic,
}

impl<'a, 'b, R> BackendDispatch<'a, 'b, R> {
    /// `backends` is in priority order, most specific generation first.
    pub fn new(backends: &'a mut [&'b mut dyn TransportBackend<R>], policy: DevicePolicy) -> Self {
        Self {
            backends,
            policy,
            state: DispatchState::Uninitialized,
            diagnostic: Diagnostic::new(),
        }
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn policy(&self) -> &DevicePolicy {
        &self.policy
    }

    /// Index of the selected backend.
    pub fn selected(&self) -> Option<usize> {
        match self.state {
            DispatchState::Selected(index) => Some(index),
            _ => None,
        }
    }

    pub fn selected_name(&self) -> Option<&'static str> {
        self.selected().map(|index| self.backends[index].name())
    }

    /// Why the transport is unusable; empty after a successful initialise.
    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }

    /// Context memory required for `device`: the sum of every backend's
    /// contribution. Backends that cannot drive the device add zero.
    pub fn hardware_context_size(&self, device: &DebugDevice<'_>) -> usize {
        self.backends
            .iter()
            .map(|backend| backend.context_size(device))
            .fold(0usize, usize::saturating_add)
    }

    /// Single entry point for first-time and repeated initialisation.
    pub fn initialize(&mut self, device: &mut DebugDevice<'_>) -> Result<()> {
        let (stage, result) = match self.state {
            DispatchState::Selected(index) => {
                debug!("dispatch: re-initializing {}", self.backends[index].name());
                ("reinit", self.backends[index].initialize_library(device))
            }
            _ => ("init", self.scan(device)),
        };

        match &result {
            Ok(()) => self.diagnostic.clear(),
            Err(err) => self.diagnostic.set(stage, err),
        }
        result
    }

    /// Support check routed to the selected backend; `false` when nothing
    /// is selected.
    pub fn is_hardware_supported(&self, device: &DebugDevice<'_>) -> bool {
        match self.selected() {
            Some(index) => self.backends[index].is_hardware_supported(device),
            None => false,
        }
    }

    pub fn start(&mut self, device: &mut DebugDevice<'_>) -> Result<()> {
        let index = self.require_selected()?;
        let result = self.backends[index].start(device);
        if let Err(err) = &result {
            self.diagnostic.set("start", err);
        }
        result
    }

    pub fn api_entry(&mut self, request: &mut R) -> Result<()> {
        let index = self.require_selected()?;
        self.backends[index].api_entry(request)
    }

    fn require_selected(&self) -> Result<usize> {
        self.selected()
            .ok_or(TransportError::Backend(BackendFailure::NotSelected))
    }

    fn scan(&mut self, device: &mut DebugDevice<'_>) -> Result<()> {
        self.state = DispatchState::Uninitialized;

        if let Err(err) = validate(device) {
            return self.exhaust(err);
        }

        if !self.policy.accepts(device.class, device.key.vendor) {
            debug!(
                "dispatch: class {:02x}:{:02x} vendor {:04x} rejected by policy",
                device.class.base, device.class.sub, device.key.vendor
            );
            return self.exhaust(TransportError::DeviceAbsent);
        }

        let required = self.hardware_context_size(device);
        let available = device.memory_len();
        if available < required {
            return self.exhaust(TransportError::InsufficientResources {
                required,
                available,
            });
        }

        for index in 0..self.backends.len() {
            self.state = DispatchState::Probing(index);
            let backend = &mut self.backends[index];
            debug!("dispatch: probing {} for {}", backend.name(), device.key);

            match backend.initialize_library(device) {
                Ok(()) => {
                    info!("dispatch: {} selected for {}", backend.name(), device.key);
                    self.state = DispatchState::Selected(index);
                    return Ok(());
                }
                Err(TransportError::DeviceAbsent) => continue,
                Err(err) => {
                    warn!("dispatch: {} failed: {}", backend.name(), err);
                    return self.exhaust(err);
                }
            }
        }

        self.exhaust(TransportError::DeviceAbsent)
    }

    fn exhaust(&mut self, err: TransportError) -> Result<()> {
        debug!("dispatch: exhausted: {}", err);
        self.state = DispatchState::Exhausted(err);
        Err(err)
    }
}

fn validate(device: &DebugDevice<'_>) -> Result<()> {
    if device.memory.is_none() {
        return Err(TransportError::InvalidArgument("no context memory"));
    }
    if device.key.vendor == NO_DEVICE_ID {
        return Err(TransportError::InvalidArgument("no device at address"));
    }
    if device.function >= 8 {
        return Err(TransportError::InvalidArgument("function number out of range"));
    }
    Ok(())
}
