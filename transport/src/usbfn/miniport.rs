//! USB Function miniport abstraction.
//!
//! A miniport is the register-level driver for one device-mode controller
//! IP. [`MiniportBackend`] wraps it as a [`TransportBackend`] and keeps the
//! bookkeeping every controller needs: started state, negotiated speed and
//! the set of configured endpoints.

use log::{debug, info};

use super::ids;
use super::types::{EndpointAddress, EndpointDescriptor, UsbBusSpeed, UsbFnEvent};
use super::UsbFnError;
use crate::driver::traits::TransportBackend;
use crate::error::{Result, TransportError};
use crate::pci::types::{DebugDevice, DeviceKey};

// ═══════════════════════════════════════════════════════════════════════════
// MINIPORT TRAIT
// ═══════════════════════════════════════════════════════════════════════════

/// Register-level USB device-mode controller driver.
pub trait UsbFnMiniport {
    fn name(&self) -> &'static str;

    /// Context bytes needed for `device`; zero when unsupported.
    fn context_size(&self, device: &DebugDevice<'_>) -> usize;

    /// Membership test against the controller IDs this miniport drives.
    fn supports(&self, key: &DeviceKey) -> bool;

    fn initialize(&mut self, device: &mut DebugDevice<'_>) -> Result<()>;

    /// Connect to the bus. Returns the speed the controller will attempt.
    fn start_controller(&mut self) -> Result<UsbBusSpeed>;

    fn stop_controller(&mut self) -> Result<()>;

    fn configure_endpoint(&mut self, descriptor: &EndpointDescriptor) -> Result<()>;

    /// Queue `data` on an IN endpoint. Returns bytes accepted.
    fn transfer_in(&mut self, endpoint: EndpointAddress, data: &[u8]) -> Result<usize>;

    /// Read from an OUT endpoint. Returns bytes received, zero when idle.
    fn transfer_out(&mut self, endpoint: EndpointAddress, buffer: &mut [u8]) -> Result<usize>;

    fn set_stall(&mut self, endpoint: EndpointAddress, stalled: bool) -> Result<()>;

    /// Next pending controller event, [`UsbFnEvent::None`] when idle.
    fn poll_event(&mut self) -> Result<UsbFnEvent>;
}

// ═══════════════════════════════════════════════════════════════════════════
// REQUESTS
// ═══════════════════════════════════════════════════════════════════════════

/// Api-entry request set for USB Function backends.
#[derive(Debug)]
pub enum UsbFnRequest<'d> {
    StartController,
    StopController,
    ConfigureEndpoint(EndpointDescriptor),
    Send {
        endpoint: EndpointAddress,
        data: &'d [u8],
        sent: usize,
    },
    Receive {
        endpoint: EndpointAddress,
        buffer: &'d mut [u8],
        received: usize,
    },
    SetStall {
        endpoint: EndpointAddress,
        stalled: bool,
    },
    PollEvent(UsbFnEvent),
}

// ═══════════════════════════════════════════════════════════════════════════
// BACKEND ADAPTER
// ═══════════════════════════════════════════════════════════════════════════

pub struct MiniportBackend<M: UsbFnMiniport> {
    miniport: M,
    speed: Option<UsbBusSpeed>,
    /// Bit `EndpointAddress::index()` set when configured.
    configured: u32,
    stalled: u32,
}

impl<M: UsbFnMiniport> MiniportBackend<M> {
    pub fn new(miniport: M) -> Self {
        Self {
            miniport,
            speed: None,
            configured: 0,
            stalled: 0,
        }
    }

    pub fn miniport(&self) -> &M {
        &self.miniport
    }

    pub fn is_running(&self) -> bool {
        self.speed.is_some()
    }

    pub fn speed(&self) -> Option<UsbBusSpeed> {
        self.speed
    }

    pub fn is_configured(&self, endpoint: EndpointAddress) -> bool {
        endpoint.is_control() || self.configured & (1 << endpoint.index()) != 0
    }

    fn running_speed(&self) -> core::result::Result<UsbBusSpeed, UsbFnError> {
        self.speed.ok_or(UsbFnError::NotStarted)
    }

    fn check_transfer(&self, endpoint: EndpointAddress) -> core::result::Result<(), UsbFnError> {
        self.running_speed()?;
        if !self.is_configured(endpoint) {
            return Err(UsbFnError::EndpointNotConfigured(endpoint.raw()));
        }
        if self.stalled & (1 << endpoint.index()) != 0 {
            return Err(UsbFnError::EndpointStalled(endpoint.raw()));
        }
        Ok(())
    }

    fn start_controller(&mut self) -> Result<()> {
        if self.speed.is_some() {
            return Ok(());
        }
        let speed = self.miniport.start_controller()?;
        info!("{}: controller started at {:?} speed", self.miniport.name(), speed);
        self.speed = Some(speed);
        Ok(())
    }

    fn stop_controller(&mut self) -> Result<()> {
        self.miniport.stop_controller()?;
        self.speed = None;
        self.configured = 0;
        self.stalled = 0;
        Ok(())
    }

    fn configure_endpoint(&mut self, descriptor: &EndpointDescriptor) -> Result<()> {
        let speed = self.running_speed()?;
        let limit = speed.max_packet(descriptor.ep_type);
        if descriptor.max_packet_size > limit {
            return Err(UsbFnError::PacketTooLarge {
                requested: descriptor.max_packet_size,
                limit,
            }
            .into());
        }
        self.miniport.configure_endpoint(descriptor)?;
        self.configured |= 1 << descriptor.address.index();
        debug!(
            "{}: endpoint {:#04x} configured ({:?}, {} bytes)",
            self.miniport.name(),
            descriptor.address.raw(),
            descriptor.ep_type,
            descriptor.max_packet_size
        );
        Ok(())
    }

    fn set_stall(&mut self, endpoint: EndpointAddress, stalled: bool) -> Result<()> {
        self.running_speed()?;
        self.miniport.set_stall(endpoint, stalled)?;
        let bit = 1 << endpoint.index();
        if stalled {
            self.stalled |= bit;
        } else {
            self.stalled &= !bit;
        }
        Ok(())
    }

    fn poll_event(&mut self) -> Result<UsbFnEvent> {
        let event = self.miniport.poll_event()?;
        if event.drops_configuration() {
            debug!("{}: {:?}, endpoints dropped", self.miniport.name(), event);
            self.configured = 0;
            self.stalled = 0;
        }
        // Speed reports only renegotiate a running controller.
        if let (UsbFnEvent::Speed(speed), Some(_)) = (event, self.speed) {
            self.speed = Some(speed);
        }
        Ok(event)
    }
}

impl<'d, M: UsbFnMiniport> TransportBackend<UsbFnRequest<'d>> for MiniportBackend<M> {
    fn name(&self) -> &'static str {
        self.miniport.name()
    }

    fn context_size(&self, device: &DebugDevice<'_>) -> usize {
        self.miniport.context_size(device)
    }

    fn initialize_library(&mut self, device: &mut DebugDevice<'_>) -> Result<()> {
        if !self.miniport.supports(&device.key) {
            return Err(TransportError::DeviceAbsent);
        }
        self.miniport.initialize(device)?;
        self.speed = None;
        self.configured = 0;
        self.stalled = 0;

        match ids::controller_name(&device.key) {
            Some(name) => info!("{}: {} [{}]", self.miniport.name(), name, device.key),
            None => info!("{}: controller {}", self.miniport.name(), device.key),
        }
        Ok(())
    }

    fn is_hardware_supported(&self, device: &DebugDevice<'_>) -> bool {
        self.miniport.supports(&device.key)
    }

    fn start(&mut self, _device: &mut DebugDevice<'_>) -> Result<()> {
        self.start_controller()
    }

    fn api_entry(&mut self, request: &mut UsbFnRequest<'d>) -> Result<()> {
        match request {
            UsbFnRequest::StartController => self.start_controller(),
            UsbFnRequest::StopController => self.stop_controller(),
            UsbFnRequest::ConfigureEndpoint(descriptor) => self.configure_endpoint(descriptor),
            UsbFnRequest::Send {
                endpoint,
                data,
                sent,
            } => {
                self.check_transfer(*endpoint)?;
                *sent = self.miniport.transfer_in(*endpoint, data)?;
                Ok(())
            }
            UsbFnRequest::Receive {
                endpoint,
                buffer,
                received,
            } => {
                self.check_transfer(*endpoint)?;
                *received = self.miniport.transfer_out(*endpoint, buffer)?;
                Ok(())
            }
            UsbFnRequest::SetStall { endpoint, stalled } => self.set_stall(*endpoint, *stalled),
            UsbFnRequest::PollEvent(slot) => {
                *slot = self.poll_event()?;
                Ok(())
            }
        }
    }
}
