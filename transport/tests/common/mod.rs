//! Common test utilities and scripted backends

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use kdlink_transport::driver::{CommandBlock, UndiHardware, UndiStatus};
use kdlink_transport::pci::ids::INTEL_VENDOR_ID;
use kdlink_transport::{
    BackendFailure, DebugDevice, DeviceKey, PciClass, Result, TransportBackend, TransportError,
};

/// Shared record of which backend entry points ran, in order.
pub type CallLog = Rc<RefCell<Vec<String>>>;

pub fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Backend whose initialise result is scripted.
pub struct ScriptedBackend {
    pub name: &'static str,
    pub context: usize,
    pub init_result: Result<()>,
    pub init_calls: usize,
    pub start_calls: usize,
    pub requests: Vec<u32>,
    log: CallLog,
}

impl ScriptedBackend {
    pub fn new(name: &'static str, log: &CallLog) -> Self {
        Self {
            name,
            context: 0,
            init_result: Err(TransportError::DeviceAbsent),
            init_calls: 0,
            start_calls: 0,
            requests: Vec::new(),
            log: Rc::clone(log),
        }
    }

    pub fn present(mut self) -> Self {
        self.init_result = Ok(());
        self
    }

    pub fn failing(mut self, err: TransportError) -> Self {
        self.init_result = Err(err);
        self
    }

    pub fn with_context(mut self, bytes: usize) -> Self {
        self.context = bytes;
        self
    }
}

impl TransportBackend<u32> for ScriptedBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    fn context_size(&self, _device: &DebugDevice<'_>) -> usize {
        self.context
    }

    fn initialize_library(&mut self, _device: &mut DebugDevice<'_>) -> Result<()> {
        self.init_calls += 1;
        self.log.borrow_mut().push(format!("{}.init", self.name));
        self.init_result
    }

    fn is_hardware_supported(&self, _device: &DebugDevice<'_>) -> bool {
        self.init_result.is_ok()
    }

    fn start(&mut self, _device: &mut DebugDevice<'_>) -> Result<()> {
        self.start_calls += 1;
        self.log.borrow_mut().push(format!("{}.start", self.name));
        Ok(())
    }

    fn api_entry(&mut self, request: &mut u32) -> Result<()> {
        self.requests.push(*request);
        *request += 1;
        Ok(())
    }
}

/// Intel Ethernet device descriptor over `memory`.
pub fn intel_nic(device: u16, memory: &mut [u8]) -> DebugDevice<'_> {
    DebugDevice::new(
        PciClass::NETWORK_ETHERNET,
        DeviceKey::new(INTEL_VENDOR_ID, device, INTEL_VENDOR_ID, 0x0001),
    )
    .with_memory(memory)
}

/// Register-level UNDI stand-in that records what it was asked to do.
pub struct FakeUndiHardware {
    pub label: &'static str,
    pub init_result: Result<()>,
    pub executed: Vec<u16>,
    /// Initialise calls after which every further reset fails.
    reset_failure: Option<(usize, BackendFailure)>,
    init_calls: usize,
    log: CallLog,
}

impl FakeUndiHardware {
    pub fn new(label: &'static str, log: &CallLog) -> Self {
        Self {
            label,
            init_result: Ok(()),
            executed: Vec::new(),
            reset_failure: None,
            init_calls: 0,
            log: Rc::clone(log),
        }
    }

    pub fn failing_after(mut self, calls: usize, failure: BackendFailure) -> Self {
        self.reset_failure = Some((calls, failure));
        self
    }
}

impl UndiHardware for FakeUndiHardware {
    fn initialize(&mut self, _device: &mut DebugDevice<'_>) -> Result<()> {
        self.log.borrow_mut().push(format!("{}.hw_init", self.label));
        self.init_calls += 1;
        match self.reset_failure {
            Some((calls, failure)) if self.init_calls > calls => Err(failure.into()),
            _ => self.init_result,
        }
    }

    fn start(&mut self, _device: &mut DebugDevice<'_>) -> Result<()> {
        self.log.borrow_mut().push(format!("{}.hw_start", self.label));
        Ok(())
    }

    fn execute(&mut self, cdb: &mut CommandBlock) {
        self.executed.push(cdb.op_code as u16);
        cdb.complete(UndiStatus::Success);
    }
}
