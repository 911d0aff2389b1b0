//! Intel UNDI backends.
//!
//! One backend per NIC generation. They are mutually exclusive: a device
//! ID belongs to exactly one family, and the other families report the
//! device as absent.
//!
//! # Dispatch Order
//! 1. i40e (40GbE)
//! 2. ixgbe (10GbE)
//! 3. e1000 (1GbE)
//!
//! # Usage
//!
//! ```ignore
//! use kdlink_transport::driver::intel::{IntelFamily, IntelUndi};
//!
//! let mut gbe = IntelUndi::new(IntelFamily::E1000, e1000_hw);
//! let mut xgbe = IntelUndi::new(IntelFamily::Ixgbe, ixgbe_hw);
//! let mut backends: [&mut dyn TransportBackend<CommandBlock>; 2] = [&mut xgbe, &mut gbe];
//! ```

pub mod e1000;
pub mod i40e;
pub mod ixgbe;

use log::{debug, info};

use super::traits::TransportBackend;
use super::undi::{CommandBlock, UndiOpcode, UndiState, UndiStatus};
use crate::branding::BrandingTable;
use crate::error::{BackendFailure, Result, TransportError};
use crate::pci::types::{DebugDevice, DeviceKey};

// ═══════════════════════════════════════════════════════════════════════════
// FAMILIES
// ═══════════════════════════════════════════════════════════════════════════

/// Intel NIC generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntelFamily {
    I40e,
    Ixgbe,
    E1000,
}

impl IntelFamily {
    /// Every family, fastest first.
    pub const ALL: [IntelFamily; 3] = [Self::I40e, Self::Ixgbe, Self::E1000];

    /// Families compiled into this build, fastest first.
    pub fn linked() -> impl Iterator<Item = IntelFamily> {
        Self::ALL.into_iter().filter(|family| family.is_linked())
    }

    pub const fn is_linked(self) -> bool {
        match self {
            Self::I40e => cfg!(feature = "i40e"),
            Self::Ixgbe => cfg!(feature = "ixgbe"),
            Self::E1000 => cfg!(feature = "e1000"),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::I40e => "i40e",
            Self::Ixgbe => "ixgbe",
            Self::E1000 => "e1000",
        }
    }

    pub const fn branding(self) -> BrandingTable {
        match self {
            Self::I40e => i40e::BRANDING,
            Self::Ixgbe => ixgbe::BRANDING,
            Self::E1000 => e1000::BRANDING,
        }
    }

    /// True when this family is linked and its table names the device ID
    /// explicitly.
    pub fn supports(self, key: &DeviceKey) -> bool {
        self.is_linked()
            && self
                .branding()
                .is_vendor_device_supported(key.vendor, key.device)
    }

    /// Context bytes this family needs for `device`; zero when it cannot
    /// drive it or is not linked.
    pub fn context_size(self, device: &DebugDevice<'_>) -> usize {
        if !self.supports(&device.key) {
            return 0;
        }
        match self {
            Self::I40e => i40e::CONTEXT_SIZE,
            Self::Ixgbe => ixgbe::CONTEXT_SIZE,
            Self::E1000 => e1000::CONTEXT_SIZE,
        }
    }

    /// Family whose table names the device, if any is linked.
    pub fn for_device(key: &DeviceKey) -> Option<IntelFamily> {
        Self::linked().find(|family| family.supports(key))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// HARDWARE SEAM
// ═══════════════════════════════════════════════════════════════════════════

/// Register-level driver for one family.
///
/// Implemented outside this crate; the UNDI adapter only sequences calls
/// and tracks interface state.
pub trait UndiHardware {
    /// Reset the controller and read the MAC. Called once per library
    /// initialisation, only for devices the family supports.
    fn initialize(&mut self, device: &mut DebugDevice<'_>) -> Result<()>;

    /// Enable the receive and transmit units.
    fn start(&mut self, device: &mut DebugDevice<'_>) -> Result<()>;

    /// Execute a command that passed the state checks. Completes `cdb`.
    fn execute(&mut self, cdb: &mut CommandBlock);
}

// ═══════════════════════════════════════════════════════════════════════════
// UNDI ADAPTER
// ═══════════════════════════════════════════════════════════════════════════

/// One Intel family exposed as a transport backend.
pub struct IntelUndi<H: UndiHardware> {
    family: IntelFamily,
    hw: H,
    state: UndiState,
    initialized: bool,
}

impl<H: UndiHardware> IntelUndi<H> {
    pub fn new(family: IntelFamily, hw: H) -> Self {
        Self {
            family,
            hw,
            state: UndiState::Stopped,
            initialized: false,
        }
    }

    pub fn family(&self) -> IntelFamily {
        self.family
    }

    pub fn state(&self) -> UndiState {
        self.state
    }

    pub fn hardware(&self) -> &H {
        &self.hw
    }

    /// State gate for one command. `None` means the command may run.
    fn gate(&self, op: UndiOpcode) -> Option<UndiStatus> {
        use UndiOpcode::*;

        if self.state == UndiState::Stopped && !op.allowed_when_stopped() {
            return Some(UndiStatus::NotStarted);
        }
        match op {
            GetState | GetInitInfo | GetConfigInfo => None,
            Start if self.state != UndiState::Stopped => Some(UndiStatus::AlreadyStarted),
            Stop if self.state == UndiState::Initialized => Some(UndiStatus::NotShutdown),
            Initialize if self.state == UndiState::Initialized => {
                Some(UndiStatus::AlreadyInitialized)
            }
            Start | Stop | Initialize => None,
            _ if self.state != UndiState::Initialized => Some(UndiStatus::NotInitialized),
            _ => None,
        }
    }
}

impl<H: UndiHardware> TransportBackend<CommandBlock> for IntelUndi<H> {
    fn name(&self) -> &'static str {
        self.family.name()
    }

    fn context_size(&self, device: &DebugDevice<'_>) -> usize {
        self.family.context_size(device)
    }

    fn initialize_library(&mut self, device: &mut DebugDevice<'_>) -> Result<()> {
        if !self.family.supports(&device.key) {
            debug!("{}: {} not in table", self.family.name(), device.key);
            return Err(TransportError::DeviceAbsent);
        }

        // A failed reset leaves the interface unusable until the next
        // successful initialise.
        self.initialized = false;
        self.state = UndiState::Stopped;
        self.hw.initialize(device)?;
        self.initialized = true;

        let function = device.function;
        match self
            .family
            .branding()
            .display_name_for_function(&mut device.key, function)
        {
            Some(name) => info!("{}: {} [{}]", self.family.name(), name, device.key),
            None => info!("{}: unbranded device {}", self.family.name(), device.key),
        }
        Ok(())
    }

    fn is_hardware_supported(&self, device: &DebugDevice<'_>) -> bool {
        self.family.supports(&device.key)
    }

    fn start(&mut self, device: &mut DebugDevice<'_>) -> Result<()> {
        if !self.initialized {
            return Err(BackendFailure::NotResponding.into());
        }
        if self.state != UndiState::Stopped {
            return Ok(());
        }
        self.hw.start(device)?;
        self.state = UndiState::Started;
        Ok(())
    }

    fn api_entry(&mut self, cdb: &mut CommandBlock) -> Result<()> {
        if !self.initialized {
            cdb.complete(UndiStatus::InvalidUndi);
            return Err(BackendFailure::Status(UndiStatus::InvalidUndi as u32).into());
        }

        if let Some(status) = self.gate(cdb.op_code) {
            debug!("{}: {:?} rejected: {:?}", self.family.name(), cdb.op_code, status);
            cdb.complete(status);
            return Ok(());
        }

        match cdb.op_code {
            UndiOpcode::GetState => {
                cdb.stat_flags = self.state.flags();
                cdb.complete(UndiStatus::Success);
            }
            UndiOpcode::Start => {
                cdb.complete(UndiStatus::Success);
                self.state = UndiState::Started;
            }
            UndiOpcode::Stop => {
                cdb.complete(UndiStatus::Success);
                self.state = UndiState::Stopped;
            }
            op => {
                self.hw.execute(cdb);
                if cdb.succeeded() {
                    match op {
                        UndiOpcode::Initialize => self.state = UndiState::Initialized,
                        UndiOpcode::Shutdown => self.state = UndiState::Started,
                        _ => {}
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pci::ids::INTEL_VENDOR_ID;
    use crate::pci::types::PciClass;

    #[derive(Default)]
    struct FakeHw {
        init_calls: usize,
        executed: usize,
        fail_init: Option<BackendFailure>,
    }

    impl UndiHardware for FakeHw {
        fn initialize(&mut self, _device: &mut DebugDevice<'_>) -> Result<()> {
            self.init_calls += 1;
            match self.fail_init {
                Some(failure) => Err(failure.into()),
                None => Ok(()),
            }
        }

        fn start(&mut self, _device: &mut DebugDevice<'_>) -> Result<()> {
            Ok(())
        }

        fn execute(&mut self, cdb: &mut CommandBlock) {
            self.executed += 1;
            cdb.complete(UndiStatus::Success);
        }
    }

    fn device(device_id: u16) -> DebugDevice<'static> {
        DebugDevice::new(
            PciClass::NETWORK_ETHERNET,
            DeviceKey::new(INTEL_VENDOR_ID, device_id, INTEL_VENDOR_ID, 0x0001),
        )
    }

    #[test]
    fn test_families_are_disjoint() {
        for family in IntelFamily::ALL {
            for record in family.branding().records() {
                let key = record.key;
                if key.device == crate::WILDCARD {
                    continue;
                }
                let owners = IntelFamily::ALL
                    .iter()
                    .filter(|f| f.branding().is_vendor_device_supported(key.vendor, key.device))
                    .count();
                assert_eq!(owners, 1, "{:04x} claimed by {} families", key.device, owners);
            }
        }
    }

    #[test]
    fn test_tables_are_well_formed() {
        for family in IntelFamily::ALL {
            let records = family.branding().records();
            assert!(records.last().is_some_and(|r| r.invalid), "{}", family.name());
            for (i, a) in records.iter().enumerate() {
                for b in &records[i + 1..] {
                    assert!(a.key != b.key, "{} duplicates {}", family.name(), a.key);
                }
            }
        }
    }

    #[test]
    fn test_unlinked_family_reports_absent() {
        for (family, device_id) in [
            (IntelFamily::I40e, 0x1583),
            (IntelFamily::Ixgbe, 0x10FB),
            (IntelFamily::E1000, 0x1533),
        ] {
            let mut undi = IntelUndi::new(family, FakeHw::default());
            let mut dev = device(device_id);
            if family.is_linked() {
                assert!(undi.context_size(&dev) > 0);
                assert!(undi.initialize_library(&mut dev).is_ok());
            } else {
                assert_eq!(undi.context_size(&dev), 0);
                assert!(!undi.is_hardware_supported(&dev));
                assert_eq!(undi.initialize_library(&mut dev), Err(TransportError::DeviceAbsent));
                assert_eq!(undi.hardware().init_calls, 0);
            }
        }
    }

    #[cfg(not(feature = "i40e"))]
    #[test]
    fn test_i40e_absent_without_feature() {
        let dev = device(0x1583);
        assert_eq!(IntelFamily::I40e.context_size(&dev), 0);
        assert_eq!(IntelFamily::for_device(&dev.key), None);
    }

    #[test]
    fn test_failed_reinit_stops_interface() {
        let mut undi = IntelUndi::new(IntelFamily::E1000, FakeHw::default());
        let mut dev = device(0x1533);
        undi.initialize_library(&mut dev).unwrap();
        undi.start(&mut dev).unwrap();
        let mut cdb = CommandBlock::new(UndiOpcode::Initialize);
        undi.api_entry(&mut cdb).unwrap();
        assert_eq!(undi.state(), UndiState::Initialized);

        undi.hw.fail_init = Some(BackendFailure::ResetTimeout);
        assert!(undi.initialize_library(&mut dev).is_err());
        assert_eq!(undi.state(), UndiState::Stopped);
        assert_eq!(undi.start(&mut dev), Err(BackendFailure::NotResponding.into()));

        let mut cdb = CommandBlock::new(UndiOpcode::Transmit);
        assert!(undi.api_entry(&mut cdb).is_err());
        assert_eq!(cdb.stat_code, UndiStatus::InvalidUndi);
        assert_eq!(undi.hardware().executed, 1);
    }

    #[test]
    fn test_context_size_zero_when_unsupported() {
        let gbe = device(0x1533);
        assert_eq!(IntelFamily::E1000.context_size(&gbe), e1000::CONTEXT_SIZE);
        assert_eq!(IntelFamily::Ixgbe.context_size(&gbe), 0);
        assert_eq!(IntelFamily::I40e.context_size(&gbe), 0);
    }

    #[test]
    fn test_linked_order() {
        let mut previous = None;
        for family in IntelFamily::linked() {
            let index = IntelFamily::ALL.iter().position(|f| *f == family);
            assert!(index > previous);
            previous = index;
        }
    }

    #[test]
    fn test_initialize_absent_for_other_family() {
        let mut undi = IntelUndi::new(IntelFamily::Ixgbe, FakeHw::default());
        let mut dev = device(0x1533);
        assert_eq!(undi.initialize_library(&mut dev), Err(TransportError::DeviceAbsent));
        assert_eq!(undi.hardware().init_calls, 0);
    }

    #[test]
    fn test_initialize_failure_is_passed_through() {
        let hw = FakeHw {
            fail_init: Some(BackendFailure::ResetTimeout),
            ..FakeHw::default()
        };
        let mut undi = IntelUndi::new(IntelFamily::E1000, hw);
        let mut dev = device(0x1533);
        assert_eq!(
            undi.initialize_library(&mut dev),
            Err(TransportError::Backend(BackendFailure::ResetTimeout))
        );
    }

    #[test]
    fn test_initialize_keeps_key_after_branding() {
        let mut undi = IntelUndi::new(IntelFamily::E1000, FakeHw::default());
        let mut dev = device(0x1521).with_function(2);
        dev.key.subdevice = 0x5002;
        assert!(undi.initialize_library(&mut dev).is_ok());
        assert_eq!(dev.key.subdevice, 0x5002);
    }

    #[test]
    fn test_command_before_start_not_started() {
        let mut undi = IntelUndi::new(IntelFamily::E1000, FakeHw::default());
        let mut dev = device(0x1533);
        undi.initialize_library(&mut dev).unwrap();

        let mut cdb = CommandBlock::new(UndiOpcode::Transmit);
        undi.api_entry(&mut cdb).unwrap();
        assert_eq!(cdb.stat_code, UndiStatus::NotStarted);
        assert_eq!(undi.hardware().executed, 0);
    }

    #[test]
    fn test_undi_state_sequence() {
        let mut undi = IntelUndi::new(IntelFamily::E1000, FakeHw::default());
        let mut dev = device(0x1533);
        undi.initialize_library(&mut dev).unwrap();
        undi.start(&mut dev).unwrap();
        assert_eq!(undi.state(), UndiState::Started);

        let mut cdb = CommandBlock::new(UndiOpcode::Start);
        undi.api_entry(&mut cdb).unwrap();
        assert_eq!(cdb.stat_code, UndiStatus::AlreadyStarted);

        let mut cdb = CommandBlock::new(UndiOpcode::Receive);
        undi.api_entry(&mut cdb).unwrap();
        assert_eq!(cdb.stat_code, UndiStatus::NotInitialized);

        let mut cdb = CommandBlock::new(UndiOpcode::Initialize);
        undi.api_entry(&mut cdb).unwrap();
        assert!(cdb.succeeded());
        assert_eq!(undi.state(), UndiState::Initialized);

        let mut cdb = CommandBlock::new(UndiOpcode::Stop);
        undi.api_entry(&mut cdb).unwrap();
        assert_eq!(cdb.stat_code, UndiStatus::NotShutdown);

        let mut cdb = CommandBlock::new(UndiOpcode::GetState);
        undi.api_entry(&mut cdb).unwrap();
        assert_eq!(cdb.stat_flags, UndiState::Initialized.flags());

        let mut cdb = CommandBlock::new(UndiOpcode::Shutdown);
        undi.api_entry(&mut cdb).unwrap();
        assert_eq!(undi.state(), UndiState::Started);
        assert_eq!(undi.hardware().executed, 2);
    }

    #[test]
    fn test_api_entry_before_library_init() {
        let mut undi = IntelUndi::new(IntelFamily::E1000, FakeHw::default());
        let mut cdb = CommandBlock::new(UndiOpcode::GetState);
        assert!(undi.api_entry(&mut cdb).is_err());
        assert_eq!(cdb.stat_code, UndiStatus::InvalidUndi);
    }
}
