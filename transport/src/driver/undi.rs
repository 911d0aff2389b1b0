//! UNDI command block.
//!
//! Trimmed-down `PXE_CDB`: opcode, flags and the status fields the API
//! entry fills in. Parameter and data blocks belong to the register-level
//! driver and are not modelled here.
//!
//! # Reference
//! UEFI Specification 2.10, Appendix E.4 (UNDI C Definitions)

/// UNDI operation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum UndiOpcode {
    GetState = 0x0000,
    Start = 0x0001,
    Stop = 0x0002,
    GetInitInfo = 0x0003,
    GetConfigInfo = 0x0004,
    Initialize = 0x0005,
    Reset = 0x0006,
    Shutdown = 0x0007,
    InterruptEnables = 0x0008,
    ReceiveFilters = 0x0009,
    StationAddress = 0x000A,
    Statistics = 0x000B,
    McastIpToMac = 0x000C,
    NvData = 0x000D,
    GetStatus = 0x000E,
    FillHeader = 0x000F,
    Transmit = 0x0010,
    Receive = 0x0011,
}

impl UndiOpcode {
    /// Decode a raw opcode.
    pub fn from_raw(raw: u16) -> Option<Self> {
        Some(match raw {
            0x0000 => Self::GetState,
            0x0001 => Self::Start,
            0x0002 => Self::Stop,
            0x0003 => Self::GetInitInfo,
            0x0004 => Self::GetConfigInfo,
            0x0005 => Self::Initialize,
            0x0006 => Self::Reset,
            0x0007 => Self::Shutdown,
            0x0008 => Self::InterruptEnables,
            0x0009 => Self::ReceiveFilters,
            0x000A => Self::StationAddress,
            0x000B => Self::Statistics,
            0x000C => Self::McastIpToMac,
            0x000D => Self::NvData,
            0x000E => Self::GetStatus,
            0x000F => Self::FillHeader,
            0x0010 => Self::Transmit,
            0x0011 => Self::Receive,
            _ => return None,
        })
    }

    /// Opcodes the UNDI accepts in the Stopped state.
    pub fn allowed_when_stopped(self) -> bool {
        matches!(self, Self::GetState | Self::Start)
    }
}

/// UNDI status codes (`PXE_STATCODE_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum UndiStatus {
    Success = 0x0000,
    InvalidCdb = 0x0001,
    InvalidCpb = 0x0002,
    Busy = 0x0003,
    QueueFull = 0x0004,
    AlreadyStarted = 0x0005,
    NotStarted = 0x0006,
    NotShutdown = 0x0007,
    AlreadyInitialized = 0x0008,
    NotInitialized = 0x0009,
    DeviceFailure = 0x000A,
    NvDataFailure = 0x000B,
    Unsupported = 0x000C,
    BufferFull = 0x000D,
    InvalidParameter = 0x000E,
    InvalidUndi = 0x000F,
    Ipv4NotSupported = 0x0010,
    Ipv6NotSupported = 0x0011,
    NotEnoughMemory = 0x0012,
    NoData = 0x0013,
}

/// UNDI interface state (`PXE_STATFLAGS_GET_STATE_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndiState {
    #[default]
    Stopped,
    Started,
    Initialized,
}

impl UndiState {
    /// Value reported in `stat_flags` by `GetState`.
    pub const fn flags(self) -> u16 {
        match self {
            Self::Stopped => 0x0000,
            Self::Started => 0x0001,
            Self::Initialized => 0x0002,
        }
    }
}

/// Command descriptor block passed through the API entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandBlock {
    pub op_code: UndiOpcode,
    pub op_flags: u16,
    pub stat_code: UndiStatus,
    pub stat_flags: u16,
    pub if_num: u16,
}

impl CommandBlock {
    pub const fn new(op_code: UndiOpcode) -> Self {
        Self {
            op_code,
            op_flags: 0,
            stat_code: UndiStatus::Success,
            stat_flags: 0,
            if_num: 0,
        }
    }

    pub fn complete(&mut self, status: UndiStatus) {
        self.stat_code = status;
    }

    pub fn succeeded(&self) -> bool {
        self.stat_code == UndiStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_round_trip_edges() {
        assert_eq!(UndiOpcode::from_raw(0x0000), Some(UndiOpcode::GetState));
        assert_eq!(UndiOpcode::from_raw(0x0011), Some(UndiOpcode::Receive));
        assert_eq!(UndiOpcode::from_raw(0x0012), None);
        assert_eq!(UndiOpcode::Transmit as u16, 0x0010);
    }

    #[test]
    fn test_stopped_state_gate() {
        assert!(UndiOpcode::GetState.allowed_when_stopped());
        assert!(UndiOpcode::Start.allowed_when_stopped());
        assert!(!UndiOpcode::Initialize.allowed_when_stopped());
        assert!(!UndiOpcode::Transmit.allowed_when_stopped());
    }

    #[test]
    fn test_command_block_completion() {
        let mut cdb = CommandBlock::new(UndiOpcode::Reset);
        assert!(cdb.succeeded());
        cdb.complete(UndiStatus::NotInitialized);
        assert!(!cdb.succeeded());
        assert_eq!(cdb.stat_code as u16, 0x0009);
    }
}
