//! USB Function data types.
//!
//! # Reference
//! Universal Serial Bus Specification 2.0, §9.3 (USB Device Requests),
//! §9.6.6 (Endpoint descriptor)

use super::UsbFnError;

/// Descriptor type code of an endpoint descriptor.
pub const ENDPOINT_DESCRIPTOR_TYPE: u8 = 0x05;
/// Length of an endpoint descriptor.
pub const ENDPOINT_DESCRIPTOR_LEN: usize = 7;
/// Length of a setup packet.
pub const SETUP_PACKET_LEN: usize = 8;

// ═══════════════════════════════════════════════════════════════════════════
// BUS
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UsbBusSpeed {
    Low,
    Full,
    High,
    Super,
}

impl UsbBusSpeed {
    /// Control endpoint max packet size at this speed.
    pub const fn ep0_max_packet(self) -> u16 {
        match self {
            Self::Low => 8,
            Self::Full | Self::High => 64,
            Self::Super => 512,
        }
    }

    /// Largest bulk max packet size allowed at this speed. Zero for
    /// low speed, which has no bulk endpoints.
    pub const fn bulk_max_packet(self) -> u16 {
        match self {
            Self::Low => 0,
            Self::Full => 64,
            Self::High => 512,
            Self::Super => 1024,
        }
    }

    /// Largest `wMaxPacketSize` an endpoint of `ep_type` may declare at
    /// this speed. Zero when the type is not allowed at all.
    pub const fn max_packet(self, ep_type: EndpointType) -> u16 {
        match ep_type {
            EndpointType::Control => self.ep0_max_packet(),
            EndpointType::Bulk => self.bulk_max_packet(),
            EndpointType::Interrupt => match self {
                Self::Low => 8,
                Self::Full => 64,
                Self::High | Self::Super => 1024,
            },
            EndpointType::Isochronous => match self {
                Self::Low => 0,
                Self::Full => 1023,
                Self::High | Self::Super => 1024,
            },
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// ENDPOINTS
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Host to device.
    Out,
    /// Device to host.
    In,
}

/// `bEndpointAddress`: number in bits 3:0, direction in bit 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EndpointAddress(u8);

impl EndpointAddress {
    pub const CONTROL_OUT: Self = Self(0x00);
    pub const CONTROL_IN: Self = Self(0x80);

    /// `number` is masked to four bits.
    pub const fn new(number: u8, direction: Direction) -> Self {
        let dir = match direction {
            Direction::Out => 0x00,
            Direction::In => 0x80,
        };
        Self(dir | (number & 0x0F))
    }

    /// Reserved bits 6:4 are dropped.
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw & 0x8F)
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    pub const fn number(self) -> u8 {
        self.0 & 0x0F
    }

    pub const fn direction(self) -> Direction {
        if self.0 & 0x80 != 0 {
            Direction::In
        } else {
            Direction::Out
        }
    }

    pub const fn is_control(self) -> bool {
        self.number() == 0
    }

    /// Dense index 0..32: OUT endpoints first, then IN.
    pub const fn index(self) -> usize {
        let base = match self.direction() {
            Direction::Out => 0,
            Direction::In => 16,
        };
        base + self.number() as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointType {
    Control,
    Isochronous,
    Bulk,
    Interrupt,
}

impl EndpointType {
    /// Transfer type from `bmAttributes` bits 1:0.
    pub const fn from_attributes(attributes: u8) -> Self {
        match attributes & 0x03 {
            0 => Self::Control,
            1 => Self::Isochronous,
            2 => Self::Bulk,
            _ => Self::Interrupt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub address: EndpointAddress,
    pub ep_type: EndpointType,
    /// Bits 10:0 of `wMaxPacketSize`.
    pub max_packet_size: u16,
    pub interval: u8,
}

impl EndpointDescriptor {
    pub const fn bulk(address: EndpointAddress, max_packet_size: u16) -> Self {
        Self {
            address,
            ep_type: EndpointType::Bulk,
            max_packet_size,
            interval: 0,
        }
    }

    /// Parse a 7-byte endpoint descriptor. Trailing bytes are ignored.
    pub fn parse(bytes: &[u8]) -> Result<Self, UsbFnError> {
        if bytes.len() < ENDPOINT_DESCRIPTOR_LEN {
            return Err(UsbFnError::ShortBuffer {
                expected: ENDPOINT_DESCRIPTOR_LEN,
                actual: bytes.len(),
            });
        }
        if bytes[0] as usize != ENDPOINT_DESCRIPTOR_LEN || bytes[1] != ENDPOINT_DESCRIPTOR_TYPE {
            return Err(UsbFnError::InvalidDescriptor);
        }

        let address = EndpointAddress::from_raw(bytes[2]);
        let ep_type = EndpointType::from_attributes(bytes[3]);
        if address.is_control() || ep_type == EndpointType::Control {
            return Err(UsbFnError::InvalidDescriptor);
        }

        Ok(Self {
            address,
            ep_type,
            max_packet_size: u16::from_le_bytes([bytes[4], bytes[5]]) & 0x07FF,
            interval: bytes[6],
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CONTROL TRANSFERS
// ═══════════════════════════════════════════════════════════════════════════

/// Eight-byte SETUP stage payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupPacket {
    pub request_type: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
    pub length: u16,
}

impl SetupPacket {
    pub fn parse(bytes: &[u8]) -> Result<Self, UsbFnError> {
        if bytes.len() < SETUP_PACKET_LEN {
            return Err(UsbFnError::ShortBuffer {
                expected: SETUP_PACKET_LEN,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            request_type: bytes[0],
            request: bytes[1],
            value: u16::from_le_bytes([bytes[2], bytes[3]]),
            index: u16::from_le_bytes([bytes[4], bytes[5]]),
            length: u16::from_le_bytes([bytes[6], bytes[7]]),
        })
    }

    /// Data stage direction from `bmRequestType` bit 7.
    pub const fn direction(&self) -> Direction {
        if self.request_type & 0x80 != 0 {
            Direction::In
        } else {
            Direction::Out
        }
    }

    pub const fn has_data_stage(&self) -> bool {
        self.length != 0
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════════

/// Controller event returned by polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsbFnEvent {
    /// Nothing pending.
    None,
    Attach,
    Detach,
    BusReset,
    Suspend,
    Resume,
    Speed(UsbBusSpeed),
    Setup(SetupPacket),
    TransferComplete {
        endpoint: EndpointAddress,
        length: usize,
    },
}

impl UsbFnEvent {
    /// Events after which the host must re-enumerate and configure
    /// endpoints again.
    pub const fn drops_configuration(&self) -> bool {
        matches!(self, Self::Detach | Self::BusReset)
    }
}
