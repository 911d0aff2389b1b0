//! In-memory 16550 register file for tests.

use std::collections::VecDeque;

use crate::port::UartRegisters;
use crate::serial::{reg, LineControl, LineStatus};

/// Models DLAB banking, the scratch register and the line status register.
#[derive(Debug, Default)]
pub struct MockRegisters {
    pub absent: bool,
    pub ier: u8,
    pub fcr: u8,
    pub lcr: u8,
    pub mcr: u8,
    pub scr: u8,
    pub dll: u8,
    pub dlm: u8,
    /// Bytes waiting to be read from the receive buffer.
    pub rx: VecDeque<u8>,
    /// Bytes written to the transmit holding register.
    pub tx: Vec<u8>,
    /// LSR error bits reported (and cleared) by the next LSR read.
    pub pending_errors: u8,
    /// LSR reads that report the transmitter full before it drains.
    pub tx_busy_polls: usize,
}

impl MockRegisters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nothing decodes the address: reads float high, writes vanish.
    pub fn absent() -> Self {
        Self {
            absent: true,
            ..Self::default()
        }
    }

    pub fn divisor(&self) -> u16 {
        u16::from_le_bytes([self.dll, self.dlm])
    }

    fn dlab(&self) -> bool {
        self.lcr & LineControl::DLAB.bits() != 0
    }

    fn line_status(&mut self) -> u8 {
        let mut status = LineStatus::from_bits_retain(self.pending_errors);
        self.pending_errors = 0;
        if !self.rx.is_empty() {
            status |= LineStatus::DATA_READY;
        }
        if self.tx_busy_polls > 0 {
            self.tx_busy_polls -= 1;
        } else {
            status |= LineStatus::THR_EMPTY | LineStatus::TX_EMPTY;
        }
        status.bits()
    }
}

impl UartRegisters for MockRegisters {
    fn read(&mut self, register: u8) -> u8 {
        if self.absent {
            return 0xFF;
        }
        match register {
            reg::DATA if self.dlab() => self.dll,
            reg::DATA => self.rx.pop_front().unwrap_or(0),
            reg::IER if self.dlab() => self.dlm,
            reg::IER => self.ier,
            reg::FCR => 0x01,
            reg::LCR => self.lcr,
            reg::MCR => self.mcr,
            reg::LSR => self.line_status(),
            reg::MSR => 0xB0,
            reg::SCR => self.scr,
            _ => 0xFF,
        }
    }

    fn write(&mut self, register: u8, value: u8) {
        if self.absent {
            return;
        }
        match register {
            reg::DATA if self.dlab() => self.dll = value,
            reg::DATA => self.tx.push(value),
            reg::IER if self.dlab() => self.dlm = value,
            reg::IER => self.ier = value,
            reg::FCR => self.fcr = value,
            reg::LCR => self.lcr = value,
            reg::MCR => self.mcr = value,
            reg::SCR => self.scr = value,
            _ => {}
        }
    }
}
