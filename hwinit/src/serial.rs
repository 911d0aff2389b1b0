//! 16550 UART debug transport.
//!
//! Polled, no interrupts, no buffering. Register access goes through
//! [`UartRegisters`] so the same driver runs on COM ports and on
//! memory-mapped PCI/SoC UARTs.
//!
//! # Usage
//!
//! ```ignore
//! use kdlink_hwinit::port::{IoPortRegisters, COM1};
//! use kdlink_hwinit::serial::{Uart16550, UartConfig};
//!
//! let regs = unsafe { IoPortRegisters::new(COM1) };
//! let mut uart = Uart16550::new(regs, UartConfig::default());
//! uart.initialize_port()?;
//! uart.put_byte(b'K', true)?;
//! ```
//!
//! # Reference
//! TI PC16550D Universal Asynchronous Receiver/Transmitter with FIFOs

use core::fmt;

use bitflags::bitflags;

use crate::port::UartRegisters;

// ═══════════════════════════════════════════════════════════════════════════
// REGISTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Register indices.
pub mod reg {
    /// Receive buffer (read) / transmit holding (write). Divisor low with DLAB.
    pub const DATA: u8 = 0;
    /// Interrupt enable. Divisor high with DLAB.
    pub const IER: u8 = 1;
    /// FIFO control (write).
    pub const FCR: u8 = 2;
    pub const LCR: u8 = 3;
    pub const MCR: u8 = 4;
    pub const LSR: u8 = 5;
    pub const MSR: u8 = 6;
    pub const SCR: u8 = 7;

    pub const DLL: u8 = DATA;
    pub const DLM: u8 = IER;
}

bitflags! {
    /// Line status register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LineStatus: u8 {
        const DATA_READY = 1 << 0;
        const OVERRUN = 1 << 1;
        const PARITY = 1 << 2;
        const FRAMING = 1 << 3;
        const BREAK = 1 << 4;
        const THR_EMPTY = 1 << 5;
        const TX_EMPTY = 1 << 6;
        const FIFO_ERROR = 1 << 7;

        const ERRORS = Self::OVERRUN.bits()
            | Self::PARITY.bits()
            | Self::FRAMING.bits()
            | Self::BREAK.bits();
    }
}

bitflags! {
    /// Line control register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LineControl: u8 {
        const WORD_5 = 0b00;
        const WORD_6 = 0b01;
        const WORD_7 = 0b10;
        const WORD_8 = 0b11;
        const TWO_STOP = 1 << 2;
        const PARITY_ENABLE = 1 << 3;
        const EVEN_PARITY = 1 << 4;
        const STICK_PARITY = 1 << 5;
        const BREAK = 1 << 6;
        const DLAB = 1 << 7;
    }
}

bitflags! {
    /// Modem control register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModemControl: u8 {
        const DTR = 1 << 0;
        const RTS = 1 << 1;
        const OUT1 = 1 << 2;
        const OUT2 = 1 << 3;
        const LOOPBACK = 1 << 4;
    }
}

bitflags! {
    /// FIFO control register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FifoControl: u8 {
        const ENABLE = 1 << 0;
        const CLEAR_RX = 1 << 1;
        const CLEAR_TX = 1 << 2;
        const TRIGGER_14 = 0b11 << 6;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════

/// Standard PC UART reference clock.
pub const DEFAULT_CLOCK_HZ: u32 = 1_843_200;
pub const DEFAULT_BAUD: u32 = 115_200;

/// LSR polls before `put_byte` gives up.
pub const TX_SPIN_LIMIT: usize = 100_000;

const SCRATCH_PATTERNS: [u8; 2] = [0x5A, 0xA5];

/// Port configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartConfig {
    pub baud_rate: u32,
    /// Input clock; PCI and SoC UARTs often differ from the PC value.
    pub clock_hz: u32,
    pub fifo: bool,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD,
            clock_hz: DEFAULT_CLOCK_HZ,
            fifo: true,
        }
    }
}

/// UART errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UartError {
    /// Scratch register did not hold a value, or the bus floats.
    #[error("no UART at this address")]
    NotPresent,
    /// Divisor for this baud rate is zero or does not fit 16 bits.
    #[error("baud rate {0} not reachable from the reference clock")]
    InvalidBaud(u32),
    /// Receive error reported in the line status register.
    #[error("line error: {0:?}")]
    LineError(LineStatus),
}

/// Divisor latch value for `baud` at `clock_hz`.
pub fn divisor_for(clock_hz: u32, baud: u32) -> Result<u16, UartError> {
    if baud == 0 {
        return Err(UartError::InvalidBaud(baud));
    }
    let divisor = clock_hz / baud.saturating_mul(16);
    match u16::try_from(divisor) {
        Ok(value) if value != 0 => Ok(value),
        _ => Err(UartError::InvalidBaud(baud)),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// DRIVER
// ═══════════════════════════════════════════════════════════════════════════

pub struct Uart16550<R: UartRegisters> {
    regs: R,
    config: UartConfig,
}

impl<R: UartRegisters> Uart16550<R> {
    pub const fn new(regs: R, config: UartConfig) -> Self {
        Self { regs, config }
    }

    pub fn config(&self) -> &UartConfig {
        &self.config
    }

    pub fn into_registers(self) -> R {
        self.regs
    }

    /// Detect the UART and program it: baud, 8N1, FIFO, DTR/RTS.
    pub fn initialize_port(&mut self) -> Result<(), UartError> {
        self.detect()?;
        self.program()?;
        log::debug!(
            "uart: {} baud, fifo {}",
            self.config.baud_rate,
            if self.config.fifo { "on" } else { "off" }
        );
        Ok(())
    }

    /// Re-program the divisor. The line settings are preserved.
    pub fn set_baud(&mut self, baud: u32) -> Result<(), UartError> {
        let divisor = divisor_for(self.config.clock_hz, baud)?;
        let lcr = LineControl::from_bits_retain(self.regs.read(reg::LCR));

        self.regs.write(reg::LCR, (lcr | LineControl::DLAB).bits());
        self.regs.write(reg::DLL, divisor as u8);
        self.regs.write(reg::DLM, (divisor >> 8) as u8);
        self.regs.write(reg::LCR, (lcr - LineControl::DLAB).bits());

        self.config.baud_rate = baud;
        Ok(())
    }

    pub fn line_status(&mut self) -> LineStatus {
        LineStatus::from_bits_retain(self.regs.read(reg::LSR))
    }

    pub fn rx_ready(&mut self) -> bool {
        self.line_status().contains(LineStatus::DATA_READY)
    }

    /// Next received byte, `Ok(None)` when nothing is waiting.
    ///
    /// A byte that arrives with a line error is consumed and dropped.
    pub fn get_byte(&mut self) -> Result<Option<u8>, UartError> {
        let status = self.line_status();
        let errors = status & LineStatus::ERRORS;
        if !errors.is_empty() {
            if status.contains(LineStatus::DATA_READY) {
                self.regs.read(reg::DATA);
            }
            return Err(UartError::LineError(errors));
        }
        if !status.contains(LineStatus::DATA_READY) {
            return Ok(None);
        }
        Ok(Some(self.regs.read(reg::DATA)))
    }

    /// Queue one byte. With `busy_wait`, poll up to [`TX_SPIN_LIMIT`]
    /// times for room; otherwise check once. `Ok(false)` when the
    /// transmitter stayed full.
    pub fn put_byte(&mut self, byte: u8, busy_wait: bool) -> Result<bool, UartError> {
        let attempts = if busy_wait { TX_SPIN_LIMIT } else { 1 };
        for _ in 0..attempts {
            let raw = self.regs.read(reg::LSR);
            if raw == 0xFF {
                return Err(UartError::NotPresent);
            }
            if LineStatus::from_bits_retain(raw).contains(LineStatus::THR_EMPTY) {
                self.regs.write(reg::DATA, byte);
                return Ok(true);
            }
            core::hint::spin_loop();
        }
        Ok(false)
    }

    /// Write every byte, waiting as needed. Fails on the first byte the
    /// transmitter does not take.
    pub fn put_bytes(&mut self, bytes: &[u8]) -> Result<usize, UartError> {
        for (sent, &byte) in bytes.iter().enumerate() {
            if !self.put_byte(byte, true)? {
                return Ok(sent);
            }
        }
        Ok(bytes.len())
    }

    /// Power-up: restore the saved configuration.
    pub fn set_power_d0(&mut self) -> Result<(), UartError> {
        self.program()
    }

    /// Power-down: quiesce interrupts and drop the modem lines so the
    /// host sees the link go away.
    pub fn set_power_d3(&mut self) {
        self.regs.write(reg::IER, 0);
        self.regs.write(reg::MCR, 0);
    }

    fn detect(&mut self) -> Result<(), UartError> {
        for pattern in SCRATCH_PATTERNS {
            self.regs.write(reg::SCR, pattern);
            if self.regs.read(reg::SCR) != pattern {
                return Err(UartError::NotPresent);
            }
        }
        Ok(())
    }

    fn program(&mut self) -> Result<(), UartError> {
        self.regs.write(reg::IER, 0);
        self.regs.write(reg::LCR, LineControl::WORD_8.bits());
        self.set_baud(self.config.baud_rate)?;

        let fifo = if self.config.fifo {
            FifoControl::ENABLE
                | FifoControl::CLEAR_RX
                | FifoControl::CLEAR_TX
                | FifoControl::TRIGGER_14
        } else {
            FifoControl::empty()
        };
        self.regs.write(reg::FCR, fifo.bits());

        let mcr = ModemControl::DTR | ModemControl::RTS | ModemControl::OUT2;
        self.regs.write(reg::MCR, mcr.bits());
        Ok(())
    }
}

impl<R: UartRegisters> fmt::Write for Uart16550<R> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            if byte == b'\n' && !matches!(self.put_byte(b'\r', true), Ok(true)) {
                return Err(fmt::Error);
            }
            if !matches!(self.put_byte(byte, true), Ok(true)) {
                return Err(fmt::Error);
            }
        }
        Ok(())
    }
}
