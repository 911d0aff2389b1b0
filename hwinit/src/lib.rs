//! KdLink serial hardware layer
//!
//! 16550 UART adapter for the kernel debugger's serial transport, and a
//! `log` sink that writes to the same kind of port.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐     ┌──────────────────────┐
//! │ SerialLogger (log)   │     │ debugger transport   │
//! └──────────┬───────────┘     └──────────┬───────────┘
//!            ▼                            ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                  Uart16550<R>                       │
//! │  detect, baud, 8N1, FIFO, polled RX/TX, D0/D3       │
//! └─────────────────────────┬───────────────────────────┘
//!                           ▼
//!          IoPortRegisters (x86_64) | MmioRegisters
//! ```
//!
//! # What This Crate Does NOT Do
//!
//! - Interrupt-driven I/O
//! - Hardware flow control

#![cfg_attr(not(test), no_std)]

pub mod logger;
pub mod port;
pub mod serial;

#[cfg(test)]
mod testing;

pub use logger::SerialLogger;
#[cfg(target_arch = "x86_64")]
pub use port::IoPortRegisters;
pub use port::{MmioRegisters, UartRegisters, COM1, COM2};
pub use serial::{Uart16550, UartConfig, UartError};
