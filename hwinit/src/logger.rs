//! `log` sink on a 16550 port.
//!
//! Format: `[LEVEL] target: message` followed by CRLF.
//!
//! # Usage
//!
//! ```ignore
//! static LOGGER: SerialLogger<IoPortRegisters> = SerialLogger::new(LevelFilter::Debug);
//!
//! let mut uart = Uart16550::new(unsafe { IoPortRegisters::new(COM1) }, UartConfig::default());
//! uart.initialize_port()?;
//! LOGGER.attach(uart);
//! LOGGER.install()?;
//! ```

use core::fmt::Write;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;

use crate::port::UartRegisters;
use crate::serial::Uart16550;

pub struct SerialLogger<R: UartRegisters> {
    port: Mutex<Option<Uart16550<R>>>,
    max_level: LevelFilter,
}

impl<R: UartRegisters> SerialLogger<R> {
    pub const fn new(max_level: LevelFilter) -> Self {
        Self {
            port: Mutex::new(None),
            max_level,
        }
    }

    /// Hand an initialised port to the logger. Records logged before
    /// this are dropped.
    pub fn attach(&self, uart: Uart16550<R>) {
        *self.port.lock() = Some(uart);
    }

    /// Take the port back, e.g. to hand it to the debugger transport.
    pub fn detach(&self) -> Option<Uart16550<R>> {
        self.port.lock().take()
    }

    pub fn max_level(&self) -> LevelFilter {
        self.max_level
    }
}

impl<R: UartRegisters + Send> SerialLogger<R> {
    /// Register as the global logger. Call once during early init.
    pub fn install(&'static self) -> Result<(), SetLoggerError> {
        log::set_logger(self)?;
        log::set_max_level(self.max_level);
        Ok(())
    }
}

impl<R: UartRegisters + Send> Log for SerialLogger<R> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(uart) = self.port.lock().as_mut() {
            // A stuck transmitter drops the rest of the line.
            let _ = writeln!(
                uart,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}
