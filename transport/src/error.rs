//! Transport error types

use core::fmt::{self, Write};

use heapless::String;

use crate::usbfn::UsbFnError;

pub type Result<T> = core::result::Result<T, TransportError>;

/// Errors surfaced by the dispatch controller and the backends it drives.
///
/// Only [`TransportError::DeviceAbsent`] is recoverable: the controller
/// treats it as "try the next backend". Everything else ends the scan and
/// is handed back to the caller unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The identifiers match no backend (or no table tier).
    #[error("device not present")]
    DeviceAbsent,
    /// Caller-provided context memory is smaller than required.
    #[error("insufficient resources: {required} bytes required, {available} provided")]
    InsufficientResources { required: usize, available: usize },
    /// Malformed device descriptor.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// A backend failed for a reason other than "device absent".
    #[error("backend failure: {0}")]
    Backend(#[from] BackendFailure),
}

/// Backend-internal failures, passed through the controller verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BackendFailure {
    /// Controller reset did not complete.
    #[error("controller reset timed out")]
    ResetTimeout,
    /// MAC address read back as all zeros or all ones.
    #[error("invalid MAC address")]
    InvalidMac,
    /// Register reads returned all ones.
    #[error("device not responding")]
    NotResponding,
    /// Link did not come up.
    #[error("link did not come up")]
    LinkTimeout,
    /// Request is not part of this backend's capability set.
    #[error("request not supported")]
    Unsupported,
    /// No backend has been selected yet.
    #[error("no backend selected")]
    NotSelected,
    /// USB Function layer failure.
    #[error("usb function: {0}")]
    UsbFn(#[from] UsbFnError),
    /// Raw status code reported by a backend.
    #[error("status {0:#010x}")]
    Status(u32),
}

// ═══════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC STRING
// ═══════════════════════════════════════════════════════════════════════════

/// Capacity of the diagnostic string, in bytes.
pub const DIAGNOSTIC_CAPACITY: usize = 64;

/// Short human-readable reason the transport is unusable.
///
/// Set once by the first failure and cleared on eventual success. Messages
/// longer than [`DIAGNOSTIC_CAPACITY`] are truncated.
#[derive(Debug, Default, Clone)]
pub struct Diagnostic {
    text: String<DIAGNOSTIC_CAPACITY>,
}

impl Diagnostic {
    pub const fn new() -> Self {
        Self { text: String::new() }
    }

    /// Record `error` under `stage` unless a message is already present.
    pub fn set(&mut self, stage: &str, error: &TransportError) {
        if !self.text.is_empty() {
            return;
        }
        let mut sink = Truncating(&mut self.text);
        // Truncation is the only failure mode and is acceptable here.
        let _ = write!(sink, "{}: {}", stage, error);
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text.as_str())
    }
}

/// Writes as many whole characters as fit, then drops the rest.
struct Truncating<'a>(&'a mut String<DIAGNOSTIC_CAPACITY>);

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                return Err(fmt::Error);
            }
        }
        Ok(())
    }
}
