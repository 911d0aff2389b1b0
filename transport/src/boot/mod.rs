//! Boot integration module.
//!
//! Backend selection for the debugger transport, run once by the boot
//! sequence and re-entered on retry-without-reset paths.

pub mod dispatch;
pub mod probe;

// Re-exports
pub use dispatch::{BackendDispatch, DevicePolicy, DispatchState};
pub use probe::{detect_transport, DetectedTransport, INTEL_UNDI_POLICY, USBFN_POLICY};
