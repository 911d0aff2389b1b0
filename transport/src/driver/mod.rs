//! Backend abstraction module.
//!
//! Provides the `TransportBackend` trait and the Intel UNDI families.
//!
//! # Reference
//! UEFI Specification 2.10, Appendix E (UNDI)

pub mod intel;
pub mod traits;
pub mod undi;

// Re-exports
pub use intel::{IntelFamily, IntelUndi, UndiHardware};
pub use traits::TransportBackend;
pub use undi::{CommandBlock, UndiOpcode, UndiState, UndiStatus};
