//! Core type definitions using newtype patterns for type safety.
//!
//! These types make invalid ports and unresolved targets unrepresentable
//! once a scan begins.

mod port;
mod target;

pub use port::{Port, PortError, PortRange, PortSpec};
pub use target::{ScanTarget, TargetError};
