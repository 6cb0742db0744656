//! Transport abstraction and result types.
//!
//! The coordinator only talks to the network through [`Transport`], which
//! lets tests swap in an in-memory fake.

use crate::services;
use crate::types::Port;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

/// Status of a reported port.
///
/// Only open ports are ever reported, so this has a single variant. It is
/// kept as an enum so the serialized shape carries an explicit `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    /// Port completed a TCP handshake.
    Open,
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
        }
    }
}

/// One open port found by a scan.
///
/// Field order matches the export column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub port: Port,
    pub service: String,
    pub status: PortStatus,
    /// Banner text; `None` when nothing was read.
    pub banner: Option<String>,
}

impl ScanResult {
    /// Create a result for an open port, naming it from the service catalog.
    pub fn open(port: Port, banner: Option<String>) -> Self {
        Self {
            port,
            service: services::lookup(port.as_u16()).to_string(),
            status: PortStatus::Open,
            banner,
        }
    }
}

/// Tagged verdict of a single connect attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Handshake completed.
    Open,
    /// Peer answered with a reset.
    Refused,
    /// Nothing answered within the timeout.
    TimedOut,
    /// Host or network unreachable.
    Unreachable,
    /// Local descriptor limits hit; worth retrying later.
    Exhausted,
    /// Any other transport error.
    Failed(io::ErrorKind),
}

impl ProbeOutcome {
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Refused => write!(f, "refused"),
            Self::TimedOut => write!(f, "timed out"),
            Self::Unreachable => write!(f, "unreachable"),
            Self::Exhausted => write!(f, "resources exhausted"),
            Self::Failed(kind) => write!(f, "failed ({})", kind),
        }
    }
}

/// Network operations the scan coordinator depends on.
///
/// Implementations must never panic on network errors and must release any
/// connection they open before returning.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Attempt one TCP connection to `addr`, bounded by `timeout`.
    async fn probe(&self, addr: SocketAddr, timeout: Duration) -> ProbeOutcome;

    /// Open a fresh connection and read an initial banner, best-effort.
    async fn grab_banner(&self, addr: SocketAddr, timeout: Duration) -> Option<String>;
}
