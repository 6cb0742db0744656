//! TCP connect transport.
//!
//! Performs standard TCP connect probes using the operating system's socket
//! API. Completes the full handshake, so no special privileges are needed.

use crate::banner;
use crate::scanner::traits::{ProbeOutcome, Transport};
use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// [`Transport`] backed by real TCP sockets.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnectTransport;

impl TcpConnectTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for TcpConnectTransport {
    async fn probe(&self, addr: SocketAddr, connect_timeout: Duration) -> ProbeOutcome {
        probe_outcome(addr, connect_timeout).await
    }

    async fn grab_banner(&self, addr: SocketAddr, read_timeout: Duration) -> Option<String> {
        banner::grab_banner(addr, read_timeout).await
    }
}

/// Returns `true` iff a TCP handshake with `addr` completes within `connect_timeout`.
pub async fn probe(addr: SocketAddr, connect_timeout: Duration) -> bool {
    probe_outcome(addr, connect_timeout).await.is_open()
}

/// Attempt one connection and classify the result.
///
/// The probe connection is closed before returning on every path.
pub async fn probe_outcome(addr: SocketAddr, connect_timeout: Duration) -> ProbeOutcome {
    let outcome = match timeout(connect_timeout, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            ProbeOutcome::Open
        }
        Ok(Err(e)) => classify_connect_error(&e),
        Err(_) => ProbeOutcome::TimedOut,
    };

    trace!(%addr, %outcome, "probe finished");
    outcome
}

/// Map a connect error onto a probe outcome.
pub fn classify_connect_error(e: &io::Error) -> ProbeOutcome {
    #[cfg(unix)]
    {
        match e.raw_os_error() {
            Some(libc::EMFILE | libc::ENFILE) => return ProbeOutcome::Exhausted,
            Some(libc::EHOSTUNREACH | libc::ENETUNREACH) => return ProbeOutcome::Unreachable,
            _ => {}
        }
    }

    match e.kind() {
        io::ErrorKind::ConnectionRefused => ProbeOutcome::Refused,
        io::ErrorKind::TimedOut => ProbeOutcome::TimedOut,
        kind => ProbeOutcome::Failed(kind),
    }
}
