//! Banner grabbing for open TCP ports.
//!
//! Reads whatever a service sends right after the handshake. Grabbing is
//! strictly best-effort: every failure collapses to `None`.

pub mod normalize;

pub use normalize::{normalize, DATE_HEADER};

use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// Maximum bytes read for a banner.
pub const MAX_BANNER_SIZE: usize = 1024;

/// Default timeout for banner grabbing.
pub const BANNER_TIMEOUT: Duration = Duration::from_secs(2);

/// Grab a banner from a TCP port over a fresh connection.
///
/// `read_timeout` bounds both the connect and the single read. Returns
/// `None` if the connection fails, nothing arrives in time, or the decoded
/// text is blank.
pub async fn grab_banner(addr: SocketAddr, read_timeout: Duration) -> Option<String> {
    let stream = match timeout(read_timeout, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            trace!(%addr, error = %e, "banner connect failed");
            return None;
        }
        Err(_) => {
            trace!(%addr, "banner connect timed out");
            return None;
        }
    };

    read_banner(stream, read_timeout).await
}

/// Perform one bounded read on an established stream.
///
/// Takes the stream by value so it is closed when this returns, whatever
/// the outcome.
async fn read_banner(mut stream: TcpStream, read_timeout: Duration) -> Option<String> {
    let mut buffer = [0u8; MAX_BANNER_SIZE];

    match timeout(read_timeout, stream.read(&mut buffer)).await {
        Ok(Ok(n)) if n > 0 => decode_banner(&buffer[..n]),
        Ok(Ok(_)) => {
            trace!("peer closed without sending a banner");
            None
        }
        Ok(Err(e)) => {
            trace!(error = %e, "banner read failed");
            None
        }
        Err(_) => {
            trace!("banner read timed out");
            None
        }
    }
}

/// Decode raw banner bytes, dropping invalid UTF-8 sequences and trimming.
pub fn decode_banner(data: &[u8]) -> Option<String> {
    let mut text = String::with_capacity(data.len());
    for chunk in data.utf8_chunks() {
        text.push_str(chunk.valid());
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
