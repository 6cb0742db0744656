//! Scan target resolution.
//!
//! A scan addresses exactly one host, given as either a literal IP address
//! (IPv4 or IPv6) or a hostname that is resolved through DNS.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use tracing::debug;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// A scan target that has been resolved to an IP address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanTarget {
    /// The original input (hostname or IP string).
    pub original: String,
    /// The resolved IP address.
    pub ip: IpAddr,
}

impl ScanTarget {
    /// Create a new scan target.
    pub fn new(original: impl Into<String>, ip: IpAddr) -> Self {
        Self {
            original: original.into(),
            ip,
        }
    }

    /// Resolve a host string into a target.
    ///
    /// Literal addresses are used as-is. Hostnames go through the system
    /// resolver configuration and the first returned address is used.
    pub async fn resolve(host: &str) -> Result<Self, TargetError> {
        let host = host.trim();

        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(Self::new(host, ip));
        }

        // Bracketed IPv6 literal, as it would appear in a URL.
        if let Some(inner) = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
            if let Ok(ip) = inner.parse::<IpAddr>() {
                return Ok(Self::new(host, ip));
            }
        }

        if !is_valid_hostname(host) {
            return Err(TargetError::InvalidFormat(host.to_string()));
        }

        let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
            debug!(error = %e, "system resolver config unavailable, using defaults");
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });

        let response = resolver
            .lookup_ip(host)
            .await
            .map_err(|e| TargetError::DnsResolutionFailed(host.to_string(), e.to_string()))?;

        let ip = response
            .iter()
            .next()
            .ok_or_else(|| TargetError::NoAddressesFound(host.to_string()))?;

        debug!(host, %ip, "resolved target");
        Ok(Self::new(host, ip))
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.original == self.ip.to_string() {
            write!(f, "{}", self.ip)
        } else {
            write!(f, "{} ({})", self.original, self.ip)
        }
    }
}

/// Error type for target parsing and resolution.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TargetError {
    #[error("invalid target format: {0:?}")]
    InvalidFormat(String),
    #[error("failed to resolve hostname '{0}': {1}")]
    DnsResolutionFailed(String, String),
    #[error("no IP addresses found for hostname '{0}'")]
    NoAddressesFound(String),
}

/// Check if a string is a valid hostname.
fn is_valid_hostname(s: &str) -> bool {
    if s.is_empty() || s.len() > 253 {
        return false;
    }

    // A single trailing dot marks a fully-qualified name.
    let s = s.strip_suffix('.').unwrap_or(s);

    s.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && label.chars().next().is_some_and(|c| c.is_alphanumeric())
            && label.chars().last().is_some_and(|c| c.is_alphanumeric())
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[tokio::test]
    async fn test_resolve_ipv4_literal() {
        let target = ScanTarget::resolve("127.0.0.1").await.unwrap();
        assert_eq!(target.ip, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(target.to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_resolve_ipv6_literal() {
        let target = ScanTarget::resolve("::1").await.unwrap();
        assert_eq!(target.ip, IpAddr::V6(Ipv6Addr::LOCALHOST));

        let bracketed = ScanTarget::resolve("[::1]").await.unwrap();
        assert_eq!(bracketed.ip, IpAddr::V6(Ipv6Addr::LOCALHOST));
    }

    #[tokio::test]
    async fn test_resolve_rejects_garbage() {
        let result = ScanTarget::resolve("not a host!").await;
        assert!(matches!(result, Err(TargetError::InvalidFormat(_))));

        let result = ScanTarget::resolve("").await;
        assert!(matches!(result, Err(TargetError::InvalidFormat(_))));
    }

    #[test]
    fn test_display_with_hostname() {
        let target = ScanTarget::new("example.com", IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34)));
        assert_eq!(target.to_string(), "example.com (93.184.216.34)");
    }

    #[test]
    fn test_valid_hostname() {
        assert!(is_valid_hostname("example.com"));
        assert!(is_valid_hostname("sub.example.com."));
        assert!(is_valid_hostname("my-server"));
        assert!(!is_valid_hostname(""));
        assert!(!is_valid_hostname("-invalid.com"));
        assert!(!is_valid_hostname("a..b"));
    }
}
