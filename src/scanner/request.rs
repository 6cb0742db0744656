//! Scan request configuration.

use crate::banner::BANNER_TIMEOUT;
use crate::error::ScanError;
use crate::types::PortSpec;
use chrono::FixedOffset;
use std::time::Duration;

/// Default per-connection timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

/// Default worker pool size.
pub const DEFAULT_CONCURRENCY: usize = 50;

/// Banner grabbing options for open ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerOptions {
    /// Bounds both the banner connection and its single read.
    pub timeout: Duration,
    /// When set, `Date:` headers are converted to this offset.
    pub reference_offset: Option<FixedOffset>,
}

impl Default for BannerOptions {
    fn default() -> Self {
        Self {
            timeout: BANNER_TIMEOUT,
            reference_offset: None,
        }
    }
}

impl BannerOptions {
    /// Set the banner timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable date header conversion to `offset`.
    pub fn with_date_conversion(mut self, offset: FixedOffset) -> Self {
        self.reference_offset = Some(offset);
        self
    }
}

/// Everything needed to run one scan. Immutable once the scan starts.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// Hostname or literal IP address.
    pub host: String,
    /// Ports to probe.
    pub ports: PortSpec,
    /// Connect timeout per probe.
    pub timeout: Duration,
    /// Maximum number of ports worked on at once.
    pub concurrency: usize,
    /// Banner grabbing; `None` disables it.
    pub banners: Option<BannerOptions>,
}

impl ScanRequest {
    /// Create a request with default timeout, concurrency and banner options.
    pub fn new(host: impl Into<String>, ports: PortSpec) -> Self {
        Self {
            host: host.into(),
            ports,
            timeout: DEFAULT_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
            banners: Some(BannerOptions::default()),
        }
    }

    /// Set the connect timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the worker pool size.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Enable banner grabbing with the given options.
    pub fn with_banners(mut self, options: BannerOptions) -> Self {
        self.banners = Some(options);
        self
    }

    /// Disable banner grabbing.
    pub fn without_banners(mut self) -> Self {
        self.banners = None;
        self
    }

    /// Reject settings that would make the scan hang or never probe.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.concurrency == 0 {
            return Err(ScanError::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(ScanError::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if self.banners.as_ref().is_some_and(|b| b.timeout.is_zero()) {
            return Err(ScanError::InvalidConfig(
                "banner timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = ScanRequest::new("127.0.0.1", PortSpec::Catalog);
        assert_eq!(request.timeout, Duration::from_millis(500));
        assert_eq!(request.concurrency, 50);
        assert_eq!(request.banners, Some(BannerOptions::default()));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        let request = ScanRequest::new("localhost", PortSpec::Catalog)
            .with_timeout(Duration::from_secs(1))
            .with_concurrency(8)
            .with_banners(
                BannerOptions::default()
                    .with_timeout(Duration::from_millis(300))
                    .with_date_conversion(offset),
            );

        assert_eq!(request.concurrency, 8);
        let banners = request.banners.unwrap();
        assert_eq!(banners.timeout, Duration::from_millis(300));
        assert_eq!(banners.reference_offset, Some(offset));
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let base = ScanRequest::new("127.0.0.1", PortSpec::Catalog);

        let request = base.clone().with_concurrency(0);
        assert!(matches!(request.validate(), Err(ScanError::InvalidConfig(_))));

        let request = base.clone().with_timeout(Duration::ZERO);
        assert!(matches!(request.validate(), Err(ScanError::InvalidConfig(_))));

        let request = base.with_banners(BannerOptions::default().with_timeout(Duration::ZERO));
        assert!(matches!(request.validate(), Err(ScanError::InvalidConfig(_))));
    }

    #[test]
    fn test_without_banners() {
        let request = ScanRequest::new("127.0.0.1", PortSpec::Catalog).without_banners();
        assert!(request.banners.is_none());
        assert!(request.validate().is_ok());
    }
}
