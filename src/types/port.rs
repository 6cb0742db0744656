//! Port types with validation and parsing.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortRange` and `PortSpec` describe which ports a scan should cover.

use crate::services;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A validated network port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange(u32::from(value)))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl FromStr for Port {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // Parse wide so "70000" reports as out of range rather than malformed.
        let value: u32 = s
            .parse()
            .map_err(|_| PortError::InvalidFormat(s.to_string()))?;
        u16::try_from(value)
            .ok()
            .and_then(Port::new)
            .ok_or(PortError::OutOfRange(value))
    }
}

/// Error type for port parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u32),
    #[error("invalid port number: {0:?}")]
    InvalidFormat(String),
    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidRange(u16, u16),
    #[error("empty port specification")]
    Empty,
}

/// A range of ports, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    start: Port,
    end: Port,
}

impl PortRange {
    /// Create a new port range.
    pub fn new(start: Port, end: Port) -> Result<Self, PortError> {
        if start > end {
            Err(PortError::InvalidRange(start.0, end.0))
        } else {
            Ok(Self { start, end })
        }
    }

    /// Create a range from raw bounds, validating both ends.
    pub fn from_bounds(start: u16, end: u16) -> Result<Self, PortError> {
        Self::new(Port::try_from(start)?, Port::try_from(end)?)
    }

    pub const fn start(&self) -> Port {
        self.start
    }

    pub const fn end(&self) -> Port {
        self.end
    }

    /// Get the number of ports in this range.
    pub const fn len(&self) -> usize {
        (self.end.0 - self.start.0) as usize + 1
    }

    /// Check if the range is empty (never true for valid ranges).
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over all ports in this range.
    pub fn iter(&self) -> impl Iterator<Item = Port> {
        (self.start.0..=self.end.0).map(Port)
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for PortRange {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('-') {
            Some((start, end)) => Self::new(start.parse()?, end.parse()?),
            None => Err(PortError::InvalidFormat(s.to_string())),
        }
    }
}

/// Which ports a scan covers.
///
/// Parses from strings like:
/// - `"80"` or `"80,443,8080"` - explicit list
/// - `"1-1000"` - inclusive range
/// - `"22,80,8000-8010"` - list with embedded ranges (expanded into the list)
/// - `"default"` - the service catalog's ports
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "ports")]
pub enum PortSpec {
    /// Explicit set of ports; order and duplicates are irrelevant.
    List(Vec<Port>),
    /// Contiguous inclusive range.
    Range(PortRange),
    /// Every port in the service catalog.
    #[default]
    Catalog,
}

impl PortSpec {
    /// Expand into a sorted, deduplicated list of ports.
    pub fn expand(&self) -> Vec<Port> {
        let ports: BTreeSet<Port> = match self {
            Self::List(ports) => ports.iter().copied().collect(),
            Self::Range(range) => range.iter().collect(),
            Self::Catalog => services::known_ports()
                .into_iter()
                .filter_map(Port::new)
                .collect(),
        };
        ports.into_iter().collect()
    }

    /// Get the total number of unique ports.
    pub fn count(&self) -> usize {
        match self {
            Self::Range(range) => range.len(),
            _ => self.expand().len(),
        }
    }
}

impl FromStr for PortSpec {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PortError::Empty);
        }
        if s.eq_ignore_ascii_case("default") {
            return Ok(Self::Catalog);
        }
        if !s.contains(',') && s.contains('-') {
            return Ok(Self::Range(s.parse()?));
        }

        let mut ports = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(PortError::InvalidFormat(s.to_string()));
            }
            if part.contains('-') {
                let range: PortRange = part.parse()?;
                ports.extend(range.iter());
            } else {
                ports.push(part.parse()?);
            }
        }

        Ok(Self::List(ports))
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(ports) => {
                let parts: Vec<String> = ports.iter().map(|p| p.to_string()).collect();
                write!(f, "{}", parts.join(","))
            }
            Self::Range(range) => write!(f, "{}", range),
            Self::Catalog => write!(f, "default"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(ports: &[Port]) -> Vec<u16> {
        ports.iter().map(|p| p.as_u16()).collect()
    }

    #[test]
    fn test_port_validation() {
        assert!(Port::new(0).is_none());
        assert!(Port::new(1).is_some());
        assert!(Port::new(80).is_some());
        assert!(Port::new(65535).is_some());
    }

    #[test]
    fn test_port_parse_errors() {
        assert_eq!("0".parse::<Port>(), Err(PortError::OutOfRange(0)));
        assert_eq!("70000".parse::<Port>(), Err(PortError::OutOfRange(70000)));
        assert!(matches!(
            "http".parse::<Port>(),
            Err(PortError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_range_expansion_is_inclusive() {
        let spec = PortSpec::Range(PortRange::from_bounds(20, 25).unwrap());
        assert_eq!(raw(&spec.expand()), vec![20, 21, 22, 23, 24, 25]);
        assert_eq!(spec.count(), 6);
    }

    #[test]
    fn test_single_port_range() {
        let range = PortRange::from_bounds(443, 443).unwrap();
        assert_eq!(range.len(), 1);
        assert_eq!(range.to_string(), "443");
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert_eq!(
            PortRange::from_bounds(100, 50),
            Err(PortError::InvalidRange(100, 50))
        );
        assert!("100-50".parse::<PortSpec>().is_err());
    }

    #[test]
    fn test_port_spec_parsing() {
        let spec: PortSpec = "80".parse().unwrap();
        assert_eq!(spec.count(), 1);

        let spec: PortSpec = "80,443".parse().unwrap();
        assert_eq!(spec.count(), 2);

        let spec: PortSpec = "1-100".parse().unwrap();
        assert!(matches!(spec, PortSpec::Range(_)));
        assert_eq!(spec.count(), 100);

        let spec: PortSpec = "22,80,443,8000-8010".parse().unwrap();
        assert_eq!(spec.count(), 14);

        let spec: PortSpec = "default".parse().unwrap();
        assert_eq!(spec, PortSpec::Catalog);
    }

    #[test]
    fn test_port_spec_dedup_and_order() {
        let spec: PortSpec = "443,80,80,22,80".parse().unwrap();
        assert_eq!(raw(&spec.expand()), vec![22, 80, 443]);
    }

    #[test]
    fn test_port_spec_malformed() {
        assert_eq!("".parse::<PortSpec>(), Err(PortError::Empty));
        assert!("80,,443".parse::<PortSpec>().is_err());
        assert!("80,abc".parse::<PortSpec>().is_err());
        assert!("1-2-3".parse::<PortSpec>().is_err());
        assert!("0-10".parse::<PortSpec>().is_err());
    }

    #[test]
    fn test_catalog_expansion() {
        assert_eq!(
            raw(&PortSpec::Catalog.expand()),
            vec![21, 22, 23, 25, 80, 443, 3306, 8000]
        );
    }

    #[test]
    fn test_empty_list_expands_to_nothing() {
        assert!(PortSpec::List(Vec::new()).expand().is_empty());
    }
}
