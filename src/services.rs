//! Service catalog based on well-known port numbers.
//!
//! Provides the static mapping from port numbers to the service names
//! reported in scan results.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Name reported for ports missing from the catalog.
pub const UNKNOWN_SERVICE: &str = "UNKNOWN";

/// Static map of well-known ports to service names.
static PORT_SERVICES: LazyLock<HashMap<u16, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    m.insert(21, "FTP");
    m.insert(22, "SSH");
    m.insert(23, "TELNET");
    m.insert(25, "SMTP");
    m.insert(80, "HTTP");
    m.insert(443, "HTTPS");
    m.insert(3306, "MySQL");
    m.insert(8000, "HTTP-ALT");

    m
});

/// Look up the service name for a port.
///
/// Total over all ports: anything outside the catalog is [`UNKNOWN_SERVICE`].
pub fn lookup(port: u16) -> &'static str {
    get_service_name(port).unwrap_or(UNKNOWN_SERVICE)
}

/// Look up the service name for a port, returning `None` if it is not cataloged.
pub fn get_service_name(port: u16) -> Option<&'static str> {
    PORT_SERVICES.get(&port).copied()
}

/// All cataloged ports, ascending.
pub fn known_ports() -> Vec<u16> {
    let mut ports: Vec<u16> = PORT_SERVICES.keys().copied().collect();
    ports.sort_unstable();
    ports
}
