//! # bannerscan - A Concurrent TCP Port Scanner
//!
//! bannerscan probes a host's TCP ports with full connects, reports which
//! are open, names the usual service behind each one and captures whatever
//! the service announces on connect.
//!
//! ## Features
//!
//! - **Bounded concurrency**: a worker pool of configurable width
//! - **Flexible port selection**: lists, inclusive ranges, or the built-in service catalog
//! - **Banner grabbing**: first bytes sent by the service, with `Date:` headers
//!   rewritten from GMT into a chosen UTC offset
//! - **Cancellation**: Ctrl-C stops dispatching and keeps partial results
//! - **Exports**: CSV and JSON result files
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bannerscan::{PortScanner, PortSpec, ScanRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), bannerscan::ScanError> {
//!     let request = ScanRequest::new("127.0.0.1", PortSpec::Catalog);
//!     for result in PortScanner::tcp().scan(&request).await? {
//!         println!("{} {} {:?}", result.port, result.service, result.banner);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Port, port selection and target types
//! - [`services`] - Port to service name catalog
//! - [`banner`] - Banner grabbing and `Date:` header normalization
//! - [`scanner`] - Probing transport and the scan coordinator
//! - [`config`] - Settings file and verbosity
//! - [`output`] - Terminal display and CSV/JSON writers
//! - [`cli`] - Command-line front end
//! - [`error`] - Error types

pub mod banner;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ScanError};
pub use scanner::{
    PortScanner, PortStatus, ScanReport, ScanRequest, ScanResult, TcpConnectTransport, Transport,
};
pub use types::{Port, PortSpec, ScanTarget};
