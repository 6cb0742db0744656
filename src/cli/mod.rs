//! Command-line interface.
//!
//! - `bannerscan <HOST>` scans the well-known service ports
//! - `bannerscan <HOST> -p 22,80,8000-8010` scans an explicit list
//! - `bannerscan <HOST> --start-port 1 --end-port 1024` scans a range

pub mod export;
pub mod scan;

use crate::config::{AppSettings, Verbosity};
use crate::error::{CliError, CliResult};
use crate::output::ExportFormat;
use crate::scanner::{BannerOptions, ScanRequest};
use crate::types::{PortError, PortRange, PortSpec};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

/// A concurrent TCP port scanner with banner grabbing.
#[derive(Parser, Debug)]
#[command(name = "bannerscan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A concurrent TCP port scanner with banner grabbing", long_about = None)]
pub struct Cli {
    /// Target IP address or hostname to scan
    #[arg(value_name = "HOST")]
    pub host: String,

    /// Ports to scan (e.g. "80", "80,443,8000", "1-1000", "22,80,8000-8010").
    /// Defaults to the well-known service ports.
    #[arg(short, long, conflicts_with_all = ["start_port", "end_port"])]
    pub ports: Option<String>,

    /// First port of an inclusive range
    #[arg(long, value_name = "PORT", requires = "end_port")]
    pub start_port: Option<u16>,

    /// Last port of an inclusive range
    #[arg(long, value_name = "PORT", requires = "start_port")]
    pub end_port: Option<u16>,

    /// Connection timeout per port, in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Banner read timeout, in seconds
    #[arg(long, value_name = "SECS")]
    pub banner_timeout: Option<f64>,

    /// Maximum number of ports probed at once
    #[arg(short = 'c', long, visible_alias = "threads", value_name = "N")]
    pub concurrency: Option<usize>,

    /// Skip banner grabbing
    #[arg(long)]
    pub no_banners: bool,

    /// Leave banner Date: headers in GMT
    #[arg(long)]
    pub no_date_convert: bool,

    /// UTC offset for banner dates (e.g. "-03:00", "+05:30", "UTC")
    #[arg(long, value_name = "OFFSET", allow_hyphen_values = true)]
    pub utc_offset: Option<String>,

    /// Save results as CSV
    #[arg(long)]
    pub csv: bool,

    /// Save results as JSON
    #[arg(long)]
    pub json: bool,

    /// Directory for saved result files
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Never ask whether to save results
    #[arg(long)]
    pub no_prompt: bool,

    /// Increase verbosity (-v progress, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only print "port,service,status" lines
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to a settings file
    #[arg(long, value_name = "PATH", env = "BANNERSCAN_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }

    /// Load settings from `--config` or the default location.
    pub fn load_settings(&self) -> CliResult<AppSettings> {
        let settings = match self.config {
            Some(ref path) => AppSettings::load_from(path)?,
            None => AppSettings::load()?,
        };
        Ok(settings)
    }

    /// Port selection from `--ports`, `--start-port/--end-port`, or the catalog.
    pub fn port_spec(&self) -> Result<PortSpec, PortError> {
        match (&self.ports, self.start_port, self.end_port) {
            (Some(ports), _, _) => ports.parse(),
            (None, Some(start), Some(end)) => {
                PortRange::from_bounds(start, end).map(PortSpec::Range)
            }
            _ => Ok(PortSpec::Catalog),
        }
    }

    /// Merge flags over `settings` into a scan request.
    pub fn build_request(&self, settings: &AppSettings) -> CliResult<ScanRequest> {
        let timeout = match self.timeout {
            Some(secs) => parse_seconds("--timeout", secs)?,
            None => settings.timeout(),
        };
        let concurrency = self.concurrency.unwrap_or(settings.concurrency);

        let mut request = ScanRequest::new(self.host.clone(), self.port_spec()?)
            .with_timeout(timeout)
            .with_concurrency(concurrency);

        if self.no_banners || !settings.grab_banners {
            return Ok(request.without_banners());
        }

        let banner_timeout = match self.banner_timeout {
            Some(secs) => parse_seconds("--banner-timeout", secs)?,
            None => settings.banner_timeout(),
        };
        let mut banners = BannerOptions::default().with_timeout(banner_timeout);

        if !self.no_date_convert && settings.convert_dates {
            let offset = match self.utc_offset {
                Some(ref raw) => crate::config::parse_utc_offset(raw)?,
                None => settings.reference_offset()?,
            };
            banners = banners.with_date_conversion(offset);
        }

        request = request.with_banners(banners);
        Ok(request)
    }

    /// Formats requested through `--csv` / `--json`.
    pub fn export_formats(&self) -> Vec<ExportFormat> {
        let mut formats = Vec::new();
        if self.csv {
            formats.push(ExportFormat::Csv);
        }
        if self.json {
            formats.push(ExportFormat::Json);
        }
        formats
    }

    /// Output directory from the flag or settings.
    pub fn output_dir(&self, settings: &AppSettings) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| settings.output_dir.clone())
    }
}

fn parse_seconds(flag: &str, secs: f64) -> CliResult<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|_| CliError::Other(format!("{} must be a non-negative number of seconds", flag)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["bannerscan"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_to_catalog() {
        let cli = parse(&["127.0.0.1"]);
        assert_eq!(cli.port_spec().unwrap(), PortSpec::Catalog);
        assert_eq!(cli.verbosity(), Verbosity::Normal);
        assert!(cli.export_formats().is_empty());
    }

    #[test]
    fn test_port_list_and_range() {
        let cli = parse(&["127.0.0.1", "-p", "80,443"]);
        assert_eq!(cli.port_spec().unwrap().count(), 2);

        let cli = parse(&["127.0.0.1", "--start-port", "20", "--end-port", "25"]);
        assert_eq!(
            cli.port_spec().unwrap(),
            PortSpec::Range(PortRange::from_bounds(20, 25).unwrap())
        );
    }

    #[test]
    fn test_bad_port_input() {
        let cli = parse(&["127.0.0.1", "-p", "80,http"]);
        assert!(cli.port_spec().is_err());

        let cli = parse(&["127.0.0.1", "--start-port", "100", "--end-port", "10"]);
        assert_eq!(cli.port_spec(), Err(PortError::InvalidRange(100, 10)));

        let cli = parse(&["127.0.0.1", "--start-port", "0", "--end-port", "10"]);
        assert_eq!(cli.port_spec(), Err(PortError::OutOfRange(0)));
    }

    #[test]
    fn test_conflicting_selection_rejected() {
        let result = Cli::try_parse_from([
            "bannerscan",
            "127.0.0.1",
            "-p",
            "80",
            "--start-port",
            "1",
            "--end-port",
            "2",
        ]);
        assert!(result.is_err());

        let result = Cli::try_parse_from(["bannerscan", "127.0.0.1", "--start-port", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_request_from_settings() {
        let cli = parse(&["example.com"]);
        let request = cli.build_request(&AppSettings::default()).unwrap();

        assert_eq!(request.host, "example.com");
        assert_eq!(request.timeout, Duration::from_millis(500));
        assert_eq!(request.concurrency, 50);
        let banners = request.banners.unwrap();
        assert_eq!(banners.timeout, Duration::from_secs(2));
        assert_eq!(banners.reference_offset, FixedOffset::west_opt(3 * 3600));
    }

    #[test]
    fn test_flags_override_settings() {
        let cli = parse(&[
            "127.0.0.1",
            "--timeout",
            "1.5",
            "--threads",
            "10",
            "--banner-timeout",
            "0.25",
            "--utc-offset",
            "+01:00",
        ]);
        let request = cli.build_request(&AppSettings::default()).unwrap();

        assert_eq!(request.timeout, Duration::from_millis(1500));
        assert_eq!(request.concurrency, 10);
        let banners = request.banners.unwrap();
        assert_eq!(banners.timeout, Duration::from_millis(250));
        assert_eq!(banners.reference_offset, FixedOffset::east_opt(3600));
    }

    #[test]
    fn test_banner_switches() {
        let cli = parse(&["127.0.0.1", "--no-banners"]);
        assert!(cli.build_request(&AppSettings::default()).unwrap().banners.is_none());

        let cli = parse(&["127.0.0.1", "--no-date-convert"]);
        let banners = cli.build_request(&AppSettings::default()).unwrap().banners.unwrap();
        assert_eq!(banners.reference_offset, None);
    }

    #[test]
    fn test_negative_timeout_rejected() {
        let cli = parse(&["127.0.0.1", "--timeout=-1"]);
        assert!(cli.build_request(&AppSettings::default()).is_err());
    }

    #[test]
    fn test_verbosity_and_exports() {
        let cli = parse(&["127.0.0.1", "-vv", "--csv", "--json"]);
        assert_eq!(cli.verbosity(), Verbosity::Debug);
        assert_eq!(
            cli.export_formats(),
            vec![ExportFormat::Csv, ExportFormat::Json]
        );

        let cli = parse(&["127.0.0.1", "-q"]);
        assert_eq!(cli.verbosity(), Verbosity::Quiet);
    }
}
