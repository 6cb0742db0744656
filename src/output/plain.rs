//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::config::Verbosity;
use crate::scanner::{ScanReport, ScanResult};
use crate::types::ScanTarget;
use console::style;
use std::io::{self, Write};
use std::time::Duration;

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Print a report to stdout in the layout matching `verbosity`.
pub fn print_results(report: &ScanReport, verbosity: Verbosity) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if verbosity == Verbosity::Quiet {
        write_compact(&mut out, &report.results)
    } else {
        write_plain(&mut out, report)
    }
}

/// One `port,service,status` line per result.
pub fn write_compact<W: Write>(out: &mut W, results: &[ScanResult]) -> io::Result<()> {
    for result in results {
        writeln!(out, "{},{},{}", result.port, result.service, result.status)?;
    }
    Ok(())
}

/// Full report: target, statistics and the port table.
pub fn write_plain<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(
        out,
        "                  {} Scan Results",
        style("bannerscan").cyan().bold()
    )?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    writeln!(out, "  {} {}", style("Target:").bold(), report.target.original)?;
    writeln!(out, "  {} {}", style("IP Address:").bold(), report.target.ip)?;
    writeln!(out)?;

    writeln!(
        out,
        "  {} {} of {} ports probed in {:.2}s",
        style("Statistics:").bold(),
        report.ports_probed,
        report.ports_total,
        report.duration_ms as f64 / 1000.0
    )?;
    writeln!(
        out,
        "               {} open",
        style(report.results.len()).green().bold()
    )?;
    if report.interrupted {
        writeln!(
            out,
            "  {}",
            style("Scan interrupted: results are partial.").yellow().bold()
        )?;
    }
    writeln!(out)?;

    if report.results.is_empty() {
        writeln!(out, "  {}", style("No open ports found.").dim())?;
    } else {
        writeln!(out, "  {}", style(THIN_RULE).dim())?;
        writeln!(
            out,
            "  {:>6}  {:^8}  {:<12}  {}",
            style("PORT").bold(),
            style("STATE").bold(),
            style("SERVICE").bold(),
            style("BANNER").bold()
        )?;
        writeln!(out, "  {}", style(THIN_RULE).dim())?;

        for result in &report.results {
            let banner_display = result
                .banner
                .as_deref()
                .map(|b| truncate_string(first_line(b), 40))
                .unwrap_or_default();

            writeln!(
                out,
                "  {:>6}  {:^8}  {:<12}  {}",
                result.port,
                style(result.status.to_string()).green().bold(),
                result.service,
                style(banner_display).dim()
            )?;
        }

        writeln!(out, "  {}", style(THIN_RULE).dim())?;
    }

    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    Ok(())
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(target: &ScanTarget, ports: usize, concurrency: usize, timeout: Duration) {
    let stdout = io::stdout();
    let _ = write_scan_header(&mut stdout.lock(), target, ports, concurrency, timeout);
}

/// Write the scan header: target, resolved address and scan parameters.
pub fn write_scan_header<W: Write>(
    out: &mut W,
    target: &ScanTarget,
    ports: usize,
    concurrency: usize,
    timeout: Duration,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{} {} v{}",
        style("Starting").cyan(),
        style("bannerscan").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(
        out,
        "{} Target: {} ({})",
        style("•").dim(),
        style(&target.original).white().bold(),
        target.ip
    )?;
    writeln!(
        out,
        "{} Ports: {} | Workers: {} | Timeout: {}s",
        style("•").dim(),
        style(ports).white().bold(),
        concurrency,
        timeout.as_secs_f64()
    )?;
    writeln!(out)?;
    Ok(())
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or("").trim_end()
}

/// Truncate a string to a maximum number of characters, adding ellipsis if truncated.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
