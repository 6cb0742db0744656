//! Scan command implementation.
//!
//! Runs one scan of the host given on the command line, prints the report
//! and hands the results to the exporter.

use crate::cli::{export, Cli};
use crate::config::Verbosity;
use crate::error::{CliResult, ScanError};
use crate::output;
use crate::scanner::PortScanner;
use crate::types::ScanTarget;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Exit status used when the user aborts with Ctrl-C.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Execute a scan as described by `cli`.
pub async fn execute(cli: &Cli) -> CliResult<()> {
    let verbosity = cli.verbosity();
    let settings = cli.load_settings()?;
    let request = cli.build_request(&settings)?;
    request.validate()?;

    let target = ScanTarget::resolve(&request.host)
        .await
        .map_err(ScanError::from)?;

    if verbosity > Verbosity::Quiet {
        output::print_scan_header(
            &target,
            request.ports.count(),
            request.concurrency,
            request.timeout,
        );
    }

    // Stays registered until this function returns, so Ctrl-C keeps working
    // at the save prompt.
    let interrupts = InterruptListener::spawn();

    let report = PortScanner::tcp()
        .with_verbosity(verbosity)
        .run_resolved(&request, target, interrupts.token())
        .await;
    interrupts.scan_finished();

    info!(
        target = %report.target,
        open = report.results.len(),
        probed = report.ports_probed,
        duration_ms = report.duration_ms,
        "scan finished"
    );

    output::print_results(&report, verbosity)?;
    // The save prompt blocks on stdin; give up this worker so the interrupt
    // listener can still run.
    tokio::task::block_in_place(|| export::handle_exports(cli, &settings, &report))?;

    if report.interrupted {
        output::print_warning(&format!(
            "scan interrupted after {} of {} ports",
            report.ports_probed, report.ports_total
        ));
    } else if verbosity > Verbosity::Quiet {
        output::print_success(&format!(
            "Scan complete: {} open port(s)",
            report.results.len()
        ));
    }

    Ok(())
}

/// What a Ctrl-C should do given the scan's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptAction {
    /// Stop dispatching ports and keep the partial results.
    StopScan,
    /// Leave immediately without saving anything.
    Exit,
}

/// Tracks the scan's cancellation token and whether scanning is over.
#[derive(Debug, Default)]
pub struct InterruptState {
    scan: CancellationToken,
    finished: AtomicBool,
}

impl InterruptState {
    pub fn token(&self) -> CancellationToken {
        self.scan.clone()
    }

    pub fn scan_finished(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }

    /// Decide how to handle one interrupt.
    ///
    /// Only the first interrupt during a running scan stops it gracefully.
    /// A repeated one, or any after the scan is over, means exit.
    pub fn on_interrupt(&self) -> InterruptAction {
        if self.finished.load(Ordering::SeqCst) || self.scan.is_cancelled() {
            InterruptAction::Exit
        } else {
            self.scan.cancel();
            InterruptAction::StopScan
        }
    }
}

/// Background Ctrl-C handler, aborted when dropped.
struct InterruptListener {
    state: Arc<InterruptState>,
    handle: JoinHandle<()>,
}

impl InterruptListener {
    fn spawn() -> Self {
        let state = Arc::new(InterruptState::default());
        let listener_state = Arc::clone(&state);

        let handle = tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                match listener_state.on_interrupt() {
                    InterruptAction::StopScan => {
                        warn!("interrupt received, stopping scan (press Ctrl-C again to quit)");
                    }
                    InterruptAction::Exit => {
                        output::print_warning("interrupted, exiting without saving");
                        std::process::exit(INTERRUPTED_EXIT_CODE);
                    }
                }
            }
        });

        Self { state, handle }
    }

    fn token(&self) -> CancellationToken {
        self.state.token()
    }

    fn scan_finished(&self) {
        self.state.scan_finished();
    }
}

impl Drop for InterruptListener {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
