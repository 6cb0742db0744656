//! Scan coordinator.
//!
//! Expands the requested ports, fans probes out over a bounded pool of tokio
//! tasks, fans the results back in on the calling task and returns them
//! sorted by port.

pub mod request;
pub mod tcp;
pub mod traits;

pub use request::{BannerOptions, ScanRequest, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT};
pub use tcp::TcpConnectTransport;
pub use traits::{PortStatus, ProbeOutcome, ScanResult, Transport};

use crate::banner::normalize;
use crate::config::Verbosity;
use crate::error::ScanError;
use crate::types::{Port, ScanTarget};
use futures::future;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// How many times a probe is retried after hitting descriptor limits.
const MAX_EXHAUSTED_RETRIES: u32 = 5;

/// Backoff step between exhausted retries, multiplied by the attempt number.
const EXHAUSTED_BACKOFF: Duration = Duration::from_millis(50);

/// Complete outcome of a scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub target: ScanTarget,
    /// Unique ports requested.
    pub ports_total: usize,
    /// Ports whose probe actually finished.
    pub ports_probed: usize,
    /// The scan was cancelled before every port was probed.
    pub interrupted: bool,
    pub duration_ms: u64,
    /// Open ports, ascending.
    pub results: Vec<ScanResult>,
}

/// Per-port settings shared by every worker.
#[derive(Debug)]
struct WorkerConfig {
    ip: IpAddr,
    timeout: Duration,
    banners: Option<BannerOptions>,
}

/// Runs scans over a [`Transport`].
pub struct PortScanner {
    transport: Arc<dyn Transport>,
    verbosity: Verbosity,
}

impl PortScanner {
    /// Create a scanner over the given transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            verbosity: Verbosity::default(),
        }
    }

    /// Create a scanner over real TCP sockets.
    pub fn tcp() -> Self {
        Self::new(Arc::new(TcpConnectTransport::new()))
    }

    /// Set the verbosity used for progress reporting.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Scan to completion and return the open ports, ascending.
    pub async fn scan(&self, request: &ScanRequest) -> Result<Vec<ScanResult>, ScanError> {
        let report = self.run(request, CancellationToken::new()).await?;
        Ok(report.results)
    }

    /// Scan until done or until `cancel` fires.
    ///
    /// Cancelling stops new ports from being dispatched; ports already in
    /// flight finish (each is bounded by its timeouts) and their results are
    /// kept in the report.
    pub async fn run(
        &self,
        request: &ScanRequest,
        cancel: CancellationToken,
    ) -> Result<ScanReport, ScanError> {
        request.validate()?;
        let target = ScanTarget::resolve(&request.host).await?;
        let ports = request.ports.expand();

        Ok(self.scan_target(target, ports, request, cancel).await)
    }

    /// Like [`run`](Self::run) for a target the caller already resolved.
    ///
    /// `request.host` is ignored and `request` is assumed valid.
    pub async fn run_resolved(
        &self,
        request: &ScanRequest,
        target: ScanTarget,
        cancel: CancellationToken,
    ) -> ScanReport {
        let ports = request.ports.expand();
        self.scan_target(target, ports, request, cancel).await
    }

    async fn scan_target(
        &self,
        target: ScanTarget,
        ports: Vec<Port>,
        request: &ScanRequest,
        cancel: CancellationToken,
    ) -> ScanReport {
        let start_time = Instant::now();
        let ports_total = ports.len();
        let progress = self.progress_bar(ports_total);

        debug!(
            target = %target,
            ports = ports_total,
            concurrency = request.concurrency,
            timeout_ms = request.timeout.as_millis() as u64,
            "starting scan"
        );

        let worker = Arc::new(WorkerConfig {
            ip: target.ip,
            timeout: request.timeout,
            banners: request.banners.clone(),
        });

        let gate = cancel.clone();
        let mut completions = stream::iter(ports)
            .take_while(move |_| future::ready(!gate.is_cancelled()))
            .map(|port| {
                let transport = Arc::clone(&self.transport);
                let worker = Arc::clone(&worker);
                let handle =
                    tokio::spawn(async move { scan_port(transport.as_ref(), &worker, port).await });
                async move { (port, handle.await) }
            })
            .buffer_unordered(request.concurrency);

        let mut results = Vec::new();
        let mut ports_probed = 0;

        while let Some((port, joined)) = completions.next().await {
            ports_probed += 1;
            if let Some(ref pb) = progress {
                pb.inc(1);
            }

            match joined {
                Ok(Some(result)) => {
                    info!(port = %port, service = %result.service, "open port");
                    if let Some(ref pb) = progress {
                        pb.set_message(format!("Found open port: {}", port));
                    }
                    results.push(result);
                }
                Ok(None) => {}
                Err(e) => warn!(port = %port, error = %e, "probe task failed"),
            }
        }

        let interrupted = cancel.is_cancelled() && ports_probed < ports_total;
        if let Some(pb) = progress {
            if interrupted {
                pb.abandon_with_message("Scan interrupted");
            } else {
                pb.finish_with_message("Scan complete");
            }
        }

        results.sort_by_key(|r| r.port);

        let duration = start_time.elapsed();
        debug!(
            open = results.len(),
            probed = ports_probed,
            interrupted,
            elapsed_ms = duration.as_millis() as u64,
            "scan finished"
        );

        ScanReport {
            target,
            ports_total,
            ports_probed,
            interrupted,
            duration_ms: duration.as_millis() as u64,
            results,
        }
    }

    fn progress_bar(&self, total: usize) -> Option<ProgressBar> {
        if !self.verbosity.shows_progress() {
            return None;
        }

        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .map(|s| s.progress_chars("=>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());

        let pb = ProgressBar::new(total as u64);
        pb.set_style(style);
        Some(pb)
    }
}

/// Probe one port and, if it is open, grab and post-process its banner.
async fn scan_port(
    transport: &dyn Transport,
    worker: &WorkerConfig,
    port: Port,
) -> Option<ScanResult> {
    let addr = SocketAddr::new(worker.ip, port.as_u16());

    let mut attempt = 0;
    loop {
        match transport.probe(addr, worker.timeout).await {
            ProbeOutcome::Open => break,
            ProbeOutcome::Exhausted if attempt < MAX_EXHAUSTED_RETRIES => {
                attempt += 1;
                debug!(port = %port, attempt, "descriptor limit reached, backing off");
                tokio::time::sleep(EXHAUSTED_BACKOFF * attempt).await;
            }
            ProbeOutcome::Exhausted => {
                warn!(port = %port, "giving up after repeated descriptor exhaustion");
                return None;
            }
            outcome => {
                trace!(port = %port, %outcome, "port not open");
                return None;
            }
        }
    }

    let banner = match worker.banners {
        Some(ref options) => transport
            .grab_banner(addr, options.timeout)
            .await
            .map(|text| match options.reference_offset {
                Some(offset) => normalize(&text, offset),
                None => text,
            }),
        None => None,
    };

    Some(ScanResult::open(port, banner))
}
