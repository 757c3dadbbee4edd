//! Poll loop driving idle accounting
//!
//! Each tick: snapshot minimized windows, update [`IdleAccounting`], then act
//! on its kill requests. Per-item failures are logged and never stop the loop.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::accounting::{IdleAccounting, KillRequest};
use crate::platform::{ProcessTerminator, WindowInspector};

/// What happened to one kill request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationOutcome {
    Terminated,
    /// Process was gone before we got to it
    AlreadyExited,
    /// Dry-run mode, nothing was done
    DryRun,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationRecord {
    pub request: KillRequest,
    pub outcome: TerminationOutcome,
}

/// Observable result of one tick.
#[derive(Debug, Clone)]
pub struct TickReport {
    /// 1-based tick number
    pub tick: u64,
    pub timestamp: chrono::DateTime<chrono::Local>,
    /// Tracked names with their idle seconds, in name order
    pub tracked: Vec<(String, u64)>,
    pub terminations: Vec<TerminationRecord>,
    /// Set when the inspection pass failed and accounting was skipped
    pub skipped: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReaperStats {
    pub ticks: u64,
    pub skipped_ticks: u64,
    pub terminations: u64,
    pub failed_terminations: u64,
}

/// Owns the accounting state and its two platform collaborators.
pub struct IdleReaper<I, T> {
    accounting: IdleAccounting,
    inspector: I,
    terminator: T,
    interval: Duration,
    dry_run: bool,
    stats: ReaperStats,
}

impl<I: WindowInspector, T: ProcessTerminator> IdleReaper<I, T> {
    pub fn new(accounting: IdleAccounting, inspector: I, terminator: T, dry_run: bool) -> Self {
        let interval = Duration::from_secs(accounting.interval_secs());
        Self {
            accounting,
            inspector,
            terminator,
            interval,
            dry_run,
            stats: ReaperStats::default(),
        }
    }

    /// Run a single iteration.
    pub fn tick(&mut self) -> TickReport {
        self.stats.ticks += 1;
        let tick = self.stats.ticks;
        let timestamp = chrono::Local::now();

        let snapshot = match self.inspector.snapshot_minimized(self.accounting.exclusions()) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Window inspection failed: {}", e);
                self.stats.skipped_ticks += 1;
                return TickReport {
                    tick,
                    timestamp,
                    tracked: self.tracked(),
                    terminations: Vec::new(),
                    skipped: Some(e.to_string()),
                };
            }
        };

        let outcome = self.accounting.observe(&snapshot);
        for name in &outcome.started {
            debug!("{} is minimized, idle timer started", name);
        }
        for name in &outcome.evicted {
            debug!("{} is no longer minimized, idle timer reset", name);
        }

        let terminations = outcome
            .kill_requests
            .into_iter()
            .map(|request| {
                let outcome = self.execute(&request);
                TerminationRecord { request, outcome }
            })
            .collect();

        TickReport {
            tick,
            timestamp,
            tracked: self.tracked(),
            terminations,
            skipped: None,
        }
    }

    fn execute(&mut self, request: &KillRequest) -> TerminationOutcome {
        if self.dry_run {
            info!(
                "DRY RUN: would terminate {} (pid {}) after {}s minimized",
                request.name, request.pid, request.idle_secs
            );
            return TerminationOutcome::DryRun;
        }

        match self.terminator.terminate(request.pid) {
            Ok(()) => {
                self.stats.terminations += 1;
                info!(
                    "Terminated {} (pid {}) after {}s minimized",
                    request.name, request.pid, request.idle_secs
                );
                TerminationOutcome::Terminated
            }
            Err(e) if e.is_not_found() => {
                debug!("{} (pid {}) already exited", request.name, request.pid);
                TerminationOutcome::AlreadyExited
            }
            Err(e) => {
                self.stats.failed_terminations += 1;
                warn!("Could not terminate {}: {}", request.name, e);
                TerminationOutcome::Failed(e.to_string())
            }
        }
    }

    fn tracked(&self) -> Vec<(String, u64)> {
        self.accounting
            .tracked()
            .map(|(name, secs)| (name.to_string(), secs))
            .collect()
    }

    /// Tick every interval until `shutdown` resolves. `on_tick` sees each
    /// report as soon as the tick completes.
    pub async fn run_until<F, R>(&mut self, shutdown: F, mut on_tick: R)
    where
        F: Future<Output = ()>,
        R: FnMut(&TickReport),
    {
        info!(
            "Starting idle reaper loop (interval: {:?}, limit: {}s, dry run: {})",
            self.interval,
            self.accounting.threshold_secs(),
            self.dry_run
        );
        tokio::pin!(shutdown);

        loop {
            let report = self.tick();
            on_tick(&report);

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping after {} ticks", self.stats.ticks);
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    pub fn accounting(&self) -> &IdleAccounting {
        &self.accounting
    }

    pub fn stats(&self) -> &ReaperStats {
        &self.stats
    }
}
