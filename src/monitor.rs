use std::time::SystemTime;

use serde::Serialize;

use crate::alert::{Alert, CooldownTracker, ThresholdEvaluator, ThresholdSet};
use crate::system::host::{HostMetrics, SysinfoHost};
use crate::system::platform::{self, PlatformMetricsReader};
use crate::system::process::{ProcessRanker, RankedProcesses};
use crate::system::sampler::Sampler;
use crate::system::snapshot::Snapshot;

/// Receives one `(title, message)` per alert, in evaluation order.
pub trait NotificationDispatcher {
    fn notify(&mut self, title: &str, message: &str);
}

/// Writes alerts to the log and nowhere else.
#[derive(Debug, Default)]
pub struct LogDispatcher;

impl NotificationDispatcher for LogDispatcher {
    fn notify(&mut self, title: &str, message: &str) {
        tracing::info!(title, message, "notification");
    }
}

/// Result of one tick: either a snapshot or the reason there is none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TickStatus {
    Sampled { snapshot: Snapshot },
    Error { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub status: TickStatus,
    pub processes: RankedProcesses,
    pub alerts: Vec<Alert>,
    pub thresholds: ThresholdSet,
    pub taken_at: SystemTime,
}

impl TickReport {
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match &self.status {
            TickStatus::Sampled { snapshot } => Some(snapshot),
            TickStatus::Error { .. } => None,
        }
    }
}

/// Owns everything one running monitor needs: the host handle, sampler,
/// ranker and the evaluator with its cooldown state.
pub struct Monitor<H: HostMetrics = SysinfoHost> {
    host: H,
    sampler: Sampler,
    ranker: ProcessRanker,
    evaluator: ThresholdEvaluator,
    thresholds: ThresholdSet,
    process_limit: usize,
}

impl Monitor<SysinfoHost> {
    pub fn native(
        thresholds: ThresholdSet,
        cooldown: CooldownTracker,
        process_limit: usize,
    ) -> Self {
        Monitor::new(
            SysinfoHost::new(),
            platform::native_reader(),
            thresholds,
            cooldown,
            process_limit,
        )
    }
}

impl<H: HostMetrics> Monitor<H> {
    pub fn new(
        host: H,
        platform: Box<dyn PlatformMetricsReader + Send>,
        thresholds: ThresholdSet,
        cooldown: CooldownTracker,
        process_limit: usize,
    ) -> Self {
        Monitor {
            host,
            sampler: Sampler::new(platform),
            ranker: ProcessRanker::new(),
            evaluator: ThresholdEvaluator::new(cooldown),
            thresholds,
            process_limit,
        }
    }

    pub fn thresholds(&self) -> &ThresholdSet {
        &self.thresholds
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Takes effect from the next tick.
    pub fn set_thresholds(&mut self, thresholds: ThresholdSet) {
        self.thresholds = thresholds;
    }

    /// Refreshes the host counters without sampling or evaluating, so the
    /// next tick has a CPU baseline and no cooldown is consumed.
    pub fn prime(&mut self) {
        let _ = self.host.system_usage();
        let _ = self.host.process_table();
    }

    /// One full cycle: sample, rank, classify. A failed sample yields an
    /// error status and no alerts; ranking still runs.
    pub fn tick(&mut self) -> TickReport {
        let _span = tracing::debug_span!("monitor.tick").entered();

        let sampled = self.sampler.sample(&mut self.host);
        let processes = self.ranker.rank(&mut self.host, self.process_limit);

        let (status, alerts) = match sampled {
            Ok(snapshot) => {
                let alerts = self.evaluator.check(&snapshot, &self.thresholds);
                (TickStatus::Sampled { snapshot }, alerts)
            }
            Err(err) => {
                tracing::error!(%err, "tick failed");
                (
                    TickStatus::Error {
                        reason: err.to_string(),
                    },
                    Vec::new(),
                )
            }
        };

        TickReport {
            status,
            processes,
            alerts,
            thresholds: self.thresholds,
            taken_at: SystemTime::now(),
        }
    }

    /// Runs a tick and hands its alerts to `dispatcher`.
    pub fn tick_and_notify(
        &mut self,
        dispatcher: &mut dyn NotificationDispatcher,
    ) -> TickReport {
        let report = self.tick();
        for alert in &report.alerts {
            dispatcher.notify(&alert.title, &alert.message);
        }
        report
    }
}
