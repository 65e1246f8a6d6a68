// Burst - fan-out of send-message dispatches

pub mod constants;


use constants::*;

use crate::domain::{BurstPlan, BurstReport, SendDefaults, SendOutcome, SendTarget};
use crate::error::Result;
use crate::port::{DispatchError, IdProvider, MessageDispatcher, TimeProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Whether the caller waits for the sends of a burst
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionMode {
    /// Await every send and report outcomes
    Join,
    /// Start every send and return immediately (fire-and-forget)
    Detach,
}

/// Tunables for a burst
#[derive(Debug, Clone)]
pub struct BurstOptions {
    pub defaults: SendDefaults,
    /// Bound on concurrently running sends (joined mode only)
    pub max_in_flight: Option<usize>,
    /// Per-send timeout handed to the dispatcher
    pub send_timeout: Option<Duration>,
}

impl Default for BurstOptions {
    fn default() -> Self {
        Self {
            defaults: SendDefaults::default(),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }
}

/// Message Burst Generator
///
/// Issues one dispatch per requested message. Dispatching never waits on a
/// previous send; completion order is unspecified.
pub struct BurstGenerator {
    dispatcher: Arc<dyn MessageDispatcher>,
    time_provider: Arc<dyn TimeProvider>,
    id_provider: Arc<dyn IdProvider>,
    options: BurstOptions,
}

impl BurstGenerator {
    pub fn new(
        dispatcher: Arc<dyn MessageDispatcher>,
        time_provider: Arc<dyn TimeProvider>,
        id_provider: Arc<dyn IdProvider>,
        options: BurstOptions,
    ) -> Self {
        Self {
            dispatcher,
            time_provider,
            id_provider,
            options,
        }
    }

    pub fn options(&self) -> &BurstOptions {
        &self.options
    }

    /// Target every send of `plan` is addressed to
    pub fn target_for(&self, plan: &BurstPlan) -> SendTarget {
        SendTarget::for_plan(plan, &self.options.defaults)
    }

    /// Validate the raw inputs, send `amount` messages and report.
    ///
    /// # Errors
    /// - AppError::Domain(DomainError::Parameter) on malformed input, before
    ///   any dispatch
    pub async fn generate_messages(
        &self,
        queue_name: &str,
        port: &str,
        amount: &str,
        mode: CompletionMode,
    ) -> Result<BurstReport> {
        let plan = BurstPlan::parse(queue_name, port, amount)?;

        let report = match mode {
            CompletionMode::Join => self.launch(&plan).join().await,
            CompletionMode::Detach => self.fire_and_forget(&plan),
        };

        Ok(report)
    }

    /// Spawn one task per message and return without awaiting any of them.
    ///
    /// Must be called from within a tokio runtime.
    pub fn launch(&self, plan: &BurstPlan) -> Burst {
        let target = Arc::new(self.target_for(plan));
        let burst_id = self.id_provider.generate_id();
        let started_at = self.time_provider.now_millis();
        let limiter = self
            .options
            .max_in_flight
            .map(|n| Arc::new(Semaphore::new(n.max(MIN_IN_FLIGHT))));

        let span = info_span!("burst", burst_id = %burst_id, queue = %plan.queue_name);
        let mut tasks = JoinSet::new();

        for sequence in 0..plan.amount.get() {
            let send = send_one(
                sequence,
                Arc::clone(&self.dispatcher),
                Arc::clone(&target),
                limiter.clone(),
                Arc::clone(&self.time_provider),
                self.options.send_timeout,
            );
            tasks.spawn(send.instrument(span.clone()));
        }

        let launch_ms = self.time_provider.now_millis() - started_at;
        let mut report = BurstReport::new(&burst_id, &target.queue_url, plan.amount.get());
        report.dispatched = tasks.len() as u64;
        report.launch_ms = launch_ms;

        info!(
            burst_id = %burst_id,
            queue_url = %target.queue_url,
            endpoint = %target.endpoint_url,
            dispatched = report.dispatched,
            launch_ms = launch_ms,
            "Burst launched"
        );

        Burst {
            tasks,
            report,
            started_at,
            time_provider: Arc::clone(&self.time_provider),
        }
    }

    /// Start every send without tracking it. Only spawn failures are counted.
    pub fn fire_and_forget(&self, plan: &BurstPlan) -> BurstReport {
        let target = self.target_for(plan);
        let burst_id = self.id_provider.generate_id();
        let started_at = self.time_provider.now_millis();

        let mut report = BurstReport::new(&burst_id, &target.queue_url, plan.amount.get());
        report.detached = true;

        for sequence in 0..plan.amount.get() {
            match self.dispatcher.spawn_detached(&target) {
                Ok(()) => report.dispatched += 1,
                Err(e) => {
                    warn!(burst_id = %burst_id, sequence, error = %e, "Detached send failed to start");
                    report.failed += 1;
                }
            }
        }

        report.launch_ms = self.time_provider.now_millis() - started_at;
        report.total_ms = report.launch_ms;

        info!(
            burst_id = %burst_id,
            queue_url = %target.queue_url,
            dispatched = report.dispatched,
            failed_to_start = report.failed,
            "Burst detached"
        );

        report
    }
}

/// A launched burst whose sends may still be running
pub struct Burst {
    tasks: JoinSet<SendOutcome>,
    report: BurstReport,
    started_at: i64,
    time_provider: Arc<dyn TimeProvider>,
}

impl Burst {
    pub fn id(&self) -> &str {
        &self.report.burst_id
    }

    /// Number of send tasks spawned
    pub fn dispatched(&self) -> u64 {
        self.report.dispatched
    }

    /// Wait for every send and classify its outcome
    pub async fn join(mut self) -> BurstReport {
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(outcome) => self.report.record(&outcome),
                Err(e) => {
                    error!(burst_id = %self.report.burst_id, error = %e, "Send task aborted");
                    self.report.record(&SendOutcome::aborted(0, e.to_string()));
                }
            }
        }

        self.report.total_ms = self.time_provider.now_millis() - self.started_at;

        info!(
            burst_id = %self.report.burst_id,
            succeeded = self.report.succeeded,
            failed = self.report.failed,
            timed_out = self.report.timed_out,
            aborted = self.report.aborted,
            total_ms = self.report.total_ms,
            "Burst completed"
        );

        self.report
    }

    /// Stop tracking the running sends; they keep running in the background
    pub fn detach(mut self) -> BurstReport {
        self.tasks.detach_all();
        self.report.detached = true;
        self.report.total_ms = self.report.launch_ms;
        self.report
    }
}

/// One send: wait for a permit if limited, dispatch, classify
async fn send_one(
    sequence: u64,
    dispatcher: Arc<dyn MessageDispatcher>,
    target: Arc<SendTarget>,
    limiter: Option<Arc<Semaphore>>,
    time_provider: Arc<dyn TimeProvider>,
    timeout: Option<Duration>,
) -> SendOutcome {
    let _permit = match limiter {
        Some(semaphore) => match semaphore.acquire_owned().await {
            Ok(permit) => Some(permit),
            Err(_) => return SendOutcome::aborted(sequence, "in-flight limiter closed"),
        },
        None => None,
    };

    let start = time_provider.now_millis();
    let result = dispatcher.dispatch(&target, timeout).await;
    let duration_ms = time_provider.now_millis() - start;

    match result {
        Ok(sent) => {
            debug!(
                sequence,
                duration_ms,
                message_id = ?sent.message_id,
                "Message sent"
            );
            SendOutcome::succeeded(sequence, sent.exit_code, duration_ms)
        }
        Err(DispatchError::Timeout(ms)) => {
            warn!(sequence, timeout_ms = ms, "Message send timed out");
            SendOutcome::timed_out(sequence, duration_ms.max(ms))
        }
        Err(e) => {
            warn!(sequence, error = %e, "Message send failed");
            SendOutcome::failed(sequence, e.exit_code(), duration_ms, e.to_string())
        }
    }
}
