// Send outcomes and the aggregated burst report

use serde::{Deserialize, Serialize};

/// Final status of one send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SendStatus {
    Succeeded,
    Failed,
    TimedOut,
    /// Task panicked or was cancelled before producing an outcome
    Aborted,
}

impl std::fmt::Display for SendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendStatus::Succeeded => write!(f, "SUCCEEDED"),
            SendStatus::Failed => write!(f, "FAILED"),
            SendStatus::TimedOut => write!(f, "TIMED_OUT"),
            SendStatus::Aborted => write!(f, "ABORTED"),
        }
    }
}

/// Outcome of one dispatched send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendOutcome {
    /// Dispatch order within the burst (0-based)
    pub sequence: u64,
    pub status: SendStatus,
    pub exit_code: Option<i32>,
    pub duration_ms: i64,
    pub error: Option<String>,
}

impl SendOutcome {
    pub fn succeeded(sequence: u64, exit_code: Option<i32>, duration_ms: i64) -> Self {
        Self {
            sequence,
            status: SendStatus::Succeeded,
            exit_code,
            duration_ms,
            error: None,
        }
    }

    pub fn failed(
        sequence: u64,
        exit_code: Option<i32>,
        duration_ms: i64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            sequence,
            status: SendStatus::Failed,
            exit_code,
            duration_ms,
            error: Some(error.into()),
        }
    }

    pub fn timed_out(sequence: u64, duration_ms: i64) -> Self {
        Self {
            sequence,
            status: SendStatus::TimedOut,
            exit_code: None,
            duration_ms,
            error: Some(format!("send timed out after {}ms", duration_ms)),
        }
    }

    pub fn aborted(sequence: u64, error: impl Into<String>) -> Self {
        Self {
            sequence,
            status: SendStatus::Aborted,
            exit_code: None,
            duration_ms: 0,
            error: Some(error.into()),
        }
    }
}

/// Aggregated result of a burst
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurstReport {
    pub burst_id: String,
    pub queue_url: String,
    pub requested: u64,
    pub dispatched: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub timed_out: u64,
    pub aborted: u64,
    /// True when sends were released without being awaited
    pub detached: bool,
    /// Time spent issuing the dispatches
    pub launch_ms: i64,
    /// Time from the first dispatch until the last outcome (launch time when detached)
    pub total_ms: i64,
}

impl BurstReport {
    pub fn new(burst_id: impl Into<String>, queue_url: impl Into<String>, requested: u64) -> Self {
        Self {
            burst_id: burst_id.into(),
            queue_url: queue_url.into(),
            requested,
            dispatched: 0,
            succeeded: 0,
            failed: 0,
            timed_out: 0,
            aborted: 0,
            detached: false,
            launch_ms: 0,
            total_ms: 0,
        }
    }

    pub fn record(&mut self, outcome: &SendOutcome) {
        self.record_status(outcome.status);
    }

    pub fn record_status(&mut self, status: SendStatus) {
        match status {
            SendStatus::Succeeded => self.succeeded += 1,
            SendStatus::Failed => self.failed += 1,
            SendStatus::TimedOut => self.timed_out += 1,
            SendStatus::Aborted => self.aborted += 1,
        }
    }

    /// Number of sends that did not succeed
    pub fn unsuccessful(&self) -> u64 {
        self.failed + self.timed_out + self.aborted
    }

    /// Number of outcomes recorded so far
    pub fn completed(&self) -> u64 {
        self.succeeded + self.unsuccessful()
    }

    /// True when every dispatched send was observed to succeed
    pub fn all_succeeded(&self) -> bool {
        !self.detached && self.succeeded == self.dispatched
    }
}
