// Message Dispatcher Port
// Abstraction for delivering one message through an external queue client

use crate::domain::SendTarget;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Result of a completed send
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchResult {
    pub exit_code: Option<i32>,
    pub duration_ms: i64,
    /// Message ID reported by the queue service, when the client printed one
    pub message_id: Option<String>,
}

/// Dispatch errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Send timeout after {0}ms")]
    Timeout(i64),

    #[error("Client exited with {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("Invalid client output: {0}")]
    InvalidOutput(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl DispatchError {
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            DispatchError::NonZeroExit { code, .. } => *code,
            _ => None,
        }
    }
}

/// Message Dispatcher trait
///
/// Implementations:
/// - AwsCliDispatcher: spawns the queue-client CLI with an explicit argument list
/// - mocks::RecordingDispatcher: in-memory, for tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageDispatcher: Send + Sync {
    /// Send one message and wait for the client to finish
    ///
    /// # Errors
    /// - DispatchError::SpawnFailed if the client cannot be started
    /// - DispatchError::Timeout if the send exceeds `timeout`
    /// - DispatchError::NonZeroExit if the client reports failure
    async fn dispatch(
        &self,
        target: &SendTarget,
        timeout: Option<Duration>,
    ) -> Result<DispatchResult, DispatchError>;

    /// Start one send and return without waiting for it (fire-and-forget)
    ///
    /// Only failures to start the client are observable.
    fn spawn_detached(&self, target: &SendTarget) -> Result<(), DispatchError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock dispatcher behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Always succeed immediately
        Success,
        /// Succeed after a delay (slow transport)
        Delay(Duration),
        /// Always fail with the given stderr
        Fail(String),
        /// Always report a timeout
        Timeout,
        /// Panic with message (for task isolation testing)
        Panic(String),
    }

    /// Dispatcher that records every target it is handed
    pub struct RecordingDispatcher {
        behavior: MockBehavior,
        calls: Mutex<Vec<SendTarget>>,
        detached: Mutex<Vec<SendTarget>>,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
    }

    impl RecordingDispatcher {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                calls: Mutex::new(Vec::new()),
                detached: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                peak_in_flight: AtomicUsize::new(0),
            }
        }

        pub fn new_success() -> Self {
            Self::new(MockBehavior::Success)
        }

        pub fn new_slow(delay: Duration) -> Self {
            Self::new(MockBehavior::Delay(delay))
        }

        pub fn new_fail(stderr: impl Into<String>) -> Self {
            Self::new(MockBehavior::Fail(stderr.into()))
        }

        pub fn new_panic_inducing(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Panic(message.into()))
        }

        /// Targets passed to `dispatch`, in call order
        pub fn calls(&self) -> Vec<SendTarget> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        /// Targets passed to `spawn_detached`, in call order
        pub fn detached_calls(&self) -> Vec<SendTarget> {
            self.detached.lock().unwrap().clone()
        }

        /// Highest number of `dispatch` calls observed running at once
        pub fn peak_in_flight(&self) -> usize {
            self.peak_in_flight.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MessageDispatcher for RecordingDispatcher {
        async fn dispatch(
            &self,
            target: &SendTarget,
            timeout: Option<Duration>,
        ) -> Result<DispatchResult, DispatchError> {
            self.calls.lock().unwrap().push(target.clone());

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

            let result = match &self.behavior {
                MockBehavior::Success => Ok(DispatchResult {
                    exit_code: Some(0),
                    duration_ms: 1,
                    message_id: Some("mock-message-id".to_string()),
                }),
                MockBehavior::Delay(delay) => {
                    tokio::time::sleep(*delay).await;
                    Ok(DispatchResult {
                        exit_code: Some(0),
                        duration_ms: delay.as_millis() as i64,
                        message_id: None,
                    })
                }
                MockBehavior::Fail(stderr) => Err(DispatchError::NonZeroExit {
                    code: Some(255),
                    stderr: stderr.clone(),
                }),
                MockBehavior::Timeout => Err(DispatchError::Timeout(
                    timeout.map(|t| t.as_millis() as i64).unwrap_or(0),
                )),
                MockBehavior::Panic(msg) => {
                    self.in_flight.fetch_sub(1, Ordering::SeqCst);
                    panic!("{}", msg);
                }
            };

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }

        fn spawn_detached(&self, target: &SendTarget) -> Result<(), DispatchError> {
            self.detached.lock().unwrap().push(target.clone());
            match &self.behavior {
                MockBehavior::Fail(stderr) => Err(DispatchError::SpawnFailed(stderr.clone())),
                _ => Ok(()),
            }
        }
    }
}
