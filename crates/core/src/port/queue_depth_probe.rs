// Queue Depth Probe Port
// Reads the approximate number of messages held by the target queue

use crate::domain::{QueueDepth, SendTarget};
use crate::port::DispatchError;
use async_trait::async_trait;

#[async_trait]
pub trait QueueDepthProbe: Send + Sync {
    /// Query the queue addressed by `target`
    ///
    /// # Errors
    /// - DispatchError::SpawnFailed / NonZeroExit if the client call fails
    /// - DispatchError::InvalidOutput if the attributes cannot be read
    async fn depth(&self, target: &SendTarget) -> Result<QueueDepth, DispatchError>;
}

pub mod mocks {
    use super::*;

    /// Probe that always reports the same depth
    pub struct StaticDepthProbe {
        depth: QueueDepth,
    }

    impl StaticDepthProbe {
        pub fn new(depth: QueueDepth) -> Self {
            Self { depth }
        }
    }

    #[async_trait]
    impl QueueDepthProbe for StaticDepthProbe {
        async fn depth(&self, _target: &SendTarget) -> Result<QueueDepth, DispatchError> {
            Ok(self.depth)
        }
    }
}
