// send-message dispatcher backed by the aws CLI
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use queueburst_core::domain::SendTarget;
use queueburst_core::port::{DispatchError, DispatchResult, MessageDispatcher};

use crate::aws_cli::{check_status, AwsCli};

/// Fields of the client's JSON reply that are worth keeping
#[derive(Debug, Deserialize)]
struct SendMessageOutput {
    #[serde(rename = "MessageId")]
    message_id: Option<String>,
}

/// Dispatches one `aws sqs send-message` call per message
pub struct AwsCliDispatcher {
    cli: AwsCli,
}

impl AwsCliDispatcher {
    pub fn new(cli: AwsCli) -> Self {
        info!(program = %cli.program(), "Using aws CLI dispatcher");
        Self { cli }
    }

    /// Full argument vector for one send. Every value is a separate argument,
    /// so queue names and bodies are never re-parsed by a shell.
    pub fn send_message_args(target: &SendTarget) -> Vec<String> {
        let mut args = AwsCli::base_args(target);
        args.extend([
            "send-message".to_string(),
            "--queue-url".to_string(),
            target.queue_url.clone(),
            "--message-body".to_string(),
            target.message_body.clone(),
        ]);
        args
    }
}

/// Pull the MessageId out of the client's stdout, if it printed JSON
fn parse_message_id(stdout: &[u8]) -> Option<String> {
    serde_json::from_slice::<SendMessageOutput>(stdout)
        .ok()
        .and_then(|out| out.message_id)
}

#[async_trait]
impl MessageDispatcher for AwsCliDispatcher {
    async fn dispatch(
        &self,
        target: &SendTarget,
        timeout: Option<Duration>,
    ) -> Result<DispatchResult, DispatchError> {
        let args = Self::send_message_args(target);
        let (output, duration_ms) = self.cli.run(&args, timeout).await?;
        check_status(&output)?;

        Ok(DispatchResult {
            exit_code: output.status.code(),
            duration_ms,
            message_id: parse_message_id(&output.stdout),
        })
    }

    fn spawn_detached(&self, target: &SendTarget) -> Result<(), DispatchError> {
        let args = Self::send_message_args(target);
        let pid = self.cli.spawn_detached(&args)?;
        debug!(pid = ?pid, queue_url = %target.queue_url, "Detached send started");
        Ok(())
    }
}
