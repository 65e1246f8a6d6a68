// Queue depth probe backed by `aws sqs get-queue-attributes`
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use queueburst_core::domain::queue::DEPTH_ATTRIBUTES;
use queueburst_core::domain::{QueueDepth, SendTarget};
use queueburst_core::port::{DispatchError, QueueDepthProbe};

use crate::aws_cli::{check_status, AwsCli};

#[derive(Debug, Deserialize)]
struct GetQueueAttributesOutput {
    #[serde(rename = "Attributes", default)]
    attributes: HashMap<String, String>,
}

pub struct AwsCliQueueDepthProbe {
    cli: AwsCli,
    timeout: Option<Duration>,
}

impl AwsCliQueueDepthProbe {
    pub fn new(cli: AwsCli, timeout: Option<Duration>) -> Self {
        Self { cli, timeout }
    }

    pub fn get_queue_attributes_args(target: &SendTarget) -> Vec<String> {
        let mut args = AwsCli::base_args(target);
        args.extend([
            "get-queue-attributes".to_string(),
            "--queue-url".to_string(),
            target.queue_url.clone(),
            "--attribute-names".to_string(),
        ]);
        args.extend(DEPTH_ATTRIBUTES.iter().map(|name| name.to_string()));
        args.extend(["--output".to_string(), "json".to_string()]);
        args
    }
}

/// Parse the client's JSON reply into a depth
pub(crate) fn parse_depth(stdout: &[u8]) -> Result<QueueDepth, DispatchError> {
    let output: GetQueueAttributesOutput = serde_json::from_slice(stdout)
        .map_err(|e| DispatchError::InvalidOutput(e.to_string()))?;

    QueueDepth::from_attributes(&output.attributes)
        .map_err(|e| DispatchError::InvalidOutput(e.to_string()))
}

#[async_trait]
impl QueueDepthProbe for AwsCliQueueDepthProbe {
    async fn depth(&self, target: &SendTarget) -> Result<QueueDepth, DispatchError> {
        let args = Self::get_queue_attributes_args(target);
        let (output, _) = self.cli.run(&args, self.timeout).await?;
        check_status(&output)?;
        parse_depth(&output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_queue_attributes_args() {
        let target = SendTarget {
            region: "eu-central-1".to_string(),
            endpoint_url: "http://127.0.0.1:9324".to_string(),
            queue_url: "http://localhost:9324/queue/orders".to_string(),
            message_body: String::new(),
        };

        let args = AwsCliQueueDepthProbe::get_queue_attributes_args(&target);

        assert_eq!(&args[5..8], ["get-queue-attributes", "--queue-url", "http://localhost:9324/queue/orders"]);
        assert!(args.contains(&"ApproximateNumberOfMessagesNotVisible".to_string()));
        assert_eq!(&args[args.len() - 2..], ["--output", "json"]);
    }

    #[test]
    fn test_parse_depth() {
        let stdout = br#"{
            "Attributes": {
                "ApproximateNumberOfMessages": "80",
                "ApproximateNumberOfMessagesDelayed": "0",
                "ApproximateNumberOfMessagesNotVisible": "20"
            }
        }"#;

        let depth = parse_depth(stdout).unwrap();
        assert_eq!(depth.total(), 100);
    }

    #[test]
    fn test_parse_depth_rejects_missing_attributes() {
        let err = parse_depth(br#"{"Attributes": {}}"#).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidOutput(_)));

        let err = parse_depth(b"An error occurred (AWS.SimpleQueueService.NonExistentQueue)").unwrap_err();
        assert!(matches!(err, DispatchError::InvalidOutput(_)));
    }
}
