//! Queue depth probe against a stub get-queue-attributes client
#![cfg(unix)]

mod common;

use common::StubClient;
use queueburst_core::domain::{BurstPlan, SendDefaults, SendTarget};
use queueburst_core::port::{DispatchError, QueueDepthProbe};
use queueburst_infra_system::AwsCliQueueDepthProbe;
use std::time::Duration;

fn target() -> SendTarget {
    let plan = BurstPlan::parse("orders", "9324", "0").unwrap();
    SendTarget::for_plan(&plan, &SendDefaults::default())
}

#[tokio::test]
async fn test_depth_sums_reported_attributes() {
    let stub = StubClient::new(
        r#"cat <<'JSON'
{
    "Attributes": {
        "ApproximateNumberOfMessages": "7",
        "ApproximateNumberOfMessagesDelayed": "1",
        "ApproximateNumberOfMessagesNotVisible": "2"
    }
}
JSON"#,
    );
    let probe = AwsCliQueueDepthProbe::new(stub.cli(), Some(Duration::from_secs(5)));

    let depth = probe.depth(&target()).await.unwrap();

    assert_eq!(depth.visible, 7);
    assert_eq!(depth.delayed, 1);
    assert_eq!(depth.not_visible, 2);
    assert_eq!(depth.total(), 10);
}

#[tokio::test]
async fn test_depth_client_failure() {
    let stub = StubClient::failing();
    let probe = AwsCliQueueDepthProbe::new(stub.cli(), None);

    let err = probe.depth(&target()).await.unwrap_err();

    assert!(matches!(err, DispatchError::NonZeroExit { code: Some(255), .. }));
}

#[tokio::test]
async fn test_depth_garbled_output() {
    let stub = StubClient::new("echo 'QueueUrl: http://localhost:9324/queue/orders'");
    let probe = AwsCliQueueDepthProbe::new(stub.cli(), None);

    let err = probe.depth(&target()).await.unwrap_err();

    assert!(matches!(err, DispatchError::InvalidOutput(_)));
}
