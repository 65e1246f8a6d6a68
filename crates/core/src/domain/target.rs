// Send Target - the fixed arguments shared by every send of a burst

use super::burst::BurstPlan;
use serde::{Deserialize, Serialize};

pub const DEFAULT_REGION: &str = "eu-central-1";
pub const DEFAULT_ENDPOINT_HOST: &str = "127.0.0.1";
pub const DEFAULT_QUEUE_URL_BASE: &str = "http://localhost:9324/queue";
pub const DEFAULT_MESSAGE_BODY: &str = "come random message";

/// Values that do not come from the positional arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendDefaults {
    pub region: String,
    pub endpoint_host: String,
    pub queue_url_base: String,
    pub message_body: String,
}

impl Default for SendDefaults {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint_host: DEFAULT_ENDPOINT_HOST.to_string(),
            queue_url_base: DEFAULT_QUEUE_URL_BASE.to_string(),
            message_body: DEFAULT_MESSAGE_BODY.to_string(),
        }
    }
}

/// Everything the queue-client tool needs for one send-message call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendTarget {
    pub region: String,
    pub endpoint_url: String,
    pub queue_url: String,
    pub message_body: String,
}

impl SendTarget {
    /// Build the target for a plan.
    ///
    /// Endpoint: `http://<endpoint_host>:<port>`
    /// Queue URL: `<queue_url_base>/<queue_name>`
    pub fn for_plan(plan: &BurstPlan, defaults: &SendDefaults) -> Self {
        Self {
            region: defaults.region.clone(),
            endpoint_url: format!("http://{}:{}", defaults.endpoint_host, plan.port.as_str()),
            queue_url: format!(
                "{}/{}",
                defaults.queue_url_base.trim_end_matches('/'),
                plan.queue_name.as_str()
            ),
            message_body: defaults.message_body.clone(),
        }
    }
}
