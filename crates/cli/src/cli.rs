// Command-line surface

use clap::{Parser, ValueEnum};
use std::time::Duration;

use queueburst_core::application::BurstOptions;
use queueburst_core::domain::target::{
    DEFAULT_ENDPOINT_HOST, DEFAULT_MESSAGE_BODY, DEFAULT_QUEUE_URL_BASE, DEFAULT_REGION,
};
use queueburst_core::domain::SendDefaults;
use queueburst_infra_system::aws_cli::DEFAULT_PROGRAM;

#[derive(Parser, Debug)]
#[command(name = "generate-messages")]
#[command(about = "Send a burst of placeholder messages to a local queue emulator", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Queue name (last segment of the queue URL)
    pub queue_name: String,

    /// Port of the emulator endpoint
    pub port: String,

    /// Number of messages to send
    #[arg(allow_hyphen_values = true)]
    pub amount: String,

    /// Region passed to the client
    #[arg(long, default_value = DEFAULT_REGION)]
    pub region: String,

    /// Host of the endpoint override
    #[arg(long, default_value = DEFAULT_ENDPOINT_HOST)]
    pub endpoint_host: String,

    /// Queue URL prefix; the queue name is appended
    #[arg(long, default_value = DEFAULT_QUEUE_URL_BASE)]
    pub queue_url_base: String,

    /// Body of every message
    #[arg(long, default_value = DEFAULT_MESSAGE_BODY)]
    pub message_body: String,

    /// Queue-client executable
    #[arg(long, env = "QUEUEBURST_AWS_BIN", default_value = DEFAULT_PROGRAM)]
    pub aws_bin: String,

    /// Maximum sends running at once (unbounded when omitted)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_in_flight: Option<u64>,

    /// Per-send timeout in milliseconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    /// Fire-and-forget: start every send and exit without waiting
    #[arg(long)]
    pub detach: bool,

    /// Print the queue depth after the burst completes
    #[arg(long, conflicts_with = "detach")]
    pub report_depth: bool,

    /// Summary format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Suppress the text summary
    #[arg(short, long)]
    pub quiet: bool,

    /// Log format written to stderr
    #[arg(long, env = "QUEUEBURST_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl Cli {
    pub fn send_timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn burst_options(&self) -> BurstOptions {
        BurstOptions {
            defaults: SendDefaults {
                region: self.region.clone(),
                endpoint_host: self.endpoint_host.clone(),
                queue_url_base: self.queue_url_base.clone(),
                message_body: self.message_body.clone(),
            },
            max_in_flight: self.max_in_flight.map(|n| n as usize),
            send_timeout: self.send_timeout(),
        }
    }
}
