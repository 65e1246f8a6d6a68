//! Queue Burst CLI - send a burst of placeholder messages to a local queue emulator
//!
//! ```text
//! generate-messages <QUEUE_NAME> <PORT> <AMOUNT>
//! ```

mod app;
mod cli;
mod logging;
mod output;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;

use queueburst_core::port::time_provider::SystemTimeProvider;
use queueburst_infra_system::{AwsCli, AwsCliDispatcher, AwsCliQueueDepthProbe};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 1. Initialize logging (stderr; RUST_LOG overrides the filter)
    logging::init(cli.log_format)?;
    debug!("Queue Burst v{} starting", queueburst_core::VERSION);

    // 2. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let aws = AwsCli::new(time_provider).with_program(&cli.aws_bin);
    let dispatcher = Arc::new(AwsCliDispatcher::new(aws.clone()));
    let probe = Arc::new(AwsCliQueueDepthProbe::new(aws, cli.send_timeout()));

    // 3. Run the burst
    let mut stdout = std::io::stdout();
    let all_sent = app::run(&cli, dispatcher, probe, &mut stdout).await?;

    Ok(if all_sent {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
