// Burst command: wiring between parsed arguments, the generator and the summary

use anyhow::{Context, Result};
use std::io::Write;
use std::sync::Arc;
use tracing::warn;

use queueburst_core::application::{BurstGenerator, CompletionMode};
use queueburst_core::domain::{BurstPlan, BurstReport, QueueDepth};
use queueburst_core::port::id_provider::UuidProvider;
use queueburst_core::port::time_provider::SystemTimeProvider;
use queueburst_core::port::{MessageDispatcher, QueueDepthProbe};

use crate::cli::{Cli, OutputFormat};
use crate::output;

/// Run one burst and print its summary.
///
/// Returns whether every send succeeded (detached: whether every send started).
pub async fn run<W: Write>(
    cli: &Cli,
    dispatcher: Arc<dyn MessageDispatcher>,
    probe: Arc<dyn QueueDepthProbe>,
    out: &mut W,
) -> Result<bool> {
    let mode = if cli.detach {
        CompletionMode::Detach
    } else {
        CompletionMode::Join
    };

    let generator = BurstGenerator::new(
        dispatcher,
        Arc::new(SystemTimeProvider),
        Arc::new(UuidProvider),
        cli.burst_options(),
    );

    let report = generator
        .generate_messages(&cli.queue_name, &cli.port, &cli.amount, mode)
        .await
        .context("Cannot generate messages")?;

    let depth = if cli.report_depth {
        read_depth(cli, &generator, probe.as_ref()).await?
    } else {
        None
    };

    write_summary(cli, &report, depth, out)?;

    Ok(succeeded(&report))
}

/// Depth is informational; a failed lookup is logged, not fatal
async fn read_depth(
    cli: &Cli,
    generator: &BurstGenerator,
    probe: &dyn QueueDepthProbe,
) -> Result<Option<QueueDepth>> {
    let plan = BurstPlan::parse(&cli.queue_name, &cli.port, &cli.amount)?;
    let target = generator.target_for(&plan);

    match probe.depth(&target).await {
        Ok(depth) => Ok(Some(depth)),
        Err(e) => {
            warn!(queue_url = %target.queue_url, error = %e, "Could not read queue depth");
            Ok(None)
        }
    }
}

fn write_summary<W: Write>(
    cli: &Cli,
    report: &BurstReport,
    depth: Option<QueueDepth>,
    out: &mut W,
) -> Result<()> {
    match cli.output {
        OutputFormat::Json => output::write_json(out, report, depth),
        // Detached bursts stay silent unless something failed to start
        OutputFormat::Text if report.detached && report.failed == 0 => Ok(()),
        OutputFormat::Text if cli.quiet => Ok(()),
        OutputFormat::Text => output::write_text(out, report, depth),
    }
}

fn succeeded(report: &BurstReport) -> bool {
    if report.detached {
        report.failed == 0
    } else {
        report.all_succeeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use queueburst_core::port::message_dispatcher::mocks::RecordingDispatcher;
    use queueburst_core::port::queue_depth_probe::mocks::StaticDepthProbe;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["generate-messages"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn probe() -> Arc<dyn QueueDepthProbe> {
        Arc::new(StaticDepthProbe::new(QueueDepth {
            visible: 3,
            delayed: 0,
            not_visible: 0,
        }))
    }

    #[tokio::test]
    async fn test_run_sends_and_summarizes() {
        let dispatcher = Arc::new(RecordingDispatcher::new_success());
        let cli = parse(&["orders", "9324", "3"]);
        let mut out = Vec::new();

        let ok = run(&cli, dispatcher.clone(), probe(), &mut out).await.unwrap();

        assert!(ok);
        assert_eq!(dispatcher.call_count(), 3);
        assert!(String::from_utf8(out).unwrap().contains("Sent 3 messages"));
    }

    #[tokio::test]
    async fn test_run_parameter_error() {
        let dispatcher = Arc::new(RecordingDispatcher::new_success());
        let cli = parse(&["orders", "9324", "abc"]);
        let mut out = Vec::new();

        let err = run(&cli, dispatcher.clone(), probe(), &mut out).await.unwrap_err();

        assert!(format!("{:#}", err).contains("amount 'abc'"));
        assert_eq!(dispatcher.call_count(), 0);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_run_negative_amount_reaches_validation() {
        let dispatcher = Arc::new(RecordingDispatcher::new_success());
        let cli = parse(&["orders", "9324", "-1"]);
        let mut out = Vec::new();

        let err = run(&cli, dispatcher, probe(), &mut out).await.unwrap_err();

        assert!(format!("{:#}", err).contains("non-negative"));
    }

    #[tokio::test]
    async fn test_run_failures_exit_non_zero() {
        let dispatcher = Arc::new(RecordingDispatcher::new_fail("Connection refused"));
        let cli = parse(&["orders", "9324", "2"]);
        let mut out = Vec::new();

        let ok = run(&cli, dispatcher, probe(), &mut out).await.unwrap();

        assert!(!ok);
        assert!(String::from_utf8(out).unwrap().contains("2 of 2 sends failed"));
    }

    #[tokio::test]
    async fn test_run_detached_is_silent() {
        let dispatcher = Arc::new(RecordingDispatcher::new_success());
        let cli = parse(&["orders", "9324", "4", "--detach"]);
        let mut out = Vec::new();

        let ok = run(&cli, dispatcher.clone(), probe(), &mut out).await.unwrap();

        assert!(ok);
        assert_eq!(dispatcher.detached_calls().len(), 4);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_run_json_with_depth() {
        let dispatcher = Arc::new(RecordingDispatcher::new_success());
        let cli = parse(&["orders", "9324", "3", "--report-depth", "--output", "json"]);
        let mut out = Vec::new();

        run(&cli, dispatcher, probe(), &mut out).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["dispatched"], 3);
        assert_eq!(value["queue_url"], "http://localhost:9324/queue/orders");
        assert_eq!(value["queue_depth"]["visible"], 3);
    }
}
