// Burst summary rendering

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use tabled::{Table, Tabled};

use queueburst_core::domain::{BurstReport, QueueDepth};

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    #[serde(flatten)]
    report: &'a BurstReport,
    queue_depth: Option<QueueDepth>,
}

pub fn write_json<W: Write>(out: &mut W, report: &BurstReport, depth: Option<QueueDepth>) -> Result<()> {
    let summary = JsonSummary {
        report,
        queue_depth: depth,
    };
    serde_json::to_writer_pretty(&mut *out, &summary)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_text<W: Write>(out: &mut W, report: &BurstReport, depth: Option<QueueDepth>) -> Result<()> {
    let headline = if report.detached {
        format!(
            "{} of {} sends failed to start for {}",
            report.failed, report.requested, report.queue_url
        )
        .yellow()
        .bold()
    } else if report.all_succeeded() {
        format!("✓ Sent {} messages to {}", report.succeeded, report.queue_url)
            .green()
            .bold()
    } else {
        format!(
            "✗ {} of {} sends failed for {}",
            report.unsuccessful(),
            report.dispatched,
            report.queue_url
        )
        .red()
        .bold()
    };
    writeln!(out, "{}", headline)?;
    writeln!(out)?;

    let mut rows = vec![
        SummaryRow {
            metric: "Requested",
            value: report.requested.to_string(),
        },
        SummaryRow {
            metric: "Dispatched",
            value: report.dispatched.to_string(),
        },
    ];
    if !report.detached {
        rows.extend([
            SummaryRow {
                metric: "Succeeded",
                value: report.succeeded.to_string(),
            },
            SummaryRow {
                metric: "Failed",
                value: report.failed.to_string(),
            },
            SummaryRow {
                metric: "Timed out",
                value: report.timed_out.to_string(),
            },
            SummaryRow {
                metric: "Aborted",
                value: report.aborted.to_string(),
            },
            SummaryRow {
                metric: "Total (ms)",
                value: report.total_ms.to_string(),
            },
        ]);
    }
    rows.push(SummaryRow {
        metric: "Launch (ms)",
        value: report.launch_ms.to_string(),
    });
    if let Some(depth) = depth {
        rows.push(SummaryRow {
            metric: "Queue depth",
            value: format!(
                "{} (visible {}, delayed {}, in flight {})",
                depth.total(),
                depth.visible,
                depth.delayed,
                depth.not_visible
            ),
        });
    }

    writeln!(out, "{}", Table::new(rows))?;
    Ok(())
}
