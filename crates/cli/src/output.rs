// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use assay_analyze::{AnalysisStatus, RunSummary};
use clap::ValueEnum;
use serde::Serialize;

use crate::color;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render `data` as pretty JSON, or run `text_fn` for human output.
pub fn format_or_json<T: Serialize>(
    format: OutputFormat,
    data: &T,
    text_fn: impl FnOnce(),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Text => {
            text_fn();
        }
    }
    Ok(())
}

/// Print the end-of-run tally. Text mode lists every failed or
/// timed-out action first so the counts below have faces.
pub fn print_run_summary(summary: &RunSummary, format: OutputFormat) -> anyhow::Result<()> {
    let obj = serde_json::json!({
        "scheduled": summary.scheduled,
        "succeeded": summary.succeeded,
        "failed": summary.failed,
        "timed_out": summary.timed_out,
        "skipped": summary.skipped,
        "parse_failures": summary.parse_failures,
        "collect_failures": summary.collect_failures,
        "unknown_checkers": summary.unknown_checkers,
        "exit_code": summary.exit_code(),
    });
    format_or_json(format, &obj, || {
        for result in &summary.results {
            let source = result.source.display().to_string();
            match &result.status {
                AnalysisStatus::Failed { exit } => {
                    let detail = match exit {
                        Some(code) => format!("exit {code}"),
                        None => "no exit code".to_string(),
                    };
                    println!(
                        "failed    [{}] {} ({})",
                        result.engine,
                        color::muted(&source),
                        detail
                    );
                }
                AnalysisStatus::TimedOut => {
                    println!("timed out [{}] {}", result.engine, color::muted(&source));
                }
                AnalysisStatus::Success | AnalysisStatus::Skipped => {}
            }
        }
        println!("{}", color::header("Analysis summary"));
        println!("  scheduled  {}", summary.scheduled);
        println!("  succeeded  {}", summary.succeeded);
        println!("  failed     {}", summary.failed);
        println!("  timed out  {}", summary.timed_out);
        println!("  skipped    {}", summary.skipped);
        if summary.parse_failures > 0 {
            println!("  unparsable compile commands: {}", summary.parse_failures);
        }
        if summary.collect_failures > 0 {
            println!("  ctu collect failures: {}", summary.collect_failures);
        }
        if !summary.unknown_checkers.is_empty() {
            println!(
                "  unknown checkers: {}",
                summary.unknown_checkers.join(", ")
            );
        }
    })
}
