// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `assay analyze` - run analyzers over a compilation database

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{ArgMatches, Args};
use tracing::debug;

use assay_analyze::{run_analysis, AnalyzeConfig, CheckerToggle, CtuPhase, EngineKind};
use assay_buildlog::ParserOptions;
use assay_core::UniqueingPolicy;
use assay_report::HashMode;

use crate::config::FileConfig;
use crate::exit_error::ExitError;
use crate::output::{self, OutputFormat};

#[cfg(test)]
#[path = "analyze_tests.rs"]
mod tests;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Compilation database (compile_commands.json)
    pub compile_commands: PathBuf,

    /// Directory for reports and run artifacts
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: PathBuf,

    /// Number of concurrent analyzer processes
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Kill an analyzer that outlives this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Analyzers to run: clangsa, tidy (default: clangsa)
    #[arg(long = "analyzers", value_name = "NAME", num_args = 1..)]
    pub analyzers: Vec<String>,

    /// Enable a checker or checker group (repeatable, order matters)
    #[arg(short = 'e', long = "enable", value_name = "CHECKER")]
    pub enable: Vec<String>,

    /// Disable a checker or checker group (repeatable, order matters)
    #[arg(short = 'd', long = "disable", value_name = "CHECKER")]
    pub disable: Vec<String>,

    /// Skip list file: `-` lines exclude matching sources, `+` lines
    /// re-include them, first match wins
    #[arg(short = 'i', long = "skip", alias = "ignore", value_name = "FILE")]
    pub skip: Option<PathBuf>,

    /// How duplicate compile commands per source are resolved:
    /// none, strict, alpha, or a regex over the command text
    #[arg(long = "compile-uniqueing", value_name = "MODE", default_value = "none")]
    pub compile_uniqueing: String,

    /// Derive report identity without bug-path context
    #[arg(long = "report-hash", value_name = "TYPE", value_parser = ["context-free"])]
    pub report_hash: Option<String>,

    /// Collect cross-TU artifacts, analyze against them, then drop them
    #[arg(long, conflicts_with_all = ["ctu_collect", "ctu_analyze"])]
    pub ctu: bool,

    /// Only collect cross-TU artifacts and keep them for a later run
    #[arg(long = "ctu-collect", conflicts_with = "ctu_analyze")]
    pub ctu_collect: bool,

    /// Analyze against artifacts kept by an earlier --ctu-collect run
    #[arg(long = "ctu-analyze")]
    pub ctu_analyze: bool,

    /// Keep analyzer stdout/stderr for successful actions too
    #[arg(long = "capture-analysis-output")]
    pub capture_analysis_output: bool,

    /// Drop previous results and analyze from scratch
    #[arg(short = 'c', long)]
    pub clean: bool,

    /// Use the Z3 SMT solver where the engine supports it
    #[arg(long, value_name = "ON|OFF", value_parser = ["on", "off"])]
    pub z3: Option<String>,

    /// Reuse a recorded compiler info file; listed compilers are not probed
    #[arg(long = "compiler-info-file", value_name = "FILE")]
    pub compiler_info_file: Option<PathBuf>,

    /// Drop GCC include-fixed directories from probed include paths
    #[arg(long = "skip-gcc-fix-include")]
    pub skip_gcc_fix_include: bool,

    /// A preprocess flag beats a compile flag when both occur in one command
    #[arg(long = "preprocess-wins")]
    pub preprocess_wins: bool,

    /// Clang binary for the static analyzer and the CTU tools
    #[arg(long = "clangsa-binary", value_name = "PATH")]
    pub clangsa_binary: Option<String>,

    /// clang-tidy binary
    #[arg(long = "tidy-binary", value_name = "PATH")]
    pub tidy_binary: Option<String>,
}

pub async fn run(args: AnalyzeArgs, toggles: Vec<CheckerToggle>, format: OutputFormat) -> Result<()> {
    let file = FileConfig::discover()?;
    let config = build_config(&args, toggles, &file)?;
    debug!(
        jobs = config.jobs,
        engines = ?config.engines,
        ctu = ?config.ctu,
        "analysis configured"
    );

    let summary = match run_analysis(config).await {
        Ok(summary) => summary,
        Err(err) => return Err(ExitError::new(2, err.to_string()).into()),
    };

    output::print_run_summary(&summary, format)?;
    match summary.exit_code() {
        0 => Ok(()),
        // The summary already named the failures; the exit code is the
        // only thing left to deliver.
        code => Err(ExitError::new(code, String::new()).into()),
    }
}

/// Merge `-e`/`-d` occurrences back into one list ordered by their
/// position on the command line. Later toggles override earlier ones
/// inside the engine, so `-d core -e core.DivideZero` and the reverse
/// spelling mean different things.
pub fn ordered_toggles(matches: &ArgMatches) -> Vec<CheckerToggle> {
    let mut entries: Vec<(usize, CheckerToggle)> = Vec::new();
    if let (Some(values), Some(indices)) = (
        matches.get_many::<String>("enable"),
        matches.indices_of("enable"),
    ) {
        for (index, name) in indices.zip(values) {
            entries.push((index, CheckerToggle::enable(name.as_str())));
        }
    }
    if let (Some(values), Some(indices)) = (
        matches.get_many::<String>("disable"),
        matches.indices_of("disable"),
    ) {
        for (index, name) in indices.zip(values) {
            entries.push((index, CheckerToggle::disable(name.as_str())));
        }
    }
    entries.sort_by_key(|(index, _)| *index);
    entries.into_iter().map(|(_, toggle)| toggle).collect()
}

/// Engine names as given on the command line or in `assay.toml`.
/// Unknown names abort with a configuration error; duplicates collapse.
pub(crate) fn parse_engines(names: &[String]) -> Result<Vec<EngineKind>> {
    let mut engines = Vec::new();
    for name in names {
        let kind = EngineKind::parse(name).ok_or_else(|| {
            ExitError::new(
                2,
                format!("unknown analyzer '{name}' (expected clangsa or tidy)"),
            )
        })?;
        if !engines.contains(&kind) {
            engines.push(kind);
        }
    }
    Ok(engines)
}

fn build_config(
    args: &AnalyzeArgs,
    toggles: Vec<CheckerToggle>,
    file: &FileConfig,
) -> Result<AnalyzeConfig> {
    let mut config = AnalyzeConfig::new(&args.compile_commands, &args.output);

    config.jobs = args.jobs.or(file.jobs).unwrap_or(1).max(1);
    config.timeout = args.timeout.or(file.timeout).map(Duration::from_secs);

    let names = if args.analyzers.is_empty() {
        &file.analyzers
    } else {
        &args.analyzers
    };
    if !names.is_empty() {
        config.engines = parse_engines(names)?;
    }

    config.checkers = toggles;
    config.ctu = if args.ctu {
        Some(CtuPhase::Both)
    } else if args.ctu_collect {
        Some(CtuPhase::Collect)
    } else if args.ctu_analyze {
        Some(CtuPhase::Analyze)
    } else {
        None
    };
    config.uniqueing = UniqueingPolicy::parse(&args.compile_uniqueing);
    if args.report_hash.is_some() {
        config.hash_mode = HashMode::ContextFree;
    }
    config.skip_file = args.skip.clone();
    config.compiler_info_file = args.compiler_info_file.clone();
    config.capture_output = args.capture_analysis_output;
    config.clean = args.clean;
    config.z3 = args.z3.as_deref() == Some("on");
    config.skip_gcc_fix_headers = args.skip_gcc_fix_include;
    config.parser = ParserOptions {
        preprocess_wins: args.preprocess_wins,
    };
    config.clangsa_binary = args
        .clangsa_binary
        .clone()
        .or_else(|| file.binaries.clangsa.clone());
    config.tidy_binary = args
        .tidy_binary
        .clone()
        .or_else(|| file.binaries.tidy.clone());
    Ok(config)
}
