// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `assay checkers` - list the checkers the analyzer binaries advertise

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::Args;

use assay_analyze::{AnalyzerEngine, ClangSa, ClangTidy, EngineKind};

use super::analyze::parse_engines;
use crate::color;
use crate::config::FileConfig;
use crate::output::{format_or_json, OutputFormat};

#[derive(Args)]
pub struct CheckersArgs {
    /// Analyzers to query: clangsa, tidy (default: both)
    #[arg(long = "analyzers", value_name = "NAME", num_args = 1..)]
    pub analyzers: Vec<String>,

    /// Clang binary for the static analyzer
    #[arg(long = "clangsa-binary", value_name = "PATH")]
    pub clangsa_binary: Option<String>,

    /// clang-tidy binary
    #[arg(long = "tidy-binary", value_name = "PATH")]
    pub tidy_binary: Option<String>,
}

pub async fn run(args: CheckersArgs, format: OutputFormat) -> Result<()> {
    let file = FileConfig::discover()?;
    let kinds = if args.analyzers.is_empty() {
        vec![EngineKind::ClangSa, EngineKind::Tidy]
    } else {
        parse_engines(&args.analyzers)?
    };

    let mut catalogs: Vec<(EngineKind, Vec<String>)> = Vec::new();
    for kind in kinds {
        let listed = match kind {
            EngineKind::ClangSa => {
                let binary = args
                    .clangsa_binary
                    .clone()
                    .or_else(|| file.binaries.clangsa.clone())
                    .unwrap_or_else(|| "clang".to_string());
                ClangSa::new(binary).checkers().await
            }
            EngineKind::Tidy => {
                let binary = args
                    .tidy_binary
                    .clone()
                    .or_else(|| file.binaries.tidy.clone())
                    .unwrap_or_else(|| "clang-tidy".to_string());
                ClangTidy::new(binary).checkers().await
            }
        };
        let names = listed.with_context(|| format!("cannot list {kind} checkers"))?;
        catalogs.push((kind, names));
    }

    let obj: BTreeMap<&str, &Vec<String>> = catalogs
        .iter()
        .map(|(kind, names)| (kind.name(), names))
        .collect();
    format_or_json(format, &obj, || {
        for (kind, names) in &catalogs {
            println!("{}", color::header(kind.name()));
            for name in names {
                println!("  {name}");
            }
        }
    })
}
