// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for run configuration parsing.

use super::*;
use yare::parameterized;

#[parameterized(
    clangsa = { "clangsa", EngineKind::ClangSa },
    tidy = { "tidy", EngineKind::Tidy },
    tidy_long = { "clang-tidy", EngineKind::Tidy },
)]
fn engine_names_parse(s: &str, expected: EngineKind) {
    assert_eq!(EngineKind::parse(s), Some(expected));
}

#[test]
fn unknown_engine_name_is_rejected() {
    assert_eq!(EngineKind::parse("gcc"), None);
    assert_eq!(EngineKind::parse(""), None);
    // Case matters; the CLI spelling is lowercase.
    assert_eq!(EngineKind::parse("ClangSA"), None);
}

#[test]
fn engine_name_round_trips_through_display() {
    assert_eq!(EngineKind::ClangSa.to_string(), "clangsa");
    assert_eq!(EngineKind::Tidy.to_string(), "tidy");
    assert_eq!(EngineKind::parse(EngineKind::ClangSa.name()), Some(EngineKind::ClangSa));
}

#[test]
fn defaults_are_one_clangsa_worker() {
    let config = AnalyzeConfig::new("compile_commands.json", "reports");
    assert_eq!(config.jobs, 1);
    assert_eq!(config.engines, vec![EngineKind::ClangSa]);
    assert_eq!(config.timeout, None);
    assert_eq!(config.ctu, None);
    assert!(config.checkers.is_empty());
    assert!(!config.clean);
    assert!(!config.z3);
}
