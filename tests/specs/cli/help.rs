//! CLI surface specs
//!
//! Help text, version output, argument validation and the checkers
//! listing command.

use crate::prelude::*;

#[test]
fn no_args_shows_usage_and_exits_two() {
    cli().fails_with(2).stderr_has("Usage:");
}

#[test]
fn help_lists_the_subcommands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("analyze")
        .stdout_has("checkers");
}

#[test]
fn analyze_help_shows_the_pipeline_flags() {
    cli()
        .args(&["analyze", "--help"])
        .passes()
        .stdout_has("--compile-uniqueing")
        .stdout_has("--ctu-collect")
        .stdout_has("--report-hash")
        .stdout_has("--capture-analysis-output")
        .stdout_has("--compiler-info-file");
}

#[test]
fn version_prints_the_crate_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1.0");
}

#[test]
fn an_unknown_analyzer_name_exits_two() {
    cli()
        .args(&["analyze", "db.json", "-o", "out", "--analyzers", "bogus"])
        .fails_with(2)
        .stderr_has("bogus");
}

#[test]
fn conflicting_ctu_modes_are_a_usage_error() {
    cli()
        .args(&["analyze", "db.json", "-o", "out", "--ctu", "--ctu-analyze"])
        .fails_with(2)
        .stderr_has("cannot be used with");
}

#[test]
fn checkers_lists_the_stub_catalogs() {
    let project = Project::empty();
    let tc = Toolchain::install(&project);
    let clang = tc.clang_str();
    let tidy = tc.tidy_str();

    project
        .assay()
        .args(&[
            "checkers",
            "--clangsa-binary",
            &clang,
            "--tidy-binary",
            &tidy,
        ])
        .passes()
        .stdout_has("core.DivideZero")
        .stdout_has("bugprone-use-after-move");
}

#[test]
fn checkers_as_json_groups_by_engine() {
    let project = Project::empty();
    let tc = Toolchain::install(&project);
    let clang = tc.clang_str();
    let tidy = tc.tidy_str();

    let catalogs = project
        .assay()
        .args(&[
            "checkers",
            "--clangsa-binary",
            &clang,
            "--tidy-binary",
            &tidy,
            "--format",
            "json",
        ])
        .passes()
        .json();

    assert_eq!(catalogs["clangsa"][0], "core.DivideZero");
    assert_eq!(catalogs["tidy"][0], "bugprone-use-after-move");
}
