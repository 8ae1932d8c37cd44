//! Incremental analysis specs
//!
//! The run ledger lets an unchanged action skip its analysis; editing
//! the source or passing `--clean` forces the rerun.

use crate::prelude::*;

fn setup(project: &Project) -> Toolchain {
    let tc = Toolchain::install(project);
    let records = vec![
        compile_record(project, &tc.gcc, "main.c"),
        compile_record(project, &tc.gcc, "util.c"),
    ];
    write_compdb(project, &records);
    tc
}

fn run_json(project: &Project, clang: &str, extra: &[&str]) -> serde_json::Value {
    let mut args = vec![
        "analyze",
        "compile_commands.json",
        "-o",
        "out",
        "--clangsa-binary",
        clang,
        "--format",
        "json",
    ];
    args.extend_from_slice(extra);
    project.assay().args(&args).passes().json()
}

#[test]
fn a_second_run_skips_unchanged_actions() {
    let project = Project::empty();
    let tc = setup(&project);
    let clang = tc.clang_str();

    let first = run_json(&project, &clang, &[]);
    assert_eq!(first["succeeded"], 2);

    let second = run_json(&project, &clang, &[]);
    assert_eq!(second["skipped"], 2);
    assert_eq!(second["succeeded"], 0);
}

#[test]
fn an_edited_source_is_reanalyzed() {
    let project = Project::empty();
    let tc = setup(&project);
    let clang = tc.clang_str();

    run_json(&project, &clang, &[]);
    project.file("util.c", "int util_c(void) { return 1; }\n");

    let summary = run_json(&project, &clang, &[]);
    assert_eq!(summary["succeeded"], 1);
    assert_eq!(summary["skipped"], 1);
}

#[test]
fn clean_reanalyzes_everything() {
    let project = Project::empty();
    let tc = setup(&project);
    let clang = tc.clang_str();

    run_json(&project, &clang, &[]);

    let summary = run_json(&project, &clang, &["--clean"]);
    assert_eq!(summary["succeeded"], 2);
    assert_eq!(summary["skipped"], 0);
}

#[test]
fn a_missing_diagnostic_file_defeats_the_skip() {
    let project = Project::empty();
    let tc = setup(&project);
    let clang = tc.clang_str();

    run_json(&project, &clang, &[]);

    let out = project.path().join("out");
    for name in sarif_names(&out) {
        std::fs::remove_file(out.join(name)).unwrap();
    }

    let summary = run_json(&project, &clang, &[]);
    assert_eq!(summary["succeeded"], 2);
    assert_eq!(summary["skipped"], 0);
}
