//! End-to-end analysis specs
//!
//! A clean run over stub toolchains produces per-source reports, the
//! compiler info snapshot, the uniqueing audit and the run ledger.

use crate::prelude::*;

#[test]
fn a_clean_run_produces_reports_and_artifacts() {
    let project = Project::empty();
    let tc = Toolchain::install(&project);
    let records = vec![
        compile_record(&project, &tc.gcc, "main.c"),
        compile_record(&project, &tc.gcc, "util.c"),
    ];
    write_compdb(&project, &records);

    let clang = tc.clang_str();
    project
        .assay()
        .args(&[
            "analyze",
            "compile_commands.json",
            "-o",
            "out",
            "--clangsa-binary",
            &clang,
        ])
        .passes()
        .stdout_has("Analysis summary")
        .stdout_has("succeeded  2");

    let out = project.path().join("out");
    assert_eq!(sarif_names(&out).len(), 2);
    assert!(out.join("compiler_info.json").exists());
    assert!(out.join("unique_compile_commands.json").exists());
    assert!(out.join("run_ledger.json").exists());
    assert!(!out.join("failed").exists());

    // The stub gcc answered the standard and target probes.
    let info = std::fs::read_to_string(out.join("compiler_info.json")).unwrap();
    assert!(info.contains("x86_64-pc-linux-gnu"));
    assert!(info.contains("-std=gnu17"));
}

#[test]
fn the_summary_is_json_when_asked() {
    let project = Project::empty();
    let tc = Toolchain::install(&project);
    let records = vec![
        compile_record(&project, &tc.gcc, "main.c"),
        compile_record(&project, &tc.gcc, "util.c"),
    ];
    write_compdb(&project, &records);

    let clang = tc.clang_str();
    let summary = project
        .assay()
        .args(&[
            "analyze",
            "compile_commands.json",
            "-o",
            "out",
            "--clangsa-binary",
            &clang,
            "--format",
            "json",
        ])
        .passes()
        .json();

    assert_eq!(summary["scheduled"], 2);
    assert_eq!(summary["succeeded"], 2);
    assert_eq!(summary["failed"], 0);
    assert_eq!(summary["exit_code"], 0);
}

#[test]
fn every_action_fans_out_to_every_engine() {
    let project = Project::empty();
    let tc = Toolchain::install(&project);
    let records = vec![compile_record(&project, &tc.gcc, "main.c")];
    write_compdb(&project, &records);

    let clang = tc.clang_str();
    let tidy = tc.tidy_str();
    project
        .assay()
        .args(&[
            "analyze",
            "compile_commands.json",
            "-o",
            "out",
            "--analyzers",
            "clangsa",
            "tidy",
            "--clangsa-binary",
            &clang,
            "--tidy-binary",
            &tidy,
        ])
        .passes();

    let names = sarif_names(&project.path().join("out"));
    assert_eq!(names.len(), 2);
    assert!(names.iter().any(|name| name.contains("_clangsa_")));
    assert!(names.iter().any(|name| name.contains("_tidy_")));
}

#[test]
fn a_missing_compilation_database_exits_two() {
    let project = Project::empty();
    project
        .assay()
        .args(&["analyze", "compile_commands.json", "-o", "out"])
        .fails_with(2)
        .stderr_has("cannot read compilation database");
}

#[test]
fn unparsable_records_are_counted_not_fatal() {
    let project = Project::empty();
    let tc = Toolchain::install(&project);
    let good = compile_record(&project, &tc.gcc, "main.c");
    let broken = serde_json::json!({
        "directory": project.path(),
        "command": "",
        "file": "broken.c",
    });
    write_compdb(&project, &[good, broken]);

    let clang = tc.clang_str();
    let summary = project
        .assay()
        .args(&[
            "analyze",
            "compile_commands.json",
            "-o",
            "out",
            "--clangsa-binary",
            &clang,
            "--format",
            "json",
        ])
        .passes()
        .json();

    assert_eq!(summary["succeeded"], 1);
    assert_eq!(summary["parse_failures"], 1);
}

#[test]
fn unknown_checker_names_are_reported_not_fatal() {
    let project = Project::empty();
    let tc = Toolchain::install(&project);
    let records = vec![compile_record(&project, &tc.gcc, "main.c")];
    write_compdb(&project, &records);

    let clang = tc.clang_str();
    project
        .assay()
        .args(&[
            "analyze",
            "compile_commands.json",
            "-o",
            "out",
            "--clangsa-binary",
            &clang,
            "-e",
            "core.DivideZero",
            "-e",
            "totally.bogus",
        ])
        .passes()
        .stdout_has("unknown checkers: totally.bogus");
}
