//! Cross translation unit phase specs
//!
//! Collect-only keeps the artifact directory as the product; a full
//! run treats it as scratch space; analyze-only requires it upfront.

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

fn ctu_args<'a>(clang: &'a str, mode: &'a str) -> Vec<&'a str> {
    vec![
        "analyze",
        "compile_commands.json",
        "-o",
        "out",
        mode,
        "--clangsa-binary",
        clang,
        "--format",
        "json",
    ]
}

#[test]
fn a_collect_only_run_keeps_artifacts_and_schedules_nothing() {
    let project = Project::empty();
    let tc = setup(&project);
    let clang = tc.clang_str();

    let summary = project
        .assay()
        .args(&ctu_args(&clang, "--ctu-collect"))
        .passes()
        .json();
    assert_eq!(summary["scheduled"], 0);

    let map = project
        .path()
        .join("out")
        .join("ctu-dir")
        .join("externalDefMap.txt");
    let content = std::fs::read_to_string(&map).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|line| line.contains(".ast")));
}

#[test]
fn an_analyze_only_run_reuses_collected_artifacts() {
    let project = Project::empty();
    let tc = setup(&project);
    let clang = tc.clang_str();

    project
        .assay()
        .args(&ctu_args(&clang, "--ctu-collect"))
        .passes();

    let summary = project
        .assay()
        .args(&ctu_args(&clang, "--ctu-analyze"))
        .passes()
        .json();
    assert_eq!(summary["succeeded"], 2);

    // The artifacts belong to the collect run and survive.
    assert!(project.path().join("out").join("ctu-dir").exists());
}

#[test]
fn a_full_ctu_run_cleans_its_artifacts_up() {
    let project = Project::empty();
    let tc = setup(&project);
    let clang = tc.clang_str();

    let summary = project
        .assay()
        .args(&ctu_args(&clang, "--ctu"))
        .passes()
        .json();
    assert_eq!(summary["succeeded"], 2);
    assert!(!project.path().join("out").join("ctu-dir").exists());
}

#[test]
fn analyze_only_without_artifacts_exits_two() {
    let project = Project::empty();
    let tc = setup(&project);
    let clang = tc.clang_str();

    project
        .assay()
        .args(&[
            "analyze",
            "compile_commands.json",
            "-o",
            "out",
            "--ctu-analyze",
            "--clangsa-binary",
            &clang,
        ])
        .fails_with(2)
        .stderr_has("run the collect phase first");
}

#[test]
fn duplicated_sources_are_rejected_for_ctu() {
    let project = Project::empty();
    let tc = Toolchain::install(&project);
    let record = compile_record(&project, &tc.gcc, "main.c");
    write_compdb(&project, &[record.clone(), record]);

    let clang = tc.clang_str();
    project
        .assay()
        .args(&[
            "analyze",
            "compile_commands.json",
            "-o",
            "out",
            "--ctu",
            "--clangsa-binary",
            &clang,
        ])
        .fails_with(2)
        .stderr_has("one action per source");
}
