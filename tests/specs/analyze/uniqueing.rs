//! Compile command uniqueing and skip list specs

use crate::prelude::*;

/// Two actions over the same source with different outputs; the
/// `zz.o` variant comes first in the database.
fn duplicated_records(project: &Project, tc: &Toolchain) -> Vec<serde_json::Value> {
    let first = compile_record(project, &tc.gcc, "main.c");
    let first = serde_json::json!({
        "directory": first["directory"],
        "command": format!("{} -c main.c -o zz.o", tc.gcc.display()),
        "file": "main.c",
    });
    let second = serde_json::json!({
        "directory": project.path(),
        "command": format!("{} -c main.c -o aa.o", tc.gcc.display()),
        "file": "main.c",
    });
    vec![first, second]
}

#[test]
fn strict_uniqueing_aborts_before_any_analysis() {
    let project = Project::empty();
    let tc = Toolchain::install(&project);
    write_compdb(&project, &duplicated_records(&project, &tc));

    let clang = tc.clang_str();
    project
        .assay()
        .args(&[
            "analyze",
            "compile_commands.json",
            "-o",
            "out",
            "--compile-uniqueing",
            "strict",
            "--clangsa-binary",
            &clang,
        ])
        .fails_with(2)
        .stderr_has("duplicate build actions");

    let out = project.path().join("out");
    assert!(sarif_names(&out).is_empty());
    assert!(!out.join("failed").exists());
}

#[test]
fn alpha_uniqueing_keeps_the_first_output_alphabetically() {
    let project = Project::empty();
    let tc = Toolchain::install(&project);
    write_compdb(&project, &duplicated_records(&project, &tc));

    let clang = tc.clang_str();
    let summary = project
        .assay()
        .args(&[
            "analyze",
            "compile_commands.json",
            "-o",
            "out",
            "--compile-uniqueing",
            "alpha",
            "--clangsa-binary",
            &clang,
            "--format",
            "json",
        ])
        .passes()
        .json();
    assert_eq!(summary["scheduled"], 1);

    let audit = std::fs::read_to_string(
        project.path().join("out").join("unique_compile_commands.json"),
    )
    .unwrap();
    assert!(audit.contains("aa.o"));
    assert!(!audit.contains("zz.o"));
}

#[test]
fn a_regex_policy_picks_the_matching_action() {
    let project = Project::empty();
    let tc = Toolchain::install(&project);
    write_compdb(&project, &duplicated_records(&project, &tc));

    let clang = tc.clang_str();
    let summary = project
        .assay()
        .args(&[
            "analyze",
            "compile_commands.json",
            "-o",
            "out",
            "--compile-uniqueing",
            "zz\\.o",
            "--clangsa-binary",
            &clang,
            "--format",
            "json",
        ])
        .passes()
        .json();
    assert_eq!(summary["scheduled"], 1);

    let audit = std::fs::read_to_string(
        project.path().join("out").join("unique_compile_commands.json"),
    )
    .unwrap();
    assert!(audit.contains("zz.o"));
    assert!(!audit.contains("aa.o"));
}

#[test]
fn the_skip_list_excludes_matching_sources() {
    let project = Project::empty();
    let tc = Toolchain::install(&project);
    let records = vec![
        compile_record(&project, &tc.gcc, "main.c"),
        compile_record(&project, &tc.gcc, "util.c"),
    ];
    write_compdb(&project, &records);
    project.file("skipfile", "-*/util.c\n");

    let clang = tc.clang_str();
    let summary = project
        .assay()
        .args(&[
            "analyze",
            "compile_commands.json",
            "-o",
            "out",
            "--skip",
            "skipfile",
            "--clangsa-binary",
            &clang,
            "--format",
            "json",
        ])
        .passes()
        .json();
    assert_eq!(summary["scheduled"], 1);

    let names = sarif_names(&project.path().join("out"));
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with("main.c_"));
}
