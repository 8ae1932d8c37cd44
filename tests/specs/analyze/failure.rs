//! Failure quarantine specs
//!
//! A failing or timed-out analysis leaves a reproduction bundle under
//! `failed/` and the run exits 3. A later success clears the bundle.

use crate::prelude::*;

const CRASHING_CLANG: &str = "echo 'Assertion failed: bogus state' >&2\nexit 7\n";

#[test]
fn a_crashing_analyzer_is_quarantined_and_exits_three() {
    let project = Project::empty();
    let tc = Toolchain::install(&project);
    write_compdb(&project, &[compile_record(&project, &tc.gcc, "main.c")]);
    let bad = project.script("bin/bad-clang", CRASHING_CLANG);
    let bad = bad.display().to_string();

    project
        .assay()
        .args(&[
            "analyze",
            "compile_commands.json",
            "-o",
            "out",
            "--clangsa-binary",
            &bad,
        ])
        .fails_with(3)
        .stdout_has("failed")
        .stdout_has("exit 7");

    let out = project.path().join("out");
    let bundles = subdirs(&out.join("failed"));
    assert_eq!(bundles.len(), 1);
    let bundle = &bundles[0];

    // The build action is the verbatim compile command.
    let build_action = std::fs::read_to_string(bundle.join("build-action")).unwrap();
    assert_eq!(build_action, format!("{} -c main.c", tc.gcc.display()));

    let stderr = std::fs::read_to_string(bundle.join("analyzer-stderr.txt")).unwrap();
    assert!(stderr.contains("Assertion failed"));

    // The source copy under sources-root is byte-identical.
    let source = project.path().join("main.c");
    let copied = bundle
        .join("sources-root")
        .join(source.strip_prefix("/").unwrap());
    similar_asserts::assert_eq!(
        std::fs::read(&copied).unwrap(),
        std::fs::read(&source).unwrap()
    );
}

#[test]
fn a_timeout_kills_the_analyzer_and_exits_three() {
    let project = Project::empty();
    let tc = Toolchain::install(&project);
    write_compdb(&project, &[compile_record(&project, &tc.gcc, "main.c")]);
    let slow = project.script("bin/slow-clang", "sleep 5\n");
    let slow = slow.display().to_string();

    let summary = project
        .assay()
        .args(&[
            "analyze",
            "compile_commands.json",
            "-o",
            "out",
            "--timeout",
            "1",
            "--clangsa-binary",
            &slow,
            "--format",
            "json",
        ])
        .fails_with(3)
        .json();

    assert_eq!(summary["timed_out"], 1);
    assert_eq!(summary["succeeded"], 0);
}

#[test]
fn a_later_success_clears_the_stale_bundle() {
    let project = Project::empty();
    let tc = Toolchain::install(&project);
    write_compdb(&project, &[compile_record(&project, &tc.gcc, "main.c")]);

    let marker = project.path().join("fail-now");
    let body = format!(
        r#"if [ -e "{marker}" ]; then
  echo 'induced crash' >&2
  exit 1
fi
out=""
prev=""
for a in "$@"; do
  [ "$prev" = "-o" ] && out="$a"
  prev="$a"
done
printf '%s' '{{"version":"2.1.0","runs":[]}}' > "$out"
"#,
        marker = marker.display()
    );
    let flaky = project.script("bin/flaky-clang", &body);
    let flaky = flaky.display().to_string();
    std::fs::write(&marker, "").unwrap();

    let args = [
        "analyze",
        "compile_commands.json",
        "-o",
        "out",
        "--clangsa-binary",
        &flaky,
    ];
    project.assay().args(&args).fails_with(3);
    let failed = project.path().join("out").join("failed");
    assert_eq!(subdirs(&failed).len(), 1);

    std::fs::remove_file(&marker).unwrap();
    project.assay().args(&args).passes();
    assert!(subdirs(&failed).is_empty());
}

#[test]
fn capture_keeps_stdout_and_stderr_for_successes() {
    let project = Project::empty();
    let tc = Toolchain::install(&project);
    write_compdb(&project, &[compile_record(&project, &tc.gcc, "main.c")]);

    let chatty = project.script(
        "bin/chatty-clang",
        r#"out=""
prev=""
for a in "$@"; do
  [ "$prev" = "-o" ] && out="$a"
  prev="$a"
done
echo 'analysis note'
echo 'warning: something minor' >&2
printf '%s' '{"version":"2.1.0","runs":[]}' > "$out"
"#,
    );
    let chatty = chatty.display().to_string();

    project
        .assay()
        .args(&[
            "analyze",
            "compile_commands.json",
            "-o",
            "out",
            "--capture-analysis-output",
            "--clangsa-binary",
            &chatty,
        ])
        .passes();

    let success = project.path().join("out").join("success");
    let entries: Vec<String> = std::fs::read_dir(&success)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    let stdout_file = entries
        .iter()
        .find(|name| name.ends_with(".stdout.txt"))
        .expect("captured stdout file");
    let content = std::fs::read_to_string(success.join(stdout_file)).unwrap();
    assert!(content.contains("analysis note"));
    assert!(entries.iter().any(|name| name.ends_with(".stderr.txt")));
}
