// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for quarantine bundles.

use super::*;
use assay_core::{ActionKind, Language};
use tempfile::TempDir;

fn action(source: &Path, directory: &Path) -> BuildAction {
    BuildAction {
        source: Some(source.to_path_buf()),
        directory: directory.to_path_buf(),
        lang: Some(Language::C),
        kind: ActionKind::Compile,
        analyzer_options: vec!["-DNDEBUG".into()],
        target: None,
        compiler: "gcc".into(),
        output: None,
        original_command: format!("gcc -c -DNDEBUG {}", source.display()),
        compiler_info: None,
    }
}

#[test]
fn bundle_holds_command_invocation_stderr_and_source_copy() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("main.c");
    fs::write(&source, "int main() { return 0; }\n").unwrap();
    let action = action(&source, dir.path());
    let id = SourceId::new(&source, "clangsa");
    let failed_dir = dir.path().join("failed");
    fs::create_dir_all(&failed_dir).unwrap();

    let bundle = FailureBundle::write(
        &failed_dir,
        &id,
        &action,
        "clang --analyze main.c",
        b"main.c:1:1: error: boom\n",
    )
    .unwrap();

    assert_eq!(bundle.dir, failed_dir.join(id.failure_dir_name()));
    assert_eq!(
        fs::read_to_string(bundle.dir.join("build-action")).unwrap(),
        action.original_command,
    );
    assert_eq!(
        fs::read_to_string(bundle.dir.join("analyzer-command")).unwrap(),
        "clang --analyze main.c",
    );
    assert_eq!(
        fs::read_to_string(bundle.dir.join("analyzer-stderr.txt")).unwrap(),
        "main.c:1:1: error: boom\n",
    );

    // The copy mirrors the absolute path under sources-root/.
    let relative = source.strip_prefix("/").unwrap();
    let copy = bundle.dir.join("sources-root").join(relative);
    assert_eq!(fs::read(&copy).unwrap(), fs::read(&source).unwrap());
}

#[test]
fn a_new_bundle_replaces_the_previous_one() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("main.c");
    fs::write(&source, "int main() {}\n").unwrap();
    let action = action(&source, dir.path());
    let id = SourceId::new(&source, "clangsa");
    let failed_dir = dir.path().join("failed");

    let stale = failed_dir.join(id.failure_dir_name()).join("leftover.txt");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, "from a previous run").unwrap();

    let bundle =
        FailureBundle::write(&failed_dir, &id, &action, "clang --analyze", b"err").unwrap();
    assert!(!stale.exists());
    assert_eq!(
        fs::read_to_string(bundle.dir.join("analyzer-stderr.txt")).unwrap(),
        "err",
    );
}

#[test]
fn vanished_source_still_yields_a_bundle() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("deleted.c");
    let action = action(&source, dir.path());
    let id = SourceId::new(&source, "clangsa");
    let failed_dir = dir.path().join("failed");
    fs::create_dir_all(&failed_dir).unwrap();

    let bundle =
        FailureBundle::write(&failed_dir, &id, &action, "clang --analyze", b"err").unwrap();
    assert!(bundle.dir.join("build-action").is_file());
    assert!(bundle.dir.join("analyzer-command").is_file());
    assert!(bundle.dir.join("analyzer-stderr.txt").is_file());
    let relative = source.strip_prefix("/").unwrap();
    assert!(!bundle.dir.join("sources-root").join(relative).exists());
}
