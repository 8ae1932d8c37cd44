// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for skip list parsing and matching.

use super::*;

#[test]
fn exclude_rule_matches_across_directories() {
    let filter = SkipFilter::parse("-*/third_party/*\n").unwrap();
    assert!(filter.should_skip(Path::new("/proj/third_party/zlib/inflate.c")));
    assert!(!filter.should_skip(Path::new("/proj/src/main.c")));
}

#[test]
fn first_matching_rule_wins() {
    let filter = SkipFilter::parse(
        "+*/vendor/keep/*\n\
         -*/vendor/*\n",
    )
    .unwrap();
    assert!(!filter.should_skip(Path::new("/proj/vendor/keep/a.c")));
    assert!(filter.should_skip(Path::new("/proj/vendor/other/b.c")));
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let filter = SkipFilter::parse(
        "# generated code\n\
         \n\
         -*/gen/*.c\n",
    )
    .unwrap();
    assert!(filter.should_skip(Path::new("/proj/gen/parser.c")));
}

#[test]
fn unmatched_sources_are_analyzed() {
    let filter = SkipFilter::parse("-*/tests/*\n").unwrap();
    assert!(!filter.should_skip(Path::new("/proj/src/lib.c")));
    assert!(SkipFilter::default().is_empty());
    assert!(!SkipFilter::default().should_skip(Path::new("/proj/src/lib.c")));
}

#[test]
fn rule_without_a_sign_is_rejected() {
    let err = SkipFilter::parse("*/tests/*\n").unwrap_err();
    let SkipError::BadRule { line, text } = err else {
        panic!("expected BadRule");
    };
    assert_eq!(line, 1);
    assert_eq!(text, "*/tests/*");
}

#[test]
fn invalid_glob_is_rejected_with_line_number() {
    let err = SkipFilter::parse("-src/ok.c\n-[unclosed\n").unwrap_err();
    assert!(matches!(err, SkipError::BadPattern { line: 2, .. }));
}

#[test]
fn rules_load_from_a_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("skipfile");
    fs::write(&path, "-*/build/*\n").unwrap();
    let filter = SkipFilter::from_file(&path).unwrap();
    assert!(filter.should_skip(Path::new("/proj/build/conftest.c")));

    let err = SkipFilter::from_file(Path::new("/nonexistent/skipfile")).unwrap_err();
    assert!(matches!(err, SkipError::Read { .. }));
}
