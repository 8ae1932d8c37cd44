// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for SARIF-to-record extraction.

use super::*;
use crate::sarif::tests::CLANG_SARIF;

#[test]
fn clang_result_maps_to_a_full_record() {
    let log: SarifLog = serde_json::from_str(CLANG_SARIF).unwrap();
    let records = ReportRecord::from_log(&log);
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.file, PathBuf::from("/proj/main.cpp"));
    assert_eq!((record.line, record.column), (4, 10));
    assert_eq!(record.checker, "core.NullDereference");
    assert_eq!(
        record.message,
        "Dereference of null pointer (loaded from variable 'p')"
    );
    assert_eq!(record.severity.as_deref(), Some("warning"));
    assert_eq!(record.function.as_deref(), Some("main"));
    assert_eq!(record.file_name(), "main.cpp");

    assert_eq!(record.path.len(), 2);
    assert_eq!(record.path[0].line, 3);
    assert_eq!(
        record.path[0].message,
        "'p' initialized to a null pointer value"
    );
    assert_eq!(record.path[1].line, 4);
}

#[test]
fn flowless_result_synthesizes_its_report_point_as_the_path() {
    // clang-tidy style: a plain warning with no codeFlows.
    let result: SarifResult = serde_json::from_str(
        r#"{
            "ruleId": "readability-magic-numbers",
            "level": "warning",
            "message": { "text": "42 is a magic number" },
            "locations": [ {
                "physicalLocation": {
                    "artifactLocation": { "uri": "file:///proj/calc.cpp" },
                    "region": { "startLine": 12, "startColumn": 9 }
                }
            } ]
        }"#,
    )
    .unwrap();

    let record = ReportRecord::from_result(&result).unwrap();
    assert_eq!(record.path.len(), 1);
    assert_eq!(record.path[0].file, PathBuf::from("/proj/calc.cpp"));
    assert_eq!((record.path[0].line, record.path[0].column), (12, 9));
    assert_eq!(record.path[0].message, "42 is a magic number");
    assert_eq!(record.function, None);
}

#[test]
fn result_without_physical_location_is_not_hashable() {
    let result: SarifResult = serde_json::from_str(
        r#"{ "ruleId": "x", "message": { "text": "global note" } }"#,
    )
    .unwrap();
    assert!(ReportRecord::from_result(&result).is_none());
}

#[test]
fn step_without_file_inherits_the_report_file() {
    let result: SarifResult = serde_json::from_str(
        r#"{
            "ruleId": "c",
            "message": { "text": "m" },
            "locations": [ {
                "physicalLocation": {
                    "artifactLocation": { "uri": "file:///proj/a.c" },
                    "region": { "startLine": 2, "startColumn": 1 }
                }
            } ],
            "codeFlows": [ { "threadFlows": [ { "locations": [
                { "location": { "message": { "text": "step" },
                                "physicalLocation": { "region": { "startLine": 1, "startColumn": 5 } } } }
            ] } ] } ]
        }"#,
    )
    .unwrap();

    let record = ReportRecord::from_result(&result).unwrap();
    assert_eq!(record.path[0].file, PathBuf::from("/proj/a.c"));
    assert_eq!(record.path[0].line, 1);
}
