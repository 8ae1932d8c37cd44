// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Normalized representation of one compiler invocation.

use crate::compiler_info::CompilerInfo;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What a compiler invocation does with its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Translates one source file into an object (or runs the analyzer).
    Compile,
    /// Runs the preprocessor only (`-E` without a compile step).
    Preprocess,
    /// Combines object files; carries no single source.
    Link,
}

crate::simple_display! {
    ActionKind {
        Compile => "compile",
        Preprocess => "preprocess",
        Link => "link",
    }
}

/// Source language of a translation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Language {
    C,
    #[serde(rename = "c++")]
    Cxx,
    #[serde(rename = "objective-c")]
    ObjC,
    #[serde(rename = "objective-c++")]
    ObjCxx,
}

crate::simple_display! {
    Language {
        C => "c",
        Cxx => "c++",
        ObjC => "objective-c",
        ObjCxx => "objective-c++",
    }
}

impl Language {
    /// Map a source file extension to a language.
    ///
    /// Capital `.C` is C++ by GCC convention, so the caller must not
    /// lowercase the extension before calling.
    pub fn from_extension(ext: &str) -> Option<Language> {
        match ext {
            "c" | "i" => Some(Language::C),
            "C" | "cc" | "cp" | "cpp" | "CPP" | "cxx" | "c++" | "ii" => Some(Language::Cxx),
            "m" | "mi" => Some(Language::ObjC),
            "mm" | "mii" => Some(Language::ObjCxx),
            _ => None,
        }
    }

    /// Map an explicit `-x <lang>` flag value to a language.
    pub fn from_flag_value(value: &str) -> Option<Language> {
        match value {
            "c" | "c-header" | "cpp-output" => Some(Language::C),
            "c++" | "c++-header" | "c++-cpp-output" => Some(Language::Cxx),
            "objective-c" | "objc" | "objective-c-header" => Some(Language::ObjC),
            "objective-c++" | "objc++" | "objective-c++-header" => Some(Language::ObjCxx),
            _ => None,
        }
    }

    /// The value passed back to a compiler via `-x`.
    pub fn as_flag(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cxx => "c++",
            Language::ObjC => "objective-c",
            Language::ObjCxx => "objective-c++",
        }
    }
}

/// One compilation unit of interest, parsed out of a compilation-database
/// record and enriched with implicit compiler configuration.
///
/// Invariant: `Compile` and `Preprocess` actions carry exactly one source
/// file; `Link` actions carry none. The parser is the only constructor that
/// upholds this; afterwards the action is immutable apart from
/// [`BuildAction::enrich`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildAction {
    /// Absolute, normalized source path. `None` for link actions.
    pub source: Option<PathBuf>,
    /// Working directory the original command ran in.
    pub directory: PathBuf,
    /// Detected language. `None` for link actions.
    pub lang: Option<Language>,
    pub kind: ActionKind,
    /// Analyzer-relevant options, filtered and merged, in command order.
    pub analyzer_options: Vec<String>,
    /// Target architecture from `-arch`, when present for this language.
    pub target: Option<String>,
    /// Compiler executable exactly as written in the command.
    pub compiler: String,
    /// The `-o` value; Alpha uniqueing orders duplicate actions by it.
    pub output: Option<PathBuf>,
    /// Verbatim original command, preserved for failure reporting.
    pub original_command: String,
    /// Implicit compiler configuration, attached after probing.
    #[serde(skip)]
    pub compiler_info: Option<Arc<CompilerInfo>>,
}

impl BuildAction {
    /// Whether the scheduler should hand this action to an analyzer.
    pub fn is_analyzable(&self) -> bool {
        self.kind == ActionKind::Compile && self.source.is_some()
    }

    /// The source path, or an empty path for link actions.
    pub fn source_path(&self) -> &Path {
        self.source.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// Attach probed compiler info. Enrichment happens once, between
    /// deduplication and scheduling.
    pub fn enrich(&mut self, info: Arc<CompilerInfo>) {
        self.compiler_info = Some(info);
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
