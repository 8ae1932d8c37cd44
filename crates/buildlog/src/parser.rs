// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build command interpretation.
//!
//! Turns one compilation database record into a [`BuildAction`]:
//! unwraps compiler wrappers, classifies the action kind, detects the
//! language and target, and filters the flag list through the static
//! classification table. Two-token flag pairs are consumed atomically
//! so a value token is never mistaken for a source file; they stay two
//! adjacent elements in the result because the options feed subprocess
//! argv directly.

use crate::compdb::CompilationRecord;
use crate::error::ParseError;
use crate::flags;
use crate::tokenize::tokenize;
use assay_core::{ActionKind, BuildAction, Language};
use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// Knobs for command interpretation.
#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    /// A preprocess-only flag co-occurring with a compile flag
    /// resolves to Compile. Set to let the preprocess flag win
    /// instead.
    pub preprocess_wins: bool,
}

/// Parse every record, skipping the unparsable ones. Failures are
/// returned alongside the actions; one bad record never aborts the
/// batch.
pub fn parse_all(
    records: &[CompilationRecord],
    opts: &ParserOptions,
) -> (Vec<BuildAction>, Vec<ParseError>) {
    let mut actions = Vec::with_capacity(records.len());
    let mut failures = Vec::new();
    for record in records {
        match parse_record(record, opts) {
            Ok(action) => actions.push(action),
            Err(err) => {
                warn!(file = %record.file, error = %err, "skipping build record");
                failures.push(err);
            }
        }
    }
    (actions, failures)
}

/// Parse one compilation database record.
pub fn parse_record(
    record: &CompilationRecord,
    opts: &ParserOptions,
) -> Result<BuildAction, ParseError> {
    let tokens = tokenize(&record.command).map_err(|source| ParseError::Tokenize {
        source,
        command: record.command.clone(),
    })?;
    if tokens.is_empty() {
        return Err(ParseError::EmptyCommand {
            file: record.file.clone(),
        });
    }
    if flags::is_assembler_source(&record.file) {
        return Err(ParseError::NotCompilation {
            command: record.command.clone(),
        });
    }

    let compiler = determine_compiler(&tokens, executable_on_path).to_string();
    // When a wrapper was unwrapped the compiler is the second token.
    let first_arg = if compiler == tokens[0] { 1 } else { 2 };

    let mut analyzer_options: Vec<String> = Vec::new();
    let mut has_compile = false;
    let mut has_preprocess = false;
    let mut explicit_lang: Option<Language> = None;
    let mut output: Option<PathBuf> = None;
    let mut arch: Option<String> = None;
    let mut saw_source_arg = false;
    let mut saw_object_arg = false;

    let mut i = first_arg;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        i += 1;
        match token {
            "-c" => has_compile = true,
            "-E" => has_preprocess = true,
            "-x" => {
                let Some(value) = tokens.get(i) else { continue };
                i += 1;
                match Language::from_flag_value(value) {
                    Some(lang) => explicit_lang = Some(lang),
                    None if value.starts_with("assembler") => {
                        return Err(ParseError::NotCompilation {
                            command: record.command.clone(),
                        });
                    }
                    None => {}
                }
            }
            "-o" => {
                if let Some(value) = tokens.get(i) {
                    output = Some(resolve_path(&record.directory, value));
                    i += 1;
                }
            }
            "-arch" => {
                if let Some(value) = tokens.get(i) {
                    arch = Some(value.clone());
                    i += 1;
                }
            }
            "-Xclang" => {
                let Some(value) = tokens.get(i) else { continue };
                i += 1;
                if !flags::xclang_value_dropped(value) {
                    analyzer_options.push(token.to_string());
                    analyzer_options.push(value.clone());
                }
            }
            _ if flags::is_dep_gen(token) => has_preprocess = true,
            _ if flags::takes_dropped_value(token) => {
                if tokens.get(i).is_some() {
                    i += 1;
                }
            }
            _ if flags::is_dropped(token) => {}
            _ if flags::takes_kept_value(token) => {
                analyzer_options.push(token.to_string());
                if let Some(value) = tokens.get(i) {
                    i += 1;
                    let value = if flags::value_is_path(token) {
                        resolve_flag_path(&record.directory, value)
                    } else {
                        value.clone()
                    };
                    analyzer_options.push(value);
                }
            }
            _ if token.starts_with('-') => match flags::split_attached_path(token) {
                Some((flag, value)) => {
                    let value = resolve_flag_path(&record.directory, value);
                    analyzer_options.push(format!("{flag}{value}"));
                }
                None => analyzer_options.push(token.to_string()),
            },
            _ => {
                if flags::is_source_file(token) {
                    saw_source_arg = true;
                } else if flags::is_object_file(token) {
                    saw_object_arg = true;
                }
            }
        }
    }

    let kind = if has_compile && has_preprocess {
        if opts.preprocess_wins {
            ActionKind::Preprocess
        } else {
            ActionKind::Compile
        }
    } else if has_compile {
        ActionKind::Compile
    } else if has_preprocess {
        ActionKind::Preprocess
    } else if saw_source_arg || flags::is_source_file(&record.file) {
        ActionKind::Compile
    } else if saw_object_arg {
        ActionKind::Link
    } else {
        return Err(ParseError::MissingSource {
            command: record.command.clone(),
        });
    };

    let source = match kind {
        ActionKind::Link => None,
        ActionKind::Compile | ActionKind::Preprocess => {
            if record.file.is_empty() {
                return Err(ParseError::MissingSource {
                    command: record.command.clone(),
                });
            }
            Some(resolve_path(&record.directory, &record.file))
        }
    };

    let lang = match kind {
        ActionKind::Link => None,
        ActionKind::Compile | ActionKind::Preprocess => {
            let from_ext = source
                .as_deref()
                .and_then(Path::extension)
                .and_then(|e| e.to_str())
                .and_then(Language::from_extension);
            Some(
                explicit_lang
                    .or(from_ext)
                    .unwrap_or_else(|| default_language(&compiler)),
            )
        }
    };

    Ok(BuildAction {
        source,
        directory: record.directory.clone(),
        lang,
        kind,
        analyzer_options,
        target: arch,
        compiler,
        output,
        original_command: record.command.clone(),
        compiler_info: None,
    })
}

/// Identify the compiler token, unwrapping a `ccache` prefix when the
/// next token is a real executable. `is_executable` is injectable so
/// tests run without a populated `PATH`.
pub fn determine_compiler(tokens: &[String], is_executable: impl Fn(&str) -> bool) -> &str {
    let Some(first) = tokens.first() else {
        return "";
    };
    if Path::new(first).file_name().and_then(|n| n.to_str()) == Some("ccache") {
        if let Some(next) = tokens.get(1) {
            if !next.starts_with('-') && is_executable(next) {
                return next;
            }
        }
    }
    first
}

/// Language assumed when neither `-x` nor the extension decide. Only
/// the executable's basename counts, never its directory.
fn default_language(compiler: &str) -> Language {
    let base = Path::new(compiler)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(compiler);
    if base.contains("++") {
        Language::Cxx
    } else {
        Language::C
    }
}

fn executable_on_path(name: &str) -> bool {
    if name.contains('/') {
        return is_executable_file(Path::new(name));
    }
    let Some(path_var) = env::var_os("PATH") else {
        return false;
    };
    env::split_paths(&path_var).any(|dir| is_executable_file(&dir.join(name)))
}

fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

fn resolve_path(directory: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() || directory.as_os_str().is_empty() {
        normalize(path)
    } else {
        normalize(&directory.join(path))
    }
}

/// Resolve a flag value against the record's directory. Values in the
/// `=sysroot` spelling and absolute paths stay verbatim.
fn resolve_flag_path(directory: &Path, value: &str) -> String {
    if value.starts_with('=')
        || Path::new(value).is_absolute()
        || directory.as_os_str().is_empty()
    {
        return value.to_string();
    }
    normalize(&directory.join(value))
        .to_string_lossy()
        .into_owned()
}

/// Lexical path cleanup: drops `.` components and folds `..` into the
/// preceding component, without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
