// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! assay-buildlog: compilation database interpretation.
//!
//! Turns raw compiler invocations recorded by a build into normalized
//! [`BuildAction`](assay_core::BuildAction)s: shell-quote aware
//! tokenization, flag classification, compiler wrapper unwrapping,
//! implicit compiler configuration probing, and uniqueing of duplicate
//! actions per source file.

pub mod compdb;
pub mod compiler_info;
pub mod dedupe;
pub mod error;
pub mod flags;
pub mod parser;
pub mod skip;
pub mod tokenize;

pub use compdb::{join_words, CompilationRecord};
pub use compiler_info::{CompilerInfoCache, ProbeOptions};
pub use dedupe::dedupe;
pub use error::{DedupeError, LogError, ParseError};
pub use parser::{parse_all, parse_record, ParserOptions};
pub use skip::{SkipError, SkipFilter};
pub use tokenize::tokenize;
