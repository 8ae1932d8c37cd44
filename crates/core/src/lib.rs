// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! assay-core: domain types shared by the assay analysis pipeline

pub mod macros;

pub mod action;
pub mod compiler_info;
pub mod source_id;
pub mod uniqueing;

pub use action::{ActionKind, BuildAction, Language};
pub use compiler_info::CompilerInfo;
pub use source_id::{source_path_hash, SourceId};
pub use uniqueing::UniqueingPolicy;
