// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Policy for collapsing multiple build actions that target the same source.

use serde::{Deserialize, Serialize};

/// How duplicate actions for one source file are resolved before analysis.
///
/// CTU analysis needs exactly one compilation action per source so the
/// cross-TU function index maps unambiguously; the looser policies trade
/// that guarantee for convenience in single-phase runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniqueingPolicy {
    /// Keep every action, duplicates included.
    None,
    /// Any duplicated source is a hard configuration error.
    Strict,
    /// Keep the duplicate whose output identifier sorts first.
    Alpha,
    /// Keep the duplicate whose full command text matches the pattern;
    /// zero or multiple matches are a hard configuration error.
    Regex(String),
}

impl UniqueingPolicy {
    /// Parse the CLI spelling: `none`, `strict`, `alpha`, anything else is
    /// taken as a regular expression (validated at dedup time).
    pub fn parse(s: &str) -> UniqueingPolicy {
        match s {
            "none" => UniqueingPolicy::None,
            "strict" => UniqueingPolicy::Strict,
            "alpha" => UniqueingPolicy::Alpha,
            pattern => UniqueingPolicy::Regex(pattern.to_string()),
        }
    }

    /// Whether this policy guarantees at most one action per source file.
    pub fn guarantees_unique_sources(&self) -> bool {
        !matches!(self, UniqueingPolicy::None)
    }
}

impl Default for UniqueingPolicy {
    fn default() -> Self {
        UniqueingPolicy::None
    }
}

crate::simple_display! {
    UniqueingPolicy {
        None => "none",
        Strict => "strict",
        Alpha => "alpha",
        Regex(..) => "regex",
    }
}

#[cfg(test)]
#[path = "uniqueing_tests.rs"]
mod tests;
