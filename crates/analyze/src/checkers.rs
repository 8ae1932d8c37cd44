// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Checker selection and validation.
//!
//! `-e`/`-d` arguments arrive as one ordered toggle list. A name may be
//! an individual checker or a group prefix (`core` covers
//! `core.DivideZero`, `bugprone` covers `bugprone-use-after-move`);
//! later toggles override earlier ones inside the engine, so the order
//! must survive all the way into the invocation. Before dispatch the
//! list is checked against the live engine catalogs; names that select
//! nothing anywhere produce one aggregated warning and are dropped
//! rather than aborting the run.

/// One `-e NAME` / `-d NAME` occurrence, in specification order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerToggle {
    /// Checker or group name as given.
    pub name: String,
    /// `true` for `-e`, `false` for `-d`.
    pub enable: bool,
}

impl CheckerToggle {
    pub fn enable(name: impl Into<String>) -> CheckerToggle {
        CheckerToggle {
            name: name.into(),
            enable: true,
        }
    }

    pub fn disable(name: impl Into<String>) -> CheckerToggle {
        CheckerToggle {
            name: name.into(),
            enable: false,
        }
    }
}

/// Whether a toggle name selects a catalog entry: exact match, or a
/// group prefix ending at a `.` or `-` separator.
pub fn selects(name: &str, catalog_entry: &str) -> bool {
    catalog_entry == name
        || catalog_entry
            .strip_prefix(name)
            .is_some_and(|rest| rest.starts_with('.') || rest.starts_with('-'))
}

/// The toggles that select at least one entry of this catalog, input
/// order preserved. Each engine gets its own view so a tidy-only name
/// never reaches the Clang analyzer's command line.
pub fn for_catalog(toggles: &[CheckerToggle], catalog: &[String]) -> Vec<CheckerToggle> {
    toggles
        .iter()
        .filter(|toggle| catalog.iter().any(|entry| selects(&toggle.name, entry)))
        .cloned()
        .collect()
}

/// Names that select nothing in any catalog, input order, deduplicated.
pub fn unknown_names<'t>(toggles: &'t [CheckerToggle], catalogs: &[Vec<String>]) -> Vec<&'t str> {
    let mut unknown: Vec<&str> = Vec::new();
    for toggle in toggles {
        let selected = catalogs
            .iter()
            .any(|catalog| catalog.iter().any(|entry| selects(&toggle.name, entry)));
        if !selected && !unknown.contains(&toggle.name.as_str()) {
            unknown.push(&toggle.name);
        }
    }
    unknown
}

#[cfg(test)]
#[path = "checkers_tests.rs"]
mod tests;
