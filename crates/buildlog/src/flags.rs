// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static classification table for recorded compiler flags.
//!
//! The parser is a pure function over (tokens, this table). Every flag
//! seen in a build command falls into one class: dropped (diagnostic,
//! link-only, or GCC-internal flags the analyzers reject), consumed
//! with its value (dependency-generation pairs), preserved together
//! with its separate value token, or preserved verbatim. Unrecognized
//! flags are preserved: an opaque flag is more likely to matter to
//! parsing the code than to break the analyzer.
//!
//! Table version 1, matching GCC 13 / Clang 17 option surfaces.

use assay_core::Language;
use regex::RegexSet;
use std::path::Path;
use std::sync::LazyLock;

/// Flags that never reach the analyzer. Warning controls, debug info,
/// link-only inputs, LTO, and GCC-only codegen flags Clang rejects.
#[allow(clippy::expect_used)]
static DROPPED: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        // Warning controls, including -Wl,/-Wa, passthrough.
        r"^-W.*",
        r"^-w$",
        r"^-pedantic-errors$",
        // Debug info.
        r"^-g.*",
        // Link-only.
        r"^-l.+",
        r"^-L.+",
        r"^-shared$",
        r"^-static.*",
        r"^-rdynamic$",
        r"^-r$",
        r"^-s$",
        r"^-(no-)?pie$",
        r"^-nodefaultlibs$",
        r"^-nostartfiles$",
        r"^-nostdlib$",
        // Link-time optimization.
        r"^-flto.*",
        r"^-ffat-lto-objects$",
        r"^-fuse-linker-plugin$",
        // Dependency side outputs that do not imply preprocessing.
        r"^-MM?D$",
        // GCC codegen flags unknown to the Clang frontend.
        r"^-fallow-fetchr-insn$",
        r"^-fcall-saved-.*",
        r"^-fcond-mismatch$",
        r"^-fconserve-stack$",
        r"^-fcrossjumping$",
        r"^-fcse-follow-jumps$",
        r"^-fcse-skip-blocks$",
        r"^-ffixed-r2$",
        r"^-fgcse-lm$",
        r"^-fhoist-adjacent-loads$",
        r"^-findirect-inlining$",
        r"^-finline-limit.*",
        r"^-finline-local-initialisers$",
        r"^-fipa-sra$",
        r"^-fmacro-prefix-map.*",
        r"^-fmerge-constants$",
        r"^-fno-aggressive-loop-optimizations$",
        r"^-f(no-)?allow-store-data-races$",
        r"^-fno-canonical-system-headers$",
        r"^-f(no-)?code-hoisting$",
        r"^-fno-defer-pop$",
        r"^-fno-delete-null-pointer-checks$",
        r"^-fno-extended-identifiers$",
        r"^-fno-jump-table$",
        r"^-fno-keep-static-consts$",
        r"^-fno-merge-const-bfstores$",
        r"^-f(no-)?reorder-functions$",
        r"^-fno-strength-reduce$",
        r"^-fno-toplevel-reorder$",
        r"^-fno-unit-at-a-time$",
        r"^-fno-var-tracking-assignments$",
        r"^-fpartial-inlining$",
        r"^-fpeephole2$",
        r"^-fregmove$",
        r"^-frename-registers$",
        r"^-freorder-blocks$",
        r"^-frerun-cse-after-loop$",
        r"^-fsched-spec$",
        r"^-fstack-usage$",
        r"^-fstack-reuse.*",
        r"^-fthread-jumps$",
        r"^-ftree-pre$",
        r"^-ftree-switch-conversion$",
        r"^-ftree-tail-merge$",
        // Machine flags with no analysis meaning.
        r"^-m(no-)?abm$",
        r"^-m(no-)?sdata$",
        r"^-m(no-)?spe$",
        r"^-m(no-)?string$",
        r"^-m(no-)?dsbt$",
        r"^-m(no-)?fixed-ssp$",
        r"^-m(no-)?pointers-to-nested-functions$",
        r"^-mno-fp-ret-in-387$",
        r"^-mpreferred-stack-boundary.*",
        r"^-mpcrel-func-addr$",
        r"^-mrecord-mcount$",
        r"^-maccumulate-outgoing-args$",
        r"^-mcall-aixdesc$",
        r"^-mppa3-addr-bug$",
        r"^-mtraceback=.*",
        r"^-mtext=.*",
        r"^-misel$",
        r"^-mfunction-return=.*",
        r"^-mindirect-branch-register$",
        r"^-mindirect-branch=.*",
        r"^-mfix-cortex-m3-ldrd$",
        r"^-mmultiple$",
        r"^-mupdate$",
        r"^-mavx256-split-unaligned-(load|store)$",
        r"^-mskip-rax-setup$",
        r"^-mfloat-gprs.*",
        r"^-mabi.*",
        r"^-mxl.*",
    ])
    .expect("constant flag patterns are valid")
});

/// Flags taking a separate value token, both preserved in order.
const PAIRED_KEPT: &[&str] = &[
    "-I",
    "-D",
    "-U",
    "-F",
    "-idirafter",
    "-iquote",
    "-isystem",
    "-imacros",
    "-include",
    "--include",
    "-iprefix",
    "-iwithprefix",
    "-iwithprefixbefore",
    "-isysroot",
    "--sysroot",
    "-iframework",
    "-imultilib",
    "-iapinotes-modules",
    "--gcc-toolchain",
];

/// Flags taking a separate value token, both dropped. The value is a
/// dependency file, a linker argument, or a tuning parameter, never a
/// source.
const PAIRED_DROPPED: &[&str] =
    &["-MF", "-MT", "-MQ", "-MJ", "--param", "-Xlinker", "-Xassembler", "-z", "-u"];

/// Bare dependency-generation flags. They imply preprocessing when no
/// compile flag is present.
const DEP_GEN: &[&str] = &["-M", "-MM", "-MG", "-MP", "-MV"];

/// `-Xclang <value>` pairs dropped because the value changes the
/// compilation mode or feeds LLVM internals.
const XCLANG_DROPPED: &[&str] = &[
    "-module-file-info",
    "-S",
    "-emit-llvm",
    "-emit-llvm-bc",
    "-emit-llvm-only",
    "-emit-llvm-uselists",
    "-rewrite-objc",
    "-mllvm",
    "-instcombine-lower-dbg-declare=0",
];

/// Preserved flags whose value names a filesystem path, in either the
/// attached (`-I/x`) or separate (`-I /x`) spelling. Relative values
/// get resolved against the record's directory. Longest prefixes
/// listed first so `-isysroot/x` never matches `-isystem`.
const PATH_VALUED: &[&str] = &[
    "-iwithprefixbefore",
    "-iapinotes-modules",
    "-iwithprefix",
    "-iframework",
    "--gcc-toolchain",
    "-idirafter",
    "-isysroot",
    "-imultilib",
    "--sysroot",
    "--include",
    "-isystem",
    "-imacros",
    "-include",
    "-iprefix",
    "-iquote",
    "-I",
    "-F",
];

/// True when the analyzers must never see this flag.
pub fn is_dropped(flag: &str) -> bool {
    DROPPED.is_match(flag)
}

/// True for flags that consume the next token as a preserved value.
pub fn takes_kept_value(flag: &str) -> bool {
    PAIRED_KEPT.contains(&flag)
}

/// True for flags that consume the next token and discard both.
pub fn takes_dropped_value(flag: &str) -> bool {
    PAIRED_DROPPED.contains(&flag)
}

/// True for bare dependency-generation flags (`-M`, `-MM`, ...).
pub fn is_dep_gen(flag: &str) -> bool {
    DEP_GEN.contains(&flag)
}

/// True when a `-Xclang <value>` pair must be dropped.
pub fn xclang_value_dropped(value: &str) -> bool {
    XCLANG_DROPPED.contains(&value)
}

/// Split an attached path-valued flag (`-I/home/x`) into flag and
/// value. Returns `None` for bare flags and non-path flags.
pub fn split_attached_path(token: &str) -> Option<(&str, &str)> {
    for flag in PATH_VALUED {
        if let Some(value) = token.strip_prefix(flag) {
            if !value.is_empty() {
                return Some((flag, value));
            }
        }
    }
    None
}

/// True for flags whose separate value is a filesystem path.
pub fn value_is_path(flag: &str) -> bool {
    PATH_VALUED.contains(&flag)
}

/// True for arguments with a recognized source-file extension.
pub fn is_source_file(token: &str) -> bool {
    extension(token).and_then(Language::from_extension).is_some()
}

/// True for object files and other linker inputs.
pub fn is_object_file(token: &str) -> bool {
    matches!(extension(token), Some("o" | "obj" | "a" | "so" | "dylib"))
        || token.contains(".so.")
}

/// True for assembler sources, which no analyzer consumes.
pub fn is_assembler_source(token: &str) -> bool {
    matches!(extension(token), Some("s" | "S" | "sx"))
}

fn extension(token: &str) -> Option<&str> {
    Path::new(token).extension().and_then(|e| e.to_str())
}

#[cfg(test)]
#[path = "flags_tests.rs"]
mod tests;
