// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell-quote aware word splitting for recorded compiler commands.
//!
//! Build tools log commands as single strings with shell quoting intact
//! (`-DNAME="two words"`, escaped spaces in paths). This splitter keeps
//! those semantics without the rest of a shell grammar: no expansion,
//! no substitution, just words.

use thiserror::Error;

/// Errors from splitting a command string into words.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    /// Unterminated single quote.
    #[error("unterminated single quote at position {pos}")]
    UnterminatedSingleQuote {
        /// Byte offset of the opening quote.
        pos: usize,
    },

    /// Unterminated double quote.
    #[error("unterminated double quote at position {pos}")]
    UnterminatedDoubleQuote {
        /// Byte offset of the opening quote.
        pos: usize,
    },

    /// Backslash at end of input with nothing to escape.
    #[error("trailing backslash at position {pos}")]
    TrailingBackslash {
        /// Byte offset of the backslash.
        pos: usize,
    },
}

/// Split `input` into words with POSIX-style quoting.
///
/// Single quotes preserve everything literally. Inside double quotes a
/// backslash escapes only `"`, `\`, `` ` `` and `$`; elsewhere it
/// escapes the next character. Quotes themselves never appear in the
/// produced words.
pub fn tokenize(input: &str) -> Result<Vec<String>, TokenizeError> {
    let mut words = Vec::new();
    let mut current = String::new();
    // Distinguishes "no word yet" from an explicitly empty word ('').
    let mut in_word = false;
    let mut chars = input.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                let mut closed = false;
                for (_, qc) in chars.by_ref() {
                    if qc == '\'' {
                        closed = true;
                        break;
                    }
                    current.push(qc);
                }
                if !closed {
                    return Err(TokenizeError::UnterminatedSingleQuote { pos });
                }
            }
            '"' => {
                in_word = true;
                let mut closed = false;
                while let Some((esc_pos, qc)) = chars.next() {
                    match qc {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => match chars.next() {
                            Some((_, next @ ('"' | '\\' | '`' | '$'))) => current.push(next),
                            Some((_, next)) => {
                                // Backslash keeps its literal meaning
                                // before other characters.
                                current.push('\\');
                                current.push(next);
                            }
                            None => {
                                return Err(TokenizeError::TrailingBackslash { pos: esc_pos })
                            }
                        },
                        _ => current.push(qc),
                    }
                }
                if !closed {
                    return Err(TokenizeError::UnterminatedDoubleQuote { pos });
                }
            }
            '\\' => {
                let Some((_, next)) = chars.next() else {
                    return Err(TokenizeError::TrailingBackslash { pos });
                };
                in_word = true;
                current.push(next);
            }
            _ => {
                in_word = true;
                current.push(ch);
            }
        }
    }

    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
#[path = "tokenize_tests.rs"]
mod tests;
