//! # pyre parser
//! This module parses the surface syntax of patterns into a [ParsedRegex], a tree that
//! mirrors the source. Converting that tree into a [Regex](crate::regex::Regex) (via
//! `From`) assigns the capture group numbers and builds the canonical term; the split keeps
//! the grammar free of mutable state and pins group numbering to source order rather than
//! canonical order.
//!
//! ## Syntax
//! There are twelve reserved characters: `(`, `)`, `[`, `]`, `|`, `&`, `~`, `*`, `+`, `?`,
//! `.` and `\`. Any other character stands for itself; a reserved character is written by
//! escaping it with a backslash (`\`), and `\n`, `\t` and `\r` denote the usual control
//! characters. Concatenation is juxtaposition. In order of increasing precedence:
//!
//! * `|` is alternation,
//! * `&` is intersection: `r&s` matches whatever both `r` and `s` match,
//! * `~` is complement: `~r` matches exactly the strings `r` does not. It binds looser than
//!   concatenation, so `~ab` is the complement of `ab`, not `(~a)b`,
//! * the postfix operators: `*` (zero or more), `+` (one or more, shorthand for `rr*`) and
//!   `?` (optional, shorthand for `r` or the empty string).
//!
//! Parenthesis `(`/`)` groups and captures; groups are numbered left to right by opening
//! parenthesis, starting at 1. A character class `[…]` matches one character from the
//! listed characters and `a-z` ranges, and `[^…]` matches one character not listed. `.`
//! matches any character, newlines included. Leading and trailing whitespace is ignored,
//! but all whitespace within the expression is significant.
//!
//! Here are some examples:
//! * `(ab)+c` matches `abc`, `ababc`, `abababc`, ...
//! * `[a-c]*&~.*bb.*` matches strings of `a`, `b`, `c` without a double `b`
//! * `.*\.rs` matches strings ending in `.rs`
//!
//! ```
//! use pyre::parser;
//! use pyre::regex::Regex;
//!
//! let regex = Regex::from(parser::regex("(a|b)(c)?").unwrap());
//! assert_eq!(regex.group_count(), 2);
//! // Reserved characters need escaping
//! assert!(parser::regex("a|*").is_err());
//! assert!(parser::regex(r"a|\*").is_ok());
//! ```

mod regex;

use nom::{combinator::all_consuming, error::Error, Finish};

/// A pattern as written: the parse tree before group numbering and canonicalization.
/// `Seq`, `Alt` and `And` always carry at least two items; single items are not wrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRegex {
    Alt(Vec<ParsedRegex>),
    And(Vec<ParsedRegex>),
    Seq(Vec<ParsedRegex>),
    Not(Box<ParsedRegex>),
    Star(Box<ParsedRegex>),
    Plus(Box<ParsedRegex>),
    Opt(Box<ParsedRegex>),
    Group(Box<ParsedRegex>),
    Class { negated: bool, items: Vec<ClassItem> },
    Dot,
    Char(char),
}

/// One entry of a character class: a single character or an inclusive range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassItem {
    Single(char),
    Range(char, char),
}

/// Parses a pattern according to the format above. The whole string must be parsable,
/// otherwise this function errors; the error carries the position where parsing stopped.
/// Use [Regex::from](crate::regex::Regex) to number the capture groups and obtain a
/// compilable pattern.
pub fn regex(input: &str) -> Result<ParsedRegex, Error<&str>> {
    all_consuming(regex::full_regex)(input)
        .finish()
        .map(|(_, regex)| regex)
}
