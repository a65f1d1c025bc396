//!# pyre
//!
//! `pyre` is a Rust library for regular expression matching built on Brzozowski derivatives.
//! Instead of compiling a pattern to an NFA and running the subset construction, the pattern
//! is turned into a DFA *directly*: each DFA state is a regular expression, and the transition
//! on a character `c` leads to the derivative of that expression with respect to `c`. Because
//! derivatives are closed under boolean operations, the pattern language supports two operators
//! that mainstream engines lack: intersection (`&`) and complement (`~`).
//!
//! ## Usage
//!
//! ```rust
//! use pyre::parser;
//! use pyre::regex::Regex;
//!
//! fn main() {
//!     // First pass parses the surface syntax without assigning group numbers
//!     let parsed = parser::regex("(a|b)c").unwrap();
//!     // Second step numbers the capture groups and builds the canonical term
//!     let regex = Regex::from(parsed);
//!     let dfa = regex.compile().unwrap();
//!
//!     // Anchored matching returns the longest accepting prefix
//!     let m = dfa.match_anchored("acac").unwrap();
//!     assert_eq!(m.span(), (0, 2));
//!     assert_eq!(m.group(1), Some((0, 1)));
//!
//!     // Scanning finds the leftmost match
//!     let m = dfa.search("xxbcxx").unwrap();
//!     assert_eq!(m.span(), (2, 4));
//!
//!     // Intersection and complement compose freely: everything without "bad" in it
//!     let clean = Regex::from(parser::regex(".*&~.*bad.*").unwrap());
//!     let dfa = clean.compile().unwrap();
//!     assert_eq!(dfa.match_anchored("good things").unwrap().span(), (0, 11));
//! }
//! ```
//!
//! ## Pattern syntax
//!
//! The surface syntax is parsed by [parser::regex]: alternation `|`, intersection `&`,
//! complement `~`, concatenation by juxtaposition, the postfix operators `*`, `+` and `?`,
//! capturing groups `(…)` numbered left to right from 1, character classes `[…]`/`[^…]` with
//! ranges `a-z`, `.` for any character, and `\` to escape a metacharacter. See the
//! [parser](parser) module for details.
//!
//! ## Operations
//!
//! This library currently supports:
//!
//! * [Parsing patterns](parser::regex) and [numbering their capture groups](regex::Regex)
//! * Building canonical terms through the [smart constructors](regex::Term), so that
//!   algebraically equal expressions become structurally equal
//! * Taking the [derivative](regex::deriv::derivative) of a term and deciding its
//!   [nullability](regex::deriv::nullable)
//! * [Compiling a pattern to a DFA](regex::Regex::compile), with a configurable state ceiling
//! * [Anchored matching](dfa::Dfa::match_anchored), [scanning](dfa::Dfa::search) and
//!   [collecting all non-overlapping matches](dfa::Dfa::search_all), each reporting
//!   capture-group spans
//! * [Step-by-step evaluation](dfa::Dfa::evaluator) of an input against a compiled DFA

pub mod dfa;
pub mod parser;
pub mod regex;
mod table;

#[cfg(test)]
mod tests;
