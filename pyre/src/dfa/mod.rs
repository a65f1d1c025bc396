//! # Deterministic finite automaton
//! The DFA module includes the [Dfa] struct, the compiled form of a pattern. It is produced
//! by [Regex::compile](crate::regex::Regex::compile), which runs the derivative worklist
//! construction: starting from the canonical root term, every state's term is derived once
//! per block of its character-class partition, new terms are interned as new states, and the
//! construction runs until no unexplored state remains. Brzozowski's theorem (together with
//! the canonical form kept by the smart constructors) guarantees that this terminates; a
//! configurable state ceiling turns pathological growth into a
//! [CompileError::TooManyStates] instead of a long build.
//!
//! A compiled DFA is immutable and can be shared across threads by reference; all per-match
//! state lives in the call. Matching needs no backtracking and no stack: the matcher is a
//! tight loop over (state, position, capture table).
//!
//! ## Example
//! ```
//! use pyre::parser;
//! use pyre::regex::Regex;
//!
//! let regex = Regex::from(parser::regex("(a|b)c").unwrap());
//! let dfa = regex.compile().unwrap();
//!
//! // Anchored matching: the longest accepting prefix wins
//! let m = dfa.match_anchored("ac").unwrap();
//! assert_eq!(m.span(), (0, 2));
//! assert_eq!(m.group(1), Some((0, 1)));
//! assert!(dfa.match_anchored("ca").is_none());
//!
//! // Scanning: all non-overlapping matches, left to right
//! let all = dfa.search_all("ac bc cc");
//! assert_eq!(all.len(), 2);
//! assert_eq!(all[0].span(), (0, 2));
//! assert_eq!(all[1].span(), (3, 5));
//! ```
//!
//! ## Matching semantics
//! * [Dfa::match_anchored] starts at offset 0 and reports the longest prefix on which the
//!   DFA is in an accepting state, together with the capture spans recorded at that point.
//!   Group 0 is the whole match.
//! * [Dfa::search] tries every start offset left to right and returns the first match.
//! * [Dfa::search_all] collects non-overlapping matches; after a match over `start..end` it
//!   resumes at `end`, or just past `start` when the match was empty, so it always makes
//!   progress.
//!
//! All offsets are byte offsets into the input, end exclusive.

use crate::regex::class::ClassSet;
use crate::regex::deriv::CaptureEdit;
use crate::regex::Term;
use crate::table::Table;
pub use build::CompileError;
pub use eval::{DfaEvaluator, Match};
use std::sync::Arc;

pub mod build;
pub mod eval;

/// A deterministic finite automaton compiled from a pattern: an indexed table of states,
/// each carrying its canonical term, an accept flag and a transition per block of the
/// state's character-class partition. Transitions carry the capture edits to replay when
/// they are taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    pub(crate) states: Vec<DfaState>,
    pub(crate) initial_state: usize,
    pub(crate) group_count: usize,
}

/// A state of a compiled DFA
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaState {
    pub(crate) term: Arc<Term>,
    pub(crate) accepting: bool,
    pub(crate) dead: bool,
    pub(crate) transitions: Vec<DfaTransition>,
}

/// A transition of a compiled DFA: taken when the current character is in `class`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaTransition {
    pub(crate) class: ClassSet,
    pub(crate) target: usize,
    pub(crate) edits: Vec<CaptureEdit>,
}

impl DfaState {
    /// Gets the canonical term this state stands for
    pub fn term(&self) -> &Arc<Term> {
        &self.term
    }

    /// Checks if this state is accepting, that is, if its term is nullable
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// Checks if no accepting state is reachable from this state. The matcher stops early
    /// when it lands in a dead state.
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Gets the outgoing transitions. Their classes are pairwise disjoint and cover the
    /// whole alphabet, so exactly one of them applies to any character.
    pub fn transitions(&self) -> &[DfaTransition] {
        self.transitions.as_slice()
    }
}

impl DfaTransition {
    /// Gets the character class this transition is taken on
    pub fn class(&self) -> &ClassSet {
        &self.class
    }

    /// Gets the index of the target state
    pub fn target(&self) -> usize {
        self.target
    }

    /// Gets the capture edits replayed when this transition is taken
    pub fn edits(&self) -> &[CaptureEdit] {
        self.edits.as_slice()
    }
}

impl Dfa {
    /// Gets the states of this DFA
    pub fn states(&self) -> &[DfaState] {
        self.states.as_slice()
    }

    /// Gets the initial state of this DFA
    pub fn initial_state(&self) -> &DfaState {
        &self.states[self.initial_state]
    }

    /// Gets the index of the initial state of this DFA
    pub fn initial_state_index(&self) -> usize {
        self.initial_state
    }

    /// Gets the number of capture groups of the pattern this DFA was compiled from
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// Gets an evaluator, which steps through this DFA one character at a time
    pub fn evaluator(&self) -> DfaEvaluator<'_> {
        self.into()
    }

    /// Matches anchored at offset 0 and returns the longest accepting prefix, or `None` if
    /// no prefix of the input is accepted
    pub fn match_anchored(&self, input: &str) -> Option<Match> {
        self.match_at(input, 0)
    }

    /// Scans left to right and returns the leftmost match, or `None` if the pattern matches
    /// nowhere in the input
    pub fn search(&self, input: &str) -> Option<Match> {
        let mut at = 0;
        loop {
            if let Some(found) = self.match_at(input, at) {
                return Some(found);
            }
            at = Self::next_char_boundary(input, at)?;
        }
    }

    /// Scans left to right and collects all non-overlapping matches. After a match over
    /// `start..end` the scan resumes at `end`, or just past `start` for an empty match.
    pub fn search_all(&self, input: &str) -> Vec<Match> {
        let mut matches = Vec::new();
        let mut at = 0;
        loop {
            let next = match self.match_at(input, at) {
                Some(found) => {
                    let (start, end) = found.span();
                    matches.push(found);
                    if end > start {
                        Some(end)
                    } else {
                        Self::next_char_boundary(input, start)
                    }
                }
                None => Self::next_char_boundary(input, at),
            };
            match next {
                Some(next) => at = next,
                None => break,
            }
        }
        matches
    }

    fn match_at(&self, input: &str, start: usize) -> Option<Match> {
        let mut evaluator = self.evaluator();
        let mut best = evaluator
            .is_accepting()
            .then(|| (start, evaluator.group_spans()));
        for (offset, c) in input[start..].char_indices() {
            if evaluator.is_dead() {
                break;
            }
            let at = start + offset;
            evaluator.step(c, at);
            if evaluator.is_accepting() {
                best = Some((at + c.len_utf8(), evaluator.group_spans()));
            }
        }
        best.map(|(end, mut groups)| {
            groups[0] = Some((start, end));
            Match::new(start, end, groups)
        })
    }

    fn next_char_boundary(input: &str, at: usize) -> Option<usize> {
        input[at..].chars().next().map(|c| at + c.len_utf8())
    }

    /// Generates a table of this DFA suitable for printing: one row per transition, with
    /// the state's flags and index, the character class, the target state and the capture
    /// edits of the transition
    pub fn to_table(&self) -> String {
        self.gen_table("→")
    }

    /// Generates a table of this DFA suitable for printing. The arrow for the initial state
    /// is "->"
    pub fn ascii_table(&self) -> String {
        self.gen_table("->")
    }

    fn gen_table(&self, arrow: &str) -> String {
        let mut table = Table::default();
        for (idx, state) in self.states.iter().enumerate() {
            for (offset, transition) in state.transitions.iter().enumerate() {
                let mut row = if offset == 0 {
                    vec![
                        if idx == self.initial_state { arrow } else { "" }.to_string(),
                        if state.accepting { "*" } else { "" }.to_string(),
                        format!("s{idx}"),
                    ]
                } else {
                    vec![String::new(), String::new(), String::new()]
                };
                row.push(transition.class.to_string());
                row.push(format!("s{}", transition.target));
                row.push(
                    transition
                        .edits
                        .iter()
                        .map(|edit| edit.to_string())
                        .collect::<Vec<_>>()
                        .join(", "),
                );
                table.push_row(row);
            }
        }
        table.to_string(" ")
    }
}
