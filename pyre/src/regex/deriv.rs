//! # Derivatives
//! The two operators at the heart of the engine: *nullability* `ν(r)`, which decides whether
//! a term accepts the empty string, and the *Brzozowski derivative* `∂_c(r)`, the term whose
//! language is every word of `L(r)` with a leading `c` removed. A DFA state is a term, and
//! its transition on `c` leads to the state `∂_c(r)`; a state accepts iff its term is
//! nullable.
//!
//! Since deriving by every possible character is infeasible over the full `char` alphabet,
//! [class_partitions] computes a finite partition of the alphabet such that all characters in
//! one block have the same derivative. The DFA builder derives by one representative per
//! block.
//!
//! ```
//! use pyre::regex::class::ClassSet;
//! use pyre::regex::deriv::{derivative, nullable};
//! use pyre::regex::Term;
//!
//! let a = Term::class(ClassSet::single('a'));
//! let a_star = Term::star(a.clone());
//! assert!(nullable(&a_star));
//! assert!(!nullable(&a));
//! // ∂_a(a*) = a*, which is what makes `a*` a one-state loop
//! assert_eq!(derivative(&a_star, 'a'), a_star);
//! assert_eq!(derivative(&a_star, 'b'), Term::empty());
//! ```
//!
//! Deriving through a capture group also records *capture edits*: `open g` the first time a
//! character is consumed inside group `g`, and `close g` when the group's body has been
//! consumed down to `ε`. The builder attaches those edits to the DFA transition they were
//! recorded on, and the matcher replays them positionally.

use crate::regex::class::ClassSet;
use crate::regex::Term;
use std::fmt;
use std::sync::Arc;

/// A capture-group boundary crossed by a DFA transition. `Open` fires at the position just
/// before the transition's character, `Close` just after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureEdit {
    Open(usize),
    Close(usize),
}

impl fmt::Display for CaptureEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureEdit::Open(group) => write!(f, "open {group}"),
            CaptureEdit::Close(group) => write!(f, "close {group}"),
        }
    }
}

/// Collects capture edits along one derivative computation, in the order the recursion
/// encounters the groups. An enclosing group's `open` is inserted ahead of its children's
/// edits, and the edits of a sub-derivative that came out `∅` are discarded, since the path
/// that recorded them cannot be part of any match through this transition.
#[derive(Debug, Default)]
pub(crate) struct EditSink {
    edits: Vec<CaptureEdit>,
    opened: Vec<usize>,
}

impl EditSink {
    fn mark(&self) -> usize {
        self.edits.len()
    }

    fn rollback(&mut self, mark: usize) {
        for edit in self.edits.drain(mark..) {
            if let CaptureEdit::Open(group) = edit {
                self.opened.retain(|&open| open != group);
            }
        }
    }

    /// Records `open group` at `mark`, at most once per group and derivative computation
    fn open_at(&mut self, mark: usize, group: usize) {
        if self.opened.contains(&group) {
            return;
        }
        self.opened.push(group);
        self.edits.insert(mark, CaptureEdit::Open(group));
    }

    fn close(&mut self, group: usize) {
        self.edits.push(CaptureEdit::Close(group));
    }

    pub(crate) fn into_edits(self) -> Vec<CaptureEdit> {
        self.edits
    }
}

/// Checks whether `term` accepts the empty string
pub fn nullable(term: &Term) -> bool {
    match term {
        Term::Empty | Term::Class(_) => false,
        Term::Epsilon | Term::Star(_) => true,
        Term::Cat(head, tail) => nullable(head) && nullable(tail),
        Term::Alt(branches) => branches.iter().any(|branch| nullable(branch)),
        Term::And(branches) => branches.iter().all(|branch| nullable(branch)),
        Term::Not(inner) => !nullable(inner),
        Term::Group { term, .. } => nullable(term),
    }
}

/// The derivative of `term` with respect to `c`, discarding capture edits
pub fn derivative(term: &Arc<Term>, c: char) -> Arc<Term> {
    derivative_with_edits(term, c, &mut EditSink::default())
}

/// The derivative of `term` with respect to `c`, recording capture edits into `sink`
pub(crate) fn derivative_with_edits(term: &Arc<Term>, c: char, sink: &mut EditSink) -> Arc<Term> {
    let mark = sink.mark();
    let result = term_derivative(term, c, sink);
    if matches!(&*result, Term::Empty) {
        sink.rollback(mark);
    }
    result
}

fn term_derivative(term: &Arc<Term>, c: char, sink: &mut EditSink) -> Arc<Term> {
    match &**term {
        Term::Empty | Term::Epsilon => Term::empty(),
        Term::Class(set) => {
            if set.contains(c) {
                Term::epsilon()
            } else {
                Term::empty()
            }
        }
        Term::Cat(head, tail) => {
            let stepped = Term::cat(derivative_with_edits(head, c, sink), tail.clone());
            if nullable(head) {
                let skipped = derivative_with_edits(tail, c, sink);
                Term::alt(vec![stepped, skipped])
            } else {
                stepped
            }
        }
        Term::Alt(branches) => Term::alt(
            branches
                .iter()
                .map(|branch| derivative_with_edits(branch, c, sink))
                .collect(),
        ),
        Term::And(branches) => Term::and(
            branches
                .iter()
                .map(|branch| derivative_with_edits(branch, c, sink))
                .collect(),
        ),
        Term::Not(inner) => Term::not(derivative_with_edits(inner, c, sink)),
        Term::Star(inner) => Term::cat(derivative_with_edits(inner, c, sink), term.clone()),
        Term::Group {
            index,
            entered,
            term: body,
        } => {
            let mark = sink.mark();
            let residue = derivative_with_edits(body, c, sink);
            match &*residue {
                // The group's path died; the caller discards the whole branch
                Term::Empty => Term::empty(),
                // The body is fully consumed: the group closes on this transition, and
                // opens on it too if this was its first character
                Term::Epsilon => {
                    if !*entered {
                        sink.open_at(mark, *index);
                    }
                    sink.close(*index);
                    Term::epsilon()
                }
                // A live residue: the group stays open
                _ => {
                    if !*entered {
                        sink.open_at(mark, *index);
                    }
                    Arc::new(Term::Group {
                        index: *index,
                        entered: true,
                        term: residue,
                    })
                }
            }
        }
    }
}

/// Computes a partition of the alphabet into classes with a uniform derivative: for any two
/// characters in the same block, `derivative` yields structurally equal terms. The blocks
/// are pairwise disjoint and cover the whole alphabet.
pub fn class_partitions(term: &Term) -> Vec<ClassSet> {
    match term {
        Term::Empty | Term::Epsilon => vec![ClassSet::full()],
        Term::Class(set) => {
            let mut blocks = vec![set.clone()];
            let rest = set.complement();
            if !rest.is_empty() {
                blocks.push(rest);
            }
            blocks
        }
        Term::Cat(head, tail) => {
            if nullable(head) {
                refine(class_partitions(head), &class_partitions(tail))
            } else {
                class_partitions(head)
            }
        }
        Term::Alt(branches) | Term::And(branches) => branches
            .iter()
            .map(|branch| class_partitions(branch))
            .reduce(|acc, partition| refine(acc, &partition))
            .expect("alternations and intersections have at least two branches"),
        Term::Not(inner) | Term::Star(inner) => class_partitions(inner),
        Term::Group { term, .. } => class_partitions(term),
    }
}

/// The coarsest common refinement of two partitions: all non-empty pairwise intersections
fn refine(left: Vec<ClassSet>, right: &[ClassSet]) -> Vec<ClassSet> {
    left.iter()
        .flat_map(|a| right.iter().map(|b| a.intersect(b)))
        .filter(|block| !block.is_empty())
        .collect()
}
