//! # Regular expression terms
//! This module defines the term language that the whole engine operates on, together with the
//! *smart constructors* that keep terms in canonical form. Canonical form matters because the
//! DFA construction interns terms by structural equality: the more algebraically equal terms
//! collapse to the same structure, the fewer states the automaton has (and by Brzozowski's
//! theorem, canonicalizing at least associativity, commutativity and idempotence of the
//! boolean operators is what makes the state set finite).
//!
//! The identities applied are:
//!
//! * `∅·r = r·∅ = ∅`, `ε·r = r·ε = r`, and concatenation is right-associated
//! * `r|∅ = r`, `r|r = r`, and alternation is flattened, sorted and deduplicated
//! * `r&∅ = ∅`, `r&Σ* = r`, `r&r = r`, with the same flattening and sorting
//! * `~~r = r`
//! * `∅* = ε* = ε` and `(r*)* = r*`
//! * a character class over the empty set is `∅`
//!
//! Capture groups are semantically transparent but are never simplified away; they carry the
//! group number assigned by the parser.
//!
//! ```
//! use pyre::regex::Term;
//!
//! let a = Term::class(pyre::regex::class::ClassSet::single('a'));
//! // ε is the unit of concatenation
//! assert_eq!(Term::cat(Term::epsilon(), a.clone()), a);
//! // Alternation is idempotent and commutative up to canonical form
//! let ab = Term::alt(vec![a.clone(), Term::epsilon()]);
//! let ba = Term::alt(vec![Term::epsilon(), a.clone(), Term::epsilon()]);
//! assert_eq!(ab, ba);
//! // Complement is an involution
//! assert_eq!(Term::not(Term::not(a.clone())), a);
//! ```

use crate::dfa::{build, CompileError, Dfa};
use crate::parser::{ClassItem, ParsedRegex};
use crate::regex::class::ClassSet;
use std::fmt;
use std::sync::Arc;

pub mod class;
pub mod deriv;

/// A regular expression over the alphabet of all `char`s, in canonical form. The variant
/// order here is the total order used to sort alternations and intersections; the derived
/// `Ord` is lexicographic over (constructor, children).
///
/// Terms should be built through the constructor functions rather than the variants, since
/// those enforce the canonical form that the rest of the engine relies on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    /// The empty language
    Empty,
    /// The empty string
    Epsilon,
    /// Any single character from a non-empty class
    Class(ClassSet),
    /// Concatenation, right-associated
    Cat(Arc<Term>, Arc<Term>),
    /// Alternation of two or more branches, sorted and deduplicated
    Alt(Vec<Arc<Term>>),
    /// Intersection of two or more branches, sorted and deduplicated
    And(Vec<Arc<Term>>),
    /// Complement against the full alphabet
    Not(Arc<Term>),
    /// Kleene closure
    Star(Arc<Term>),
    /// A capture group. `entered` is false for groups as written in the pattern and true
    /// once a derivative has consumed a character inside the group; both forms are distinct
    /// states, which is what lets a transition tell a first entry from a continuation.
    Group {
        index: usize,
        entered: bool,
        term: Arc<Term>,
    },
}

impl Term {
    pub fn empty() -> Arc<Self> {
        Arc::new(Term::Empty)
    }

    pub fn epsilon() -> Arc<Self> {
        Arc::new(Term::Epsilon)
    }

    /// A term matching any single character of `set`. The empty class is the empty language.
    pub fn class(set: ClassSet) -> Arc<Self> {
        if set.is_empty() {
            Self::empty()
        } else {
            Arc::new(Term::Class(set))
        }
    }

    /// A term matching any single character
    pub fn any() -> Arc<Self> {
        Self::class(ClassSet::full())
    }

    /// The universal language `Σ*`
    pub fn universal() -> Arc<Self> {
        Self::star(Self::any())
    }

    /// Concatenation. `∅` annihilates, `ε` is the unit, and nested concatenations are
    /// re-associated to the right so that the head of a concatenation is never itself one.
    pub fn cat(head: Arc<Self>, tail: Arc<Self>) -> Arc<Self> {
        match (&*head, &*tail) {
            (Term::Empty, _) | (_, Term::Empty) => Self::empty(),
            (Term::Epsilon, _) => tail,
            (_, Term::Epsilon) => head,
            (Term::Cat(a, b), _) => Self::cat(a.clone(), Self::cat(b.clone(), tail)),
            _ => Arc::new(Term::Cat(head, tail)),
        }
    }

    /// Alternation of any number of branches: flattened, sorted, deduplicated, with `∅`
    /// branches dropped. No branches at all (or only `∅` ones) gives `∅`.
    pub fn alt(terms: Vec<Arc<Self>>) -> Arc<Self> {
        let mut branches: Vec<Arc<Term>> = Vec::with_capacity(terms.len());
        for term in terms {
            match &*term {
                Term::Empty => {}
                Term::Alt(nested) => branches.extend(nested.iter().cloned()),
                _ => branches.push(term),
            }
        }
        branches.sort();
        branches.dedup();
        match branches.len() {
            0 => Self::empty(),
            1 => branches.remove(0),
            _ => Arc::new(Term::Alt(branches)),
        }
    }

    /// Intersection of any number of branches: flattened, sorted, deduplicated. `∅`
    /// annihilates and `Σ*` is the unit.
    pub fn and(terms: Vec<Arc<Self>>) -> Arc<Self> {
        let mut branches: Vec<Arc<Term>> = Vec::with_capacity(terms.len());
        for term in terms {
            match &*term {
                Term::Empty => return Self::empty(),
                Term::And(nested) => branches.extend(nested.iter().cloned()),
                _ if term.is_universal() => {}
                _ => branches.push(term),
            }
        }
        branches.sort();
        branches.dedup();
        match branches.len() {
            0 => Self::universal(),
            1 => branches.remove(0),
            _ => Arc::new(Term::And(branches)),
        }
    }

    /// Complement. A double complement cancels out.
    pub fn not(term: Arc<Self>) -> Arc<Self> {
        match &*term {
            Term::Not(inner) => inner.clone(),
            _ => Arc::new(Term::Not(term)),
        }
    }

    /// Kleene closure. `∅* = ε* = ε`, and a star of a star collapses.
    pub fn star(term: Arc<Self>) -> Arc<Self> {
        match &*term {
            Term::Empty | Term::Epsilon => Self::epsilon(),
            Term::Star(_) => term,
            _ => Arc::new(Term::Star(term)),
        }
    }

    /// A capture group around `term`, as written in a pattern. Groups are never simplified
    /// away; the surrounding rewrites treat them as opaque.
    pub fn group(index: usize, term: Arc<Self>) -> Arc<Self> {
        Arc::new(Term::Group {
            index,
            entered: false,
            term,
        })
    }

    /// Checks whether this term is the universal language in one of its canonical spellings,
    /// `(Σ-class)*` or `~∅`
    fn is_universal(&self) -> bool {
        match self {
            Term::Star(inner) => matches!(&**inner, Term::Class(set) if set.is_full()),
            Term::Not(inner) => matches!(&**inner, Term::Empty),
            _ => false,
        }
    }

    fn fmt_prec(&self, f: &mut fmt::Formatter<'_>, prec: u8) -> fmt::Result {
        // Precedence levels: alternation 0, intersection 1, complement 2,
        // concatenation 3, closure 4, atoms 5
        match self {
            Term::Empty => write!(f, "∅"),
            Term::Epsilon => write!(f, "ε"),
            Term::Class(set) => write!(f, "{set}"),
            Term::Cat(head, tail) => {
                if prec > 3 {
                    write!(f, "(")?;
                }
                head.fmt_prec(f, 4)?;
                tail.fmt_prec(f, 3)?;
                if prec > 3 {
                    write!(f, ")")?;
                }
                Ok(())
            }
            Term::Alt(branches) => {
                if prec > 0 {
                    write!(f, "(")?;
                }
                for (idx, branch) in branches.iter().enumerate() {
                    if idx > 0 {
                        write!(f, "|")?;
                    }
                    branch.fmt_prec(f, 1)?;
                }
                if prec > 0 {
                    write!(f, ")")?;
                }
                Ok(())
            }
            Term::And(branches) => {
                if prec > 1 {
                    write!(f, "(")?;
                }
                for (idx, branch) in branches.iter().enumerate() {
                    if idx > 0 {
                        write!(f, "&")?;
                    }
                    branch.fmt_prec(f, 2)?;
                }
                if prec > 1 {
                    write!(f, ")")?;
                }
                Ok(())
            }
            Term::Not(inner) => {
                if prec > 2 {
                    write!(f, "(")?;
                }
                write!(f, "~")?;
                inner.fmt_prec(f, 3)?;
                if prec > 2 {
                    write!(f, ")")?;
                }
                Ok(())
            }
            Term::Star(inner) => {
                inner.fmt_prec(f, 5)?;
                write!(f, "*")
            }
            Term::Group { term, .. } => {
                write!(f, "(")?;
                term.fmt_prec(f, 0)?;
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_prec(f, 0)
    }
}

/// A complete pattern: the canonical root term together with the number of capture groups
/// the parser assigned. Compile it to a [Dfa] to run it against input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regex {
    pub(crate) term: Arc<Term>,
    pub(crate) group_count: usize,
}

impl Regex {
    /// Gets the canonical root term of this pattern
    pub fn term(&self) -> &Arc<Term> {
        &self.term
    }

    /// Gets the number of capture groups in this pattern. Group 0, the whole match, is
    /// implicit and not counted.
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// Compiles this pattern to a DFA with the default state ceiling
    pub fn compile(&self) -> Result<Dfa, CompileError> {
        self.compile_bounded(build::DEFAULT_STATE_LIMIT)
    }

    /// Compiles this pattern to a DFA, failing with [CompileError::TooManyStates] if the
    /// construction needs more than `max_states` states
    pub fn compile_bounded(&self, max_states: usize) -> Result<Dfa, CompileError> {
        build::build(self, max_states)
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.term.fmt(f)
    }
}

impl From<ParsedRegex> for Regex {
    /// Builds the canonical term from a parse tree, assigning capture group numbers left to
    /// right by opening parenthesis, starting at 1. This conversion is total: every parse
    /// tree denotes a valid pattern.
    fn from(parsed: ParsedRegex) -> Self {
        let mut group_count = 0;
        let term = convert(parsed, &mut group_count);
        Regex { term, group_count }
    }
}

fn convert(parsed: ParsedRegex, group_count: &mut usize) -> Arc<Term> {
    match parsed {
        ParsedRegex::Alt(items) => Term::alt(
            items
                .into_iter()
                .map(|item| convert(item, group_count))
                .collect(),
        ),
        ParsedRegex::And(items) => Term::and(
            items
                .into_iter()
                .map(|item| convert(item, group_count))
                .collect(),
        ),
        ParsedRegex::Seq(items) => {
            // Convert left to right first so group numbering follows source order, then
            // fold to a right-associated concatenation
            let terms: Vec<Arc<Term>> = items
                .into_iter()
                .map(|item| convert(item, group_count))
                .collect();
            terms
                .into_iter()
                .rev()
                .fold(Term::epsilon(), |tail, head| Term::cat(head, tail))
        }
        ParsedRegex::Not(inner) => Term::not(convert(*inner, group_count)),
        ParsedRegex::Star(inner) => Term::star(convert(*inner, group_count)),
        ParsedRegex::Plus(inner) => {
            let term = convert(*inner, group_count);
            Term::cat(term.clone(), Term::star(term))
        }
        ParsedRegex::Opt(inner) => {
            Term::alt(vec![convert(*inner, group_count), Term::epsilon()])
        }
        ParsedRegex::Group(inner) => {
            *group_count += 1;
            let index = *group_count;
            Term::group(index, convert(*inner, group_count))
        }
        ParsedRegex::Class { negated, items } => {
            let set = ClassSet::from_ranges(items.into_iter().map(|item| match item {
                ClassItem::Single(c) => (c, c),
                ClassItem::Range(low, high) => (low, high),
            }));
            Term::class(if negated { set.complement() } else { set })
        }
        ParsedRegex::Dot => Term::any(),
        ParsedRegex::Char(c) => Term::class(ClassSet::single(c)),
    }
}
