use crate::dfa::{Dfa, DfaState};
use crate::regex::deriv::CaptureEdit;

/// One match of a pattern against an input: the overall span plus the spans of the numbered
/// capture groups recorded at the accepting position. All offsets are byte offsets, end
/// exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    start: usize,
    end: usize,
    groups: Vec<Option<(usize, usize)>>,
}

impl Match {
    pub(crate) fn new(start: usize, end: usize, groups: Vec<Option<(usize, usize)>>) -> Self {
        Self { start, end, groups }
    }

    /// The start offset of the whole match
    pub fn start(&self) -> usize {
        self.start
    }

    /// The end offset (exclusive) of the whole match
    pub fn end(&self) -> usize {
        self.end
    }

    /// The whole match as a `(start, end)` pair
    pub fn span(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// Checks if this match is zero-length
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The span of a capture group, or `None` if the group did not take part in the match.
    /// Group 0 is the whole match.
    pub fn group(&self, index: usize) -> Option<(usize, usize)> {
        self.groups.get(index).copied().flatten()
    }

    /// The number of numbered capture groups of the pattern (group 0 not counted)
    pub fn group_count(&self) -> usize {
        self.groups.len() - 1
    }

    /// Iterates over all group spans, starting with group 0
    pub fn groups(&self) -> impl Iterator<Item = Option<(usize, usize)>> + '_ {
        self.groups.iter().copied()
    }
}

/// A structure keeping track of the current state and the capture table while evaluating an
/// input against a compiled DFA, one character at a time. Used internally by the matching
/// entry points on [Dfa], and usable directly when a caller wants to drive the automaton
/// itself.
#[derive(Debug, Clone)]
pub struct DfaEvaluator<'a> {
    dfa: &'a Dfa,
    current_state: usize,
    group_starts: Vec<Option<usize>>,
    group_ends: Vec<Option<usize>>,
}

impl<'a> DfaEvaluator<'a> {
    /// Checks if the current state is accepting
    pub fn is_accepting(&self) -> bool {
        self.current_state().is_accepting()
    }

    /// Checks if no accepting state is reachable anymore
    pub fn is_dead(&self) -> bool {
        self.current_state().is_dead()
    }

    pub fn current_state(&self) -> &DfaState {
        &self.dfa.states[self.current_state]
    }

    pub fn current_state_idx(&self) -> usize {
        self.current_state
    }

    /// Steps on `c`, read at byte offset `at` of the input, and returns the new state.
    /// Exactly one transition of the current state applies to any character, so stepping
    /// always succeeds. Capture edits of the taken transition are applied to the capture
    /// table: an `open` records `at`, a `close` records the offset just past `c`.
    pub fn step(&mut self, c: char, at: usize) -> &DfaState {
        let dfa = self.dfa;
        let transition = dfa.states[self.current_state]
            .transitions
            .iter()
            .find(|transition| transition.class.contains(c))
            .expect("state transitions partition the alphabet");
        for edit in &transition.edits {
            match *edit {
                CaptureEdit::Open(group) => self.group_starts[group] = Some(at),
                CaptureEdit::Close(group) => self.group_ends[group] = Some(at + c.len_utf8()),
            }
        }
        self.current_state = transition.target;
        self.current_state()
    }

    /// Snapshots the capture table as `(start, end)` spans, indexed by group number. Index 0
    /// is reserved for the whole match and left unset here; the matcher fills it in. A group
    /// with an incomplete or inverted span has not taken part in the match so far.
    pub(crate) fn group_spans(&self) -> Vec<Option<(usize, usize)>> {
        self.group_starts
            .iter()
            .zip(&self.group_ends)
            .map(|(&start, &end)| start.zip(end).filter(|(start, end)| start <= end))
            .collect()
    }
}

impl<'a> From<&'a Dfa> for DfaEvaluator<'a> {
    fn from(dfa: &'a Dfa) -> Self {
        Self {
            dfa,
            current_state: dfa.initial_state,
            group_starts: vec![None; dfa.group_count + 1],
            group_ends: vec![None; dfa.group_count + 1],
        }
    }
}
