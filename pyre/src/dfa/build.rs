//! The derivative worklist construction. States are canonical terms; the interner maps each
//! term to its state index and is the only mutable structure shared across the build. Once
//! the worklist drains, the result is frozen into the array-indexed [Dfa] table.

use crate::dfa::{Dfa, DfaState, DfaTransition};
use crate::regex::deriv::{class_partitions, derivative_with_edits, nullable, EditSink};
use crate::regex::{Regex, Term};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// The state ceiling used by [Regex::compile](crate::regex::Regex::compile). Far above any
/// reasonable pattern; hitting it means the pattern blows up under the derivative
/// construction.
pub const DEFAULT_STATE_LIMIT: usize = 10_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("pattern too complex: construction exceeded {0} states")]
    TooManyStates(usize),
    #[error("unsupported construct: {0}")]
    Unsupported(&'static str),
}

pub(crate) fn build(regex: &Regex, max_states: usize) -> Result<Dfa, CompileError> {
    let root = regex.term().clone();
    let mut terms: Vec<Arc<Term>> = vec![root.clone()];
    let mut term_ids: HashMap<Arc<Term>, usize> = HashMap::from([(root, 0)]);
    let mut transition_lists: Vec<Option<Vec<DfaTransition>>> = vec![None];
    let mut worklist: Vec<usize> = vec![0];

    while let Some(id) = worklist.pop() {
        if transition_lists[id].is_some() {
            continue;
        }
        let term = terms[id].clone();
        let mut transitions = Vec::new();
        for class in class_partitions(&term) {
            let representative = class.first().expect("partition blocks are non-empty");
            let mut sink = EditSink::default();
            let target_term = derivative_with_edits(&term, representative, &mut sink);
            let target = match term_ids.get(&target_term) {
                Some(&existing) => existing,
                None => {
                    let new_id = terms.len();
                    if new_id >= max_states {
                        return Err(CompileError::TooManyStates(max_states));
                    }
                    terms.push(target_term.clone());
                    term_ids.insert(target_term, new_id);
                    transition_lists.push(None);
                    worklist.push(new_id);
                    new_id
                }
            };
            transitions.push(DfaTransition {
                class,
                target,
                edits: sink.into_edits(),
            });
        }
        transition_lists[id] = Some(transitions);
    }

    let accepting: Vec<bool> = terms.iter().map(|term| nullable(term)).collect();
    let transition_lists: Vec<Vec<DfaTransition>> = transition_lists
        .into_iter()
        .map(|list| list.expect("every interned state gets expanded"))
        .collect();
    let live = live_states(&accepting, &transition_lists);

    let states = terms
        .into_iter()
        .zip(accepting)
        .zip(transition_lists)
        .zip(live)
        .map(|(((term, accepting), transitions), live)| DfaState {
            term,
            accepting,
            dead: !live,
            transitions,
        })
        .collect();

    Ok(Dfa {
        states,
        initial_state: 0,
        group_count: regex.group_count(),
    })
}

/// Finds the states from which some accepting state is reachable, by walking the transition
/// relation backwards from the accepting set
fn live_states(accepting: &[bool], transition_lists: &[Vec<DfaTransition>]) -> Vec<bool> {
    let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); accepting.len()];
    for (from, transitions) in transition_lists.iter().enumerate() {
        for transition in transitions {
            incoming[transition.target].push(from);
        }
    }
    let mut live = accepting.to_vec();
    let mut pending: Vec<usize> = accepting
        .iter()
        .enumerate()
        .filter_map(|(idx, &accepting)| accepting.then_some(idx))
        .collect();
    while let Some(state) = pending.pop() {
        for &from in &incoming[state] {
            if !live[from] {
                live[from] = true;
                pending.push(from);
            }
        }
    }
    live
}
