use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;

use crate::nfa::{NfaDelta, NfaError, NFA};

/// Transition table of a DFA: one target state per state and symbol pair.
pub type DfaDelta<S, Q> = IndexMap<(Q, S), Q>;

/// Errors reported by DFA construction and execution.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum DfaError {
    /// A symbol outside the automaton alphabet was fed to execution.
    #[error("symbol is not part of the alphabet")]
    InvalidSigmaSymbol,
    /// The transition table has no entry for a state and symbol pair.
    #[error("no transition for a state and symbol pair")]
    MissingTransition,
    /// The requested epsilon symbol already belongs to the alphabet.
    #[error("epsilon symbol is already part of the alphabet")]
    InvalidEpsilon,
    /// A binary operation was given automata over different alphabets.
    #[error("alphabets of the operands differ")]
    SigmaMismatch,
}

/// A deterministic finite automaton over symbols `S` and states `Q`.
///
/// The transition table must be total over `Q x S` for the automaton to be
/// well formed; `valid` checks that along with the other structural
/// invariants. Executing an automaton whose table has gaps reports
/// [`DfaError::MissingTransition`].
#[derive(Clone, Debug)]
pub struct DFA<S, Q>
where
    S: Clone + Eq + Hash,
    Q: Clone + Eq + Hash,
{
    sigma: IndexSet<S>,
    states: IndexSet<Q>,
    initial_state: Q,
    accept_states: IndexSet<Q>,
    delta: DfaDelta<S, Q>,
}

impl<S, Q> DFA<S, Q>
where
    S: Clone + Eq + Hash,
    Q: Clone + Eq + Hash,
{
    /// Assemble a DFA from its five components. Construction does not
    /// validate; call [`DFA::valid`] to check the invariants.
    #[inline]
    pub fn new(
        sigma: IndexSet<S>,
        states: IndexSet<Q>,
        initial_state: Q,
        accept_states: IndexSet<Q>,
        delta: DfaDelta<S, Q>,
    ) -> Self {
        Self {
            sigma,
            states,
            initial_state,
            accept_states,
            delta,
        }
    }

    #[inline]
    pub fn sigma(&self) -> &IndexSet<S> {
        &self.sigma
    }

    #[inline]
    pub fn states(&self) -> &IndexSet<Q> {
        &self.states
    }

    #[inline]
    pub fn initial_state(&self) -> &Q {
        &self.initial_state
    }

    #[inline]
    pub fn accept_states(&self) -> &IndexSet<Q> {
        &self.accept_states
    }

    #[inline]
    pub fn delta(&self) -> &DfaDelta<S, Q> {
        &self.delta
    }

    #[inline]
    pub fn is_accepting(&self, state: &Q) -> bool {
        self.accept_states.contains(state)
    }

    /// Run the automaton over `input` and report whether the final state
    /// accepts.
    pub fn accepts(&self, input: &[S]) -> Result<bool, DfaError> {
        let mut state = self.initial_state.clone();
        for symbol in input {
            state = self.step(&state, symbol)?;
        }
        Ok(self.is_accepting(&state))
    }

    fn step(&self, state: &Q, symbol: &S) -> Result<Q, DfaError> {
        if !self.sigma.contains(symbol) {
            return Err(DfaError::InvalidSigmaSymbol);
        }
        self.delta
            .get(&(state.clone(), symbol.clone()))
            .cloned()
            .ok_or(DfaError::MissingTransition)
    }

    /// The automaton recognizing the complement language: accepting and
    /// non-accepting states swap roles, everything else is shared.
    pub fn complement(&self) -> Self {
        let accept_states = self
            .states
            .iter()
            .filter(|q| !self.is_accepting(q))
            .cloned()
            .collect();

        DFA::new(
            self.sigma.clone(),
            self.states.clone(),
            self.initial_state.clone(),
            accept_states,
            self.delta.clone(),
        )
    }

    /// The minimal automaton recognizing the same language: unreachable
    /// states are dropped and indistinguishable states are merged by
    /// partition refinement. Each surviving block is named after its first
    /// member.
    pub fn minimal(&self) -> Self {
        let reachable = self.reachable_states();

        let accepting: Vec<Q> = reachable
            .iter()
            .filter(|q| self.is_accepting(q))
            .cloned()
            .collect();
        let rejecting: Vec<Q> = reachable
            .iter()
            .filter(|q| !self.is_accepting(q))
            .cloned()
            .collect();

        // A machine that accepts everything or nothing collapses to a
        // single state looping on every symbol.
        if accepting.is_empty() || rejecting.is_empty() {
            let q0 = self.initial_state.clone();
            let mut states = IndexSet::new();
            states.insert(q0.clone());
            let accept_states = if rejecting.is_empty() {
                states.clone()
            } else {
                IndexSet::new()
            };
            let mut delta = IndexMap::new();
            for symbol in &self.sigma {
                delta.insert((q0.clone(), symbol.clone()), q0.clone());
            }
            return DFA::new(self.sigma.clone(), states, q0, accept_states, delta);
        }

        let mut partition: Vec<Vec<Q>> = vec![accepting, rejecting];
        loop {
            let locations = block_locations(&partition);

            let mut refined: Vec<Vec<Q>> = Vec::with_capacity(partition.len() * 2);
            for block in &partition {
                let witness = &block[0];
                let mut same = vec![witness.clone()];
                let mut split = Vec::new();
                for state in &block[1..] {
                    if self.equivalent_under(state, witness, &locations) {
                        same.push(state.clone());
                    } else {
                        split.push(state.clone());
                    }
                }
                refined.push(same);
                if !split.is_empty() {
                    refined.push(split);
                }
            }

            let stable = refined.len() == partition.len();
            partition = refined;
            if stable {
                break;
            }
        }

        // Quotient automaton over the block representatives.
        let locations = block_locations(&partition);
        let representatives: Vec<Q> = partition.iter().map(|block| block[0].clone()).collect();

        let mut states = IndexSet::new();
        let mut accept_states = IndexSet::new();
        let mut delta = IndexMap::new();
        let mut initial_state = self.initial_state.clone();

        for (index, block) in partition.iter().enumerate() {
            let representative = &representatives[index];
            states.insert(representative.clone());
            if self.is_accepting(representative) {
                accept_states.insert(representative.clone());
            }
            if block.iter().any(|q| *q == self.initial_state) {
                initial_state = representative.clone();
            }
            for symbol in &self.sigma {
                if let Some(target) = self.delta.get(&(representative.clone(), symbol.clone())) {
                    if let Some(&block_index) = locations.get(target) {
                        delta.insert(
                            (representative.clone(), symbol.clone()),
                            representatives[block_index].clone(),
                        );
                    }
                }
            }
        }

        DFA::new(self.sigma.clone(), states, initial_state, accept_states, delta)
    }

    fn reachable_states(&self) -> IndexSet<Q> {
        let mut reachable = IndexSet::new();
        reachable.insert(self.initial_state.clone());
        let mut frontier = vec![self.initial_state.clone()];

        while let Some(state) = frontier.pop() {
            for symbol in &self.sigma {
                if let Some(target) = self.delta.get(&(state.clone(), symbol.clone())) {
                    if reachable.insert(target.clone()) {
                        frontier.push(target.clone());
                    }
                }
            }
        }

        reachable
    }

    fn equivalent_under(&self, state: &Q, witness: &Q, locations: &HashMap<Q, usize>) -> bool {
        self.sigma.iter().all(|symbol| {
            let a = self
                .delta
                .get(&(state.clone(), symbol.clone()))
                .and_then(|target| locations.get(target));
            let b = self
                .delta
                .get(&(witness.clone(), symbol.clone()))
                .and_then(|target| locations.get(target));
            a == b
        })
    }

    /// Lift the automaton into an NFA over `sigma + epsilon`. The epsilon
    /// symbol must be new; every transition target becomes a singleton set
    /// and no epsilon edges are introduced.
    pub fn to_nfa(&self, epsilon: S) -> Result<NFA<S, Q>, DfaError> {
        if self.sigma.contains(&epsilon) {
            return Err(DfaError::InvalidEpsilon);
        }

        let mut sigma = self.sigma.clone();
        sigma.insert(epsilon.clone());

        let mut delta: NfaDelta<S, Q> = IndexMap::new();
        for ((state, symbol), target) in &self.delta {
            let mut targets = IndexSet::new();
            targets.insert(target.clone());
            delta.insert((state.clone(), symbol.clone()), targets);
        }

        NFA::new(
            sigma,
            self.states.clone(),
            self.initial_state.clone(),
            self.accept_states.clone(),
            delta,
            epsilon,
        )
        .map_err(|_: NfaError| DfaError::InvalidEpsilon)
    }

    /// Check the structural invariants: a non-empty state set containing
    /// the initial and accepting states, and a transition table that is
    /// total over `Q x S` and closed over `Q`.
    pub fn valid(&self) -> bool {
        if self.states.is_empty() {
            return false;
        }
        if !self.accept_states.iter().all(|q| self.states.contains(q)) {
            return false;
        }
        if !self.states.contains(&self.initial_state) {
            return false;
        }

        let mut transitions_per_state: IndexMap<&Q, usize> = IndexMap::new();
        for ((state, symbol), target) in &self.delta {
            if !self.states.contains(state)
                || !self.sigma.contains(symbol)
                || !self.states.contains(target)
            {
                return false;
            }
            *transitions_per_state.entry(state).or_insert(0) += 1;
        }

        transitions_per_state.len() == self.states.len()
            && transitions_per_state
                .values()
                .all(|&count| count == self.sigma.len())
    }
}

impl<S, Q> DFA<S, Q>
where
    S: Clone + Eq + Hash + fmt::Display,
    Q: Clone + Eq + Hash + fmt::Display,
{
    /// Render the instantaneous descriptions of a computation: the input
    /// itself, then one `(state, [rest])` entry per step, the last entry
    /// suffixed with `*` when the final state accepts.
    pub fn trace(&self, input: &[S]) -> Result<Vec<String>, DfaError> {
        let mut descriptions = Vec::with_capacity(input.len() + 2);
        descriptions.push(format!("[{}]", input.iter().join(",")));

        let mut state = self.initial_state.clone();
        for i in 0..input.len() {
            descriptions.push(format!("({}, [{}])", state, input[i..].iter().join(",")));
            state = self.step(&state, &input[i])?;
        }

        let mut last = format!("({}, [])", state);
        if self.is_accepting(&state) {
            last.push('*');
        }
        descriptions.push(last);

        Ok(descriptions)
    }
}

/// Product construction accepting exactly when both operands accept.
/// Unreachable product states are not pruned.
pub fn dfa_intersection<S, Q0, Q1>(
    m0: &DFA<S, Q0>,
    m1: &DFA<S, Q1>,
) -> Result<DFA<S, (Q0, Q1)>, DfaError>
where
    S: Clone + Eq + Hash,
    Q0: Clone + Eq + Hash,
    Q1: Clone + Eq + Hash,
{
    dfa_product(m0, m1, |a, b| a && b)
}

/// Product construction accepting when either operand accepts.
/// Unreachable product states are not pruned.
pub fn dfa_union<S, Q0, Q1>(
    m0: &DFA<S, Q0>,
    m1: &DFA<S, Q1>,
) -> Result<DFA<S, (Q0, Q1)>, DfaError>
where
    S: Clone + Eq + Hash,
    Q0: Clone + Eq + Hash,
    Q1: Clone + Eq + Hash,
{
    dfa_product(m0, m1, |a, b| a || b)
}

fn dfa_product<S, Q0, Q1, F>(
    m0: &DFA<S, Q0>,
    m1: &DFA<S, Q1>,
    accept: F,
) -> Result<DFA<S, (Q0, Q1)>, DfaError>
where
    S: Clone + Eq + Hash,
    Q0: Clone + Eq + Hash,
    Q1: Clone + Eq + Hash,
    F: Fn(bool, bool) -> bool,
{
    if m0.sigma != m1.sigma {
        return Err(DfaError::SigmaMismatch);
    }

    let mut states: IndexSet<(Q0, Q1)> = IndexSet::new();
    for q0 in &m0.states {
        for q1 in &m1.states {
            states.insert((q0.clone(), q1.clone()));
        }
    }

    let initial_state = (m0.initial_state.clone(), m1.initial_state.clone());

    let mut delta = IndexMap::new();
    for (q0, q1) in &states {
        for symbol in &m0.sigma {
            let t0 = m0
                .delta
                .get(&(q0.clone(), symbol.clone()))
                .ok_or(DfaError::MissingTransition)?;
            let t1 = m1
                .delta
                .get(&(q1.clone(), symbol.clone()))
                .ok_or(DfaError::MissingTransition)?;
            delta.insert(
                ((q0.clone(), q1.clone()), symbol.clone()),
                (t0.clone(), t1.clone()),
            );
        }
    }

    let accept_states = states
        .iter()
        .filter(|(q0, q1)| accept(m0.is_accepting(q0), m1.is_accepting(q1)))
        .cloned()
        .collect();

    Ok(DFA::new(
        m0.sigma.clone(),
        states,
        initial_state,
        accept_states,
        delta,
    ))
}

fn block_locations<Q>(partition: &[Vec<Q>]) -> HashMap<Q, usize>
where
    Q: Clone + Eq + Hash,
{
    let mut locations = HashMap::new();
    for (index, block) in partition.iter().enumerate() {
        for state in block {
            locations.insert(state.clone(), index);
        }
    }
    locations
}
