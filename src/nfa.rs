use std::collections::VecDeque;
use std::fmt;
use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use log::debug;

use crate::dfa::{DfaDelta, DFA};
use crate::parser::{escape_symbol, ParseError};
use crate::regexp::Regex;
use crate::stateset::StateSet;

/// Transition table of an NFA: a set of target states per state and symbol
/// pair. A missing entry denotes the empty set.
pub type NfaDelta<S, Q> = IndexMap<(Q, S), IndexSet<Q>>;

/// Errors reported by NFA construction and execution.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum NfaError {
    /// The designated epsilon symbol is missing from the alphabet.
    #[error("epsilon symbol is missing from the alphabet")]
    EpsilonNotInSigma,
    /// A symbol outside the automaton alphabet was fed to execution.
    #[error("symbol is not part of the alphabet")]
    InvalidSigmaSymbol,
    /// The state handed to epsilon-closure is not part of the automaton.
    #[error("state is not part of the automaton")]
    InvalidState,
    /// The fresh Kleene-star initial state collides with an existing state.
    #[error("kleene star initial state is already part of the automaton")]
    InvalidKleeneStarInitialState,
    /// A binary operation was given automata over different alphabets.
    #[error("alphabets of the operands differ")]
    SigmaMismatch,
    /// The fresh initial state for state elimination collides with an
    /// existing state.
    #[error("elimination initial state is already part of the automaton")]
    InvalidEliminationInitialState,
    /// The fresh accepting state for state elimination collides with an
    /// existing state.
    #[error("elimination accept state is already part of the automaton")]
    InvalidEliminationAcceptState,
    /// The expression produced by state elimination failed to recompile.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A nondeterministic finite automaton with epsilon transitions over
/// symbols `S` and states `Q`.
///
/// Construction eagerly runs the subset construction and caches the
/// resulting deterministic automaton, whose states are [`StateSet`]s of the
/// NFA's states; execution delegates to that cache. All derived automata
/// are fresh values, so the cache never needs invalidation.
#[derive(Clone, Debug)]
pub struct NFA<S, Q>
where
    S: Clone + Eq + Hash,
    Q: Clone + Eq + Hash,
{
    sigma: IndexSet<S>,
    states: IndexSet<Q>,
    initial_state: Q,
    accept_states: IndexSet<Q>,
    delta: NfaDelta<S, Q>,
    epsilon: S,
    dfa: DFA<S, StateSet<Q>>,
}

impl<S, Q> NFA<S, Q>
where
    S: Clone + Eq + Hash,
    Q: Clone + Eq + Hash,
{
    /// Assemble an NFA from its six components. The epsilon symbol must be
    /// a member of the alphabet. The equivalent DFA is built here, once.
    pub fn new(
        sigma: IndexSet<S>,
        states: IndexSet<Q>,
        initial_state: Q,
        accept_states: IndexSet<Q>,
        delta: NfaDelta<S, Q>,
        epsilon: S,
    ) -> Result<Self, NfaError> {
        if !sigma.contains(&epsilon) {
            return Err(NfaError::EpsilonNotInSigma);
        }

        let dfa = construct_dfa(&sigma, &accept_states, &delta, &initial_state, &epsilon);

        Ok(Self {
            sigma,
            states,
            initial_state,
            accept_states,
            delta,
            epsilon,
            dfa,
        })
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
    pub fn delta(&self) -> &NfaDelta<S, Q> {
        &self.delta
    }

    #[inline]
    pub fn epsilon(&self) -> &S {
        &self.epsilon
    }

    #[inline]
    pub fn is_accepting(&self, state: &Q) -> bool {
        self.accept_states.contains(state)
    }

    /// The set of states reachable from `state` through epsilon edges
    /// alone, always containing `state` itself.
    pub fn epsilon_closure(&self, state: &Q) -> Result<IndexSet<Q>, NfaError> {
        if !self.states.contains(state) {
            return Err(NfaError::InvalidState);
        }
        Ok(epsilon_reachable(&self.delta, &self.epsilon, state))
    }

    /// Run the automaton over `input` and report whether it accepts.
    /// Epsilon symbols in the input denote the empty string and are
    /// dropped before the cached DFA executes.
    pub fn accepts(&self, input: &[S]) -> Result<bool, NfaError> {
        let stripped: Vec<S> = input
            .iter()
            .filter(|symbol| **symbol != self.epsilon)
            .cloned()
            .collect();

        // The cached machine can only fail on a symbol outside its
        // alphabet; surface that at this level so callers see one origin.
        self.dfa
            .accepts(&stripped)
            .map_err(|_| NfaError::InvalidSigmaSymbol)
    }

    /// The equivalent deterministic automaton, built at construction time
    /// by the subset construction.
    #[inline]
    pub fn to_dfa(&self) -> DFA<S, StateSet<Q>> {
        self.dfa.clone()
    }

    /// The Kleene star of this automaton. `new_initial_state` becomes a
    /// fresh accepting initial state with an epsilon edge into the old
    /// initial state; every old accepting state loops back the same way.
    pub fn kleene_star(&self, new_initial_state: Q) -> Result<Self, NfaError> {
        if self.states.contains(&new_initial_state) {
            return Err(NfaError::InvalidKleeneStarInitialState);
        }

        let mut states = self.states.clone();
        states.insert(new_initial_state.clone());

        let mut accept_states = self.accept_states.clone();
        accept_states.insert(new_initial_state.clone());

        let mut delta = self.delta.clone();
        for state in &self.accept_states {
            delta
                .entry((state.clone(), self.epsilon.clone()))
                .or_default()
                .insert(self.initial_state.clone());
        }
        let mut from_fresh = IndexSet::new();
        from_fresh.insert(self.initial_state.clone());
        delta.insert((new_initial_state.clone(), self.epsilon.clone()), from_fresh);

        NFA::new(
            self.sigma.clone(),
            states,
            new_initial_state,
            accept_states,
            delta,
            self.epsilon.clone(),
        )
    }

    /// Check the structural invariants: a non-empty state set containing
    /// the initial and accepting states, and a transition table over known
    /// states and alphabet symbols only.
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

        self.delta.iter().all(|((state, symbol), targets)| {
            self.states.contains(state)
                && self.sigma.contains(symbol)
                && targets.iter().all(|target| self.states.contains(target))
        })
    }
}

impl<S, Q> NFA<S, Q>
where
    S: Clone + Eq + Hash + fmt::Display,
    Q: Clone + Eq + Hash,
{
    /// Convert the automaton into a regular expression by state
    /// elimination.
    ///
    /// `qi` and `qa` name the fresh initial and accepting states the
    /// algorithm splices in; neither may collide with an existing state.
    /// `emptyset` labels absent edges while intermediate states are
    /// eliminated and must not collide with any symbol rendering. States
    /// are eliminated in insertion order, so the shape of the resulting
    /// expression is reproducible; the recognized language is the same
    /// either way.
    pub fn to_regex(&self, qi: Q, qa: Q, emptyset: &str) -> Result<Regex, NfaError> {
        if self.states.contains(&qi) {
            return Err(NfaError::InvalidEliminationInitialState);
        }
        if self.states.contains(&qa) {
            return Err(NfaError::InvalidEliminationAcceptState);
        }

        let mut states = self.states.clone();
        states.insert(qi.clone());
        states.insert(qa.clone());

        let mut delta = self.delta.clone();
        let mut from_qi = IndexSet::new();
        from_qi.insert(self.initial_state.clone());
        delta.insert((qi.clone(), self.epsilon.clone()), from_qi);
        for state in &self.accept_states {
            delta
                .entry((state.clone(), self.epsilon.clone()))
                .or_default()
                .insert(qa.clone());
        }

        // Distinct symbol renderings per ordered state pair, with reserved
        // characters escaped so each label re-parses as a literal.
        let mut edge_labels: IndexMap<(Q, Q), IndexSet<String>> = IndexMap::new();
        for ((from, symbol), targets) in &delta {
            for to in targets {
                edge_labels
                    .entry((from.clone(), to.clone()))
                    .or_default()
                    .insert(escape_symbol(&symbol.to_string()));
            }
        }

        let epsilon_label = self.epsilon.to_string();
        let mut labels: IndexMap<(Q, Q), String> = IndexMap::new();
        for ((from, to), set) in edge_labels {
            let mut combined = set.iter().join("|");
            if set.len() > 1 {
                combined = format!("({combined})");
            }
            labels.insert((from, to), combined);
        }

        let mut remaining = states;
        while remaining.len() > 2 {
            let removed = match remaining.iter().find(|q| **q != qi && **q != qa) {
                Some(q) => q.clone(),
                None => break,
            };
            remaining.shift_remove(&removed);

            let pairs: Vec<(Q, Q)> = remaining
                .iter()
                .cartesian_product(remaining.iter())
                .map(|(u, v)| (u.clone(), v.clone()))
                .collect();

            let mut next: IndexMap<(Q, Q), String> = IndexMap::new();
            for (u, v) in pairs {
                let into = labels
                    .get(&(u.clone(), removed.clone()))
                    .filter(|label| label.as_str() != emptyset);
                let around = labels
                    .get(&(removed.clone(), removed.clone()))
                    .filter(|label| {
                        label.as_str() != emptyset && label.as_str() != epsilon_label
                    });
                let out = labels
                    .get(&(removed.clone(), v.clone()))
                    .filter(|label| label.as_str() != emptyset);
                let direct = labels
                    .get(&(u.clone(), v.clone()))
                    .filter(|label| label.as_str() != emptyset);

                let through = match (into, out) {
                    (Some(into), Some(out)) => {
                        let mut label = into.clone();
                        if let Some(around) = around {
                            label.push_str(&format!("({around})*"));
                        }
                        label.push_str(out);
                        Some(label)
                    }
                    _ => None,
                };

                let label = match (through, direct) {
                    (Some(through), Some(direct)) => format!("({through}|{direct})"),
                    (Some(through), None) => through,
                    (None, Some(direct)) => direct.clone(),
                    (None, None) => emptyset.to_owned(),
                };
                next.insert((u, v), label);
            }
            labels = next;
        }

        let expression = labels
            .get(&(qi, qa))
            .cloned()
            .unwrap_or_else(|| emptyset.to_owned());

        Ok(Regex::with_sentinels(&expression, &epsilon_label, emptyset)?)
    }
}

/// Union of two automata behind a fresh initial state that holds epsilon
/// edges into both operands. The alphabets must match exactly.
///
/// The operand state sets are taken as-is: callers must keep them disjoint
/// from each other and from the fresh initial state, or the result silently
/// recognizes the wrong language.
pub fn nfa_union<S, Q>(
    n0: &NFA<S, Q>,
    n1: &NFA<S, Q>,
    new_initial_state: Q,
) -> Result<NFA<S, Q>, NfaError>
where
    S: Clone + Eq + Hash,
    Q: Clone + Eq + Hash,
{
    if n0.sigma != n1.sigma {
        return Err(NfaError::SigmaMismatch);
    }

    let mut states = n0.states.clone();
    states.extend(n1.states.iter().cloned());
    states.insert(new_initial_state.clone());

    let mut accept_states = n0.accept_states.clone();
    accept_states.extend(n1.accept_states.iter().cloned());

    let mut delta = n0.delta.clone();
    for (key, targets) in &n1.delta {
        delta.insert(key.clone(), targets.clone());
    }
    let mut from_fresh = IndexSet::new();
    from_fresh.insert(n0.initial_state.clone());
    from_fresh.insert(n1.initial_state.clone());
    delta.insert((new_initial_state.clone(), n0.epsilon.clone()), from_fresh);

    NFA::new(
        n0.sigma.clone(),
        states,
        new_initial_state,
        accept_states,
        delta,
        n0.epsilon.clone(),
    )
}

/// Concatenation of two automata, `n0` first. The accepting states of `n0`
/// gain epsilon edges into the initial state of `n1`. The alphabets must
/// match exactly and the operand state sets must be disjoint.
pub fn nfa_concat<S, Q>(n0: &NFA<S, Q>, n1: &NFA<S, Q>) -> Result<NFA<S, Q>, NfaError>
where
    S: Clone + Eq + Hash,
    Q: Clone + Eq + Hash,
{
    if n0.sigma != n1.sigma {
        return Err(NfaError::SigmaMismatch);
    }

    let mut states = n0.states.clone();
    states.extend(n1.states.iter().cloned());

    let mut delta = n0.delta.clone();
    for (key, targets) in &n1.delta {
        delta.insert(key.clone(), targets.clone());
    }
    for state in &n0.accept_states {
        delta
            .entry((state.clone(), n0.epsilon.clone()))
            .or_default()
            .insert(n1.initial_state.clone());
    }

    NFA::new(
        n0.sigma.clone(),
        states,
        n0.initial_state.clone(),
        n1.accept_states.clone(),
        delta,
        n0.epsilon.clone(),
    )
}

/// Depth-first walk over epsilon edges only.
fn epsilon_reachable<S, Q>(delta: &NfaDelta<S, Q>, epsilon: &S, state: &Q) -> IndexSet<Q>
where
    S: Clone + Eq + Hash,
    Q: Clone + Eq + Hash,
{
    let mut closure = IndexSet::new();
    closure.insert(state.clone());
    let mut stack = vec![state.clone()];

    while let Some(current) = stack.pop() {
        if let Some(targets) = delta.get(&(current, epsilon.clone())) {
            for target in targets {
                if closure.insert(target.clone()) {
                    stack.push(target.clone());
                }
            }
        }
    }

    closure
}

/// The subset construction. Frontier sets with the same members reuse one
/// canonical [`StateSet`] key, so transitions recorded at different times
/// agree; the empty set doubles as the total trap state.
fn construct_dfa<S, Q>(
    sigma: &IndexSet<S>,
    accept_states: &IndexSet<Q>,
    delta: &NfaDelta<S, Q>,
    initial_state: &Q,
    epsilon: &S,
) -> DFA<S, StateSet<Q>>
where
    S: Clone + Eq + Hash,
    Q: Clone + Eq + Hash,
{
    let mut dfa_sigma = sigma.clone();
    dfa_sigma.shift_remove(epsilon);

    let dfa_initial = StateSet::from(epsilon_reachable(delta, epsilon, initial_state));

    let mut dfa_states: IndexSet<StateSet<Q>> = IndexSet::new();
    dfa_states.insert(dfa_initial.clone());

    let mut frontier = VecDeque::new();
    frontier.push_back(dfa_initial.clone());

    let mut dfa_delta: DfaDelta<S, StateSet<Q>> = IndexMap::new();
    while let Some(source) = frontier.pop_front() {
        for symbol in &dfa_sigma {
            let mut members: IndexSet<Q> = IndexSet::new();
            for state in source.iter() {
                if let Some(targets) = delta.get(&(state.clone(), symbol.clone())) {
                    for target in targets {
                        members.extend(epsilon_reachable(delta, epsilon, target));
                    }
                }
            }

            let target = StateSet::from(members);
            if dfa_states.insert(target.clone()) {
                frontier.push_back(target.clone());
            }
            dfa_delta.insert((source.clone(), symbol.clone()), target);
        }
    }

    let dfa_accept: IndexSet<StateSet<Q>> = dfa_states
        .iter()
        .filter(|set| set.iter().any(|state| accept_states.contains(state)))
        .cloned()
        .collect();

    debug!(
        "subset construction produced {} deterministic states",
        dfa_states.len()
    );

    DFA::new(dfa_sigma, dfa_states, dfa_initial, dfa_accept, dfa_delta)
}
