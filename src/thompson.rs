//! Compilation of a normalized core expression into an NFA over
//! one-character string symbols, with `q0, q1, …` states drawn from a
//! monotonic counter. Fresh states for every union and star keep all
//! intermediate automata disjoint, which is what the NFA combinators
//! require of their callers.

use indexmap::{IndexMap, IndexSet};

use crate::nfa::{nfa_concat, nfa_union, NfaDelta, NFA};
use crate::parser::{is_core_operator, ParseError};

/// Compile a normalized expression, inferring the alphabet from it: every
/// non-operator character, plus any operator reached through a `/` escape,
/// becomes a one-character symbol. The empty string is the epsilon symbol.
pub(crate) fn compile(regular_expression: &str) -> Result<NFA<String, String>, ParseError> {
    let mut sigma: IndexSet<String> = IndexSet::new();
    let mut escaped = false;
    for c in regular_expression.chars() {
        if !escaped && c == '/' {
            escaped = true;
        } else if escaped || !is_core_operator(c) {
            sigma.insert(c.to_string());
            escaped = false;
        }
    }
    sigma.insert(String::new());

    let chars: Vec<char> = regular_expression.chars().collect();
    let mut state_num = 0usize;
    construct_recursive(&sigma, &chars, &mut state_num)
}

fn next_state(state_num: &mut usize) -> String {
    let state = format!("q{state_num}");
    *state_num += 1;
    state
}

/// One accepting state with an epsilon self-loop: the language of the
/// empty string.
fn nfa_of_epsilon(
    sigma: &IndexSet<String>,
    state_num: &mut usize,
) -> Result<NFA<String, String>, ParseError> {
    let q0 = next_state(state_num);

    let mut states = IndexSet::new();
    states.insert(q0.clone());
    let mut delta: NfaDelta<String, String> = IndexMap::new();
    delta.insert((q0.clone(), String::new()), states.clone());

    NFA::new(
        sigma.clone(),
        states.clone(),
        q0,
        states,
        delta,
        String::new(),
    )
    .map_err(|_| ParseError::NfaConstruction)
}

/// Two states joined by a single symbol edge.
fn nfa_of_symbol(
    sigma: &IndexSet<String>,
    symbol: &str,
    state_num: &mut usize,
) -> Result<NFA<String, String>, ParseError> {
    let q0 = next_state(state_num);
    let q1 = next_state(state_num);

    let mut states = IndexSet::new();
    states.insert(q0.clone());
    states.insert(q1.clone());
    let mut accept_states = IndexSet::new();
    accept_states.insert(q1.clone());
    let mut targets = IndexSet::new();
    targets.insert(q1);
    let mut delta: NfaDelta<String, String> = IndexMap::new();
    delta.insert((q0.clone(), symbol.to_owned()), targets);

    NFA::new(sigma.clone(), states, q0, accept_states, delta, String::new())
        .map_err(|_| ParseError::NfaConstruction)
}

fn construct_recursive(
    sigma: &IndexSet<String>,
    expr: &[char],
    state_num: &mut usize,
) -> Result<NFA<String, String>, ParseError> {
    let n = expr.len();
    // The empty expression and a bare star both recognize the empty string.
    if n == 0 || (n == 1 && expr[0] == '*') {
        return nfa_of_epsilon(sigma, state_num);
    }

    let mut accumulated: Option<NFA<String, String>> = None;
    let mut i = 0;
    while i < n {
        let c = expr[i];
        if !is_core_operator(c) || c == '/' {
            let symbol = if c == '/' {
                i += 1;
                *expr.get(i).ok_or(ParseError::NfaConstruction)?
            } else {
                c
            };

            let mut nfa = nfa_of_symbol(sigma, &symbol.to_string(), state_num)?;
            if expr.get(i + 1) == Some(&'*') {
                nfa = nfa
                    .kleene_star(next_state(state_num))
                    .map_err(|_| ParseError::NfaConstruction)?;
                i += 1;
            }

            accumulated = Some(match accumulated {
                Some(previous) => {
                    nfa_concat(&previous, &nfa).map_err(|_| ParseError::NfaConstruction)?
                }
                None => nfa,
            });
            i += 1;
        } else if c == '(' {
            let start = i + 1;
            let mut len = 0usize;
            let mut balance = 1i64;
            while balance != 0 {
                let current = *expr
                    .get(start + len)
                    .ok_or(ParseError::UnbalancedParens)?;
                if current == '/' {
                    len += 1;
                } else if current == '(' {
                    balance += 1;
                } else if current == ')' {
                    balance -= 1;
                }
                len += 1;
            }
            len -= 1;

            let mut nfa = construct_recursive(sigma, &expr[start..start + len], state_num)?;
            i = start + len;
            if expr.get(i + 1) == Some(&'*') {
                nfa = nfa
                    .kleene_star(next_state(state_num))
                    .map_err(|_| ParseError::NfaConstruction)?;
                i += 1;
            }

            accumulated = Some(match accumulated {
                Some(previous) => {
                    nfa_concat(&previous, &nfa).map_err(|_| ParseError::NfaConstruction)?
                }
                None => nfa,
            });
            i += 1;
        } else if c == '|' {
            let left = match accumulated {
                Some(nfa) => nfa,
                None => nfa_of_epsilon(sigma, state_num)?,
            };

            let start = i + 1;
            let mut len = 0usize;
            let mut balance = 0i64;
            while start + len < n && !(expr[start + len] == '|' && balance == 0) {
                if expr[start + len] == '(' {
                    balance += 1;
                } else if expr[start + len] == ')' {
                    balance -= 1;
                }
                len += 1;
            }
            if balance == -1 {
                len -= 1;
            }

            let right = if len == 0 {
                nfa_of_epsilon(sigma, state_num)?
            } else {
                construct_recursive(sigma, &expr[start..start + len], state_num)?
            };

            accumulated = Some(
                nfa_union(&left, &right, next_state(state_num))
                    .map_err(|_| ParseError::NfaConstruction)?,
            );
            i = start + len;
        } else {
            // A stray `)` or a star with nothing to repeat.
            return Err(ParseError::NfaConstruction);
        }
    }

    accumulated.ok_or(ParseError::NfaConstruction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(input: &str) -> Vec<String> {
        input.chars().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_empty_expression_accepts_only_empty_input() {
        let nfa = compile("").unwrap();
        assert!(nfa.accepts(&[]).unwrap());
        assert!(nfa.accepts(&symbols("a")).is_err());
    }

    #[test]
    fn test_single_symbol() {
        let nfa = compile("a").unwrap();
        assert!(nfa.accepts(&symbols("a")).unwrap());
        assert!(!nfa.accepts(&[]).unwrap());
        assert!(!nfa.accepts(&symbols("aa")).unwrap());
    }

    #[test]
    fn test_concatenation_and_star() {
        let nfa = compile("ab*").unwrap();
        assert!(nfa.accepts(&symbols("a")).unwrap());
        assert!(nfa.accepts(&symbols("abbb")).unwrap());
        assert!(!nfa.accepts(&symbols("b")).unwrap());
    }

    #[test]
    fn test_alternation() {
        let nfa = compile("a|b").unwrap();
        assert!(nfa.accepts(&symbols("a")).unwrap());
        assert!(nfa.accepts(&symbols("b")).unwrap());
        assert!(!nfa.accepts(&symbols("ab")).unwrap());
    }

    #[test]
    fn test_empty_alternative_accepts_empty_input() {
        let nfa = compile("a|").unwrap();
        assert!(nfa.accepts(&symbols("a")).unwrap());
        assert!(nfa.accepts(&[]).unwrap());
    }

    #[test]
    fn test_group_with_star() {
        let nfa = compile("(ab)*").unwrap();
        assert!(nfa.accepts(&[]).unwrap());
        assert!(nfa.accepts(&symbols("abab")).unwrap());
        assert!(!nfa.accepts(&symbols("aba")).unwrap());
    }

    #[test]
    fn test_escaped_operators_are_literals() {
        let nfa = compile("/(/)").unwrap();
        assert!(nfa.accepts(&symbols("()")).unwrap());
        assert!(!nfa.accepts(&symbols("(")).unwrap());
    }

    #[test]
    fn test_inferred_alphabet() {
        let nfa = compile("a(b|c)*").unwrap();
        assert!(nfa.sigma().contains("a"));
        assert!(nfa.sigma().contains("b"));
        assert!(nfa.sigma().contains("c"));
        assert!(nfa.sigma().contains(""));
        assert!(!nfa.sigma().contains("("));
    }

    #[test]
    fn test_misplaced_operators_fail() {
        assert_eq!(Err(ParseError::NfaConstruction), compile("*a").map(|_| ()));
        assert_eq!(Err(ParseError::NfaConstruction), compile("a**").map(|_| ()));
        assert_eq!(Err(ParseError::NfaConstruction), compile(")a").map(|_| ()));
    }

    #[test]
    fn test_bare_star_accepts_only_empty_input() {
        let nfa = compile("*").unwrap();
        assert!(nfa.accepts(&[]).unwrap());
        assert!(nfa.accepts(&symbols("a")).is_err());
    }
}
