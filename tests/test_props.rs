use indexmap::{indexmap, indexset};
use proptest::prelude::*;
use relang::{Regex, DFA};

/// Accepts binary strings with an odd number of `1`s.
fn odd_ones() -> DFA<char, u8> {
    DFA::new(
        indexset! {'0', '1'},
        indexset! {0, 1},
        0,
        indexset! {1},
        indexmap! {
            (0, '0') => 0,
            (0, '1') => 1,
            (1, '0') => 1,
            (1, '1') => 0,
        },
    )
}

fn to_symbols(input: &str) -> Vec<String> {
    input.chars().map(|c| c.to_string()).collect()
}

proptest! {
    #[test]
    fn complement_negates_exactly(w in proptest::collection::vec(prop_oneof![Just('0'), Just('1')], 0..16)) {
        let m = odd_ones();
        prop_assert_ne!(m.accepts(&w).unwrap(), m.complement().accepts(&w).unwrap());
    }

    #[test]
    fn minimal_preserves_language(w in proptest::collection::vec(prop_oneof![Just('0'), Just('1')], 0..16)) {
        let m = odd_ones();
        let minimal = m.minimal();
        prop_assert!(minimal.states().len() <= m.states().len());
        prop_assert_eq!(m.accepts(&w).unwrap(), minimal.accepts(&w).unwrap());
    }

    #[test]
    fn dfa_lift_preserves_language(w in proptest::collection::vec(prop_oneof![Just('0'), Just('1')], 0..16)) {
        let m = odd_ones();
        let n = m.to_nfa('e').unwrap();
        prop_assert_eq!(m.accepts(&w).unwrap(), n.accepts(&w).unwrap());
    }

    #[test]
    fn regex_agrees_with_its_nfa(w in "[abc]{0,8}") {
        let re = Regex::new("a(b|c)*").unwrap();
        let nfa = re.to_nfa();
        prop_assert_eq!(re.accepts(&w), nfa.accepts(&to_symbols(&w)).unwrap_or(false));
    }

    #[test]
    fn nfa_agrees_with_subset_dfa(w in "[abc]{0,8}") {
        let nfa = Regex::new("(a|bc)*").unwrap().to_nfa();
        let dfa = nfa.to_dfa();
        let symbols = to_symbols(&w);
        prop_assert_eq!(
            nfa.accepts(&symbols).unwrap_or(false),
            dfa.accepts(&symbols).unwrap_or(false)
        );
    }
}
