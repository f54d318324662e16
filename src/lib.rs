//! Construction, analysis, and execution of the three classical
//! representations of regular languages: deterministic finite automata,
//! nondeterministic finite automata with epsilon transitions, and regular
//! expressions, together with the conversions connecting them.
//!
//! ```
//! use relang::Regex;
//!
//! // An `a` followed by any mix of `b`s and `c`s.
//! let re = Regex::new("a(b|c)*").unwrap();
//! assert!(re.accepts("abbc"));
//! assert!(!re.accepts("ba"));
//!
//! // Membership tests run on the automaton compiled behind the expression.
//! let nfa = re.to_nfa();
//! let dfa = nfa.to_dfa();
//! assert!(dfa.accepts(&["a".into(), "c".into()]).unwrap());
//! ```

#![deny(rust_2018_idioms)]
#![deny(future_incompatible)]

mod regexp;
mod stateset;
mod thompson;

pub mod dfa;
pub mod nfa;
pub mod parser;

pub use dfa::{dfa_intersection, dfa_union, DfaError, DFA};
pub use nfa::{nfa_concat, nfa_union, NfaError, NFA};
pub use parser::ParseError;
pub use regexp::Regex;
pub use stateset::StateSet;
