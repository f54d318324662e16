use std::fmt;
use std::str::FromStr;

use crate::nfa::NFA;
use crate::parser::{self, ParseError};
use crate::thompson;

/// A compiled regular expression.
///
/// The surface expression is normalized into the core operator set (`(`,
/// `)`, `|`, `*`, with `/` as the escape prefix) and compiled into an NFA
/// over one-character string symbols; membership tests run on the
/// deterministic automaton cached inside that NFA.
#[derive(Clone, Debug)]
pub struct Regex {
    expression: String,
    regular_expression: String,
    epsilon: String,
    emptyset: String,
    nfa: NFA<String, String>,
}

impl Regex {
    /// Compile `expression` with an empty epsilon sentinel and `"\0"` as
    /// the emptyset sentinel.
    pub fn new(expression: &str) -> Result<Self, ParseError> {
        Self::with_sentinels(expression, "", "\0")
    }

    /// Compile `expression`, treating occurrences of `epsilon` as the
    /// empty string and reserving `emptyset` to label absent edges during
    /// automaton-to-regex conversion.
    pub fn with_sentinels(
        expression: &str,
        epsilon: &str,
        emptyset: &str,
    ) -> Result<Self, ParseError> {
        let regular_expression = parser::normalize(expression, epsilon)?;
        let nfa = thompson::compile(&regular_expression)?;

        Ok(Self {
            expression: expression.to_owned(),
            regular_expression,
            epsilon: epsilon.to_owned(),
            emptyset: emptyset.to_owned(),
            nfa,
        })
    }

    /// Test a string for membership, splitting it into one-character
    /// symbols after removing any epsilon-sentinel occurrences.
    pub fn accepts(&self, input: &str) -> bool {
        let stripped = if self.epsilon.is_empty() {
            input.to_owned()
        } else {
            input.replace(&self.epsilon, "")
        };
        let symbols: Vec<String> = stripped.chars().map(|c| c.to_string()).collect();
        self.accepts_symbols(&symbols)
    }

    /// Test a sequence of symbols for membership. A symbol outside the
    /// inferred alphabet cannot occur in any accepted string, so alphabet
    /// failures from the engine collapse to `false`.
    pub fn accepts_symbols(&self, input: &[String]) -> bool {
        self.nfa.accepts(input).unwrap_or(false)
    }

    /// Clone the compiled automaton.
    pub fn to_nfa(&self) -> NFA<String, String> {
        self.nfa.clone()
    }

    /// The expression as the caller wrote it.
    #[inline]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The normalized expression, containing only the core operators.
    #[inline]
    pub fn regular_expression(&self) -> &str {
        &self.regular_expression
    }

    #[inline]
    pub fn epsilon(&self) -> &str {
        &self.epsilon
    }

    #[inline]
    pub fn emptyset(&self) -> &str {
        &self.emptyset
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

impl FromStr for Regex {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts() {
        let re = Regex::new("a(b|c)*").unwrap();

        assert!(re.accepts("a"));
        assert!(re.accepts("ab"));
        assert!(re.accepts("abbcbc"));
        assert!(!re.accepts(""));
        assert!(!re.accepts("b"));
        assert!(!re.accepts("ba"));
    }

    #[test]
    fn test_foreign_symbols_mean_rejection() {
        let re = Regex::new("ab").unwrap();
        assert!(!re.accepts("az"));
        assert!(!re.accepts("z"));
    }

    #[test]
    fn test_accepts_symbols() {
        let re = Regex::new("ab").unwrap();
        assert!(re.accepts_symbols(&["a".to_owned(), "b".to_owned()]));
        assert!(!re.accepts_symbols(&["a".to_owned()]));
    }

    #[test]
    fn test_epsilon_sentinel_is_spliced_out_of_input() {
        let re = Regex::with_sentinels("aEb", "E", "\0").unwrap();

        assert_eq!("ab", re.regular_expression());
        assert!(re.accepts("ab"));
        assert!(re.accepts("aEbE"));
        assert!(!re.accepts("a"));
    }

    #[test]
    fn test_accessors_and_display() {
        let re = Regex::with_sentinels("a+", "E", "#").unwrap();

        assert_eq!("a+", re.expression());
        assert_eq!("aa*", re.regular_expression());
        assert_eq!("E", re.epsilon());
        assert_eq!("#", re.emptyset());
        assert_eq!("a+", re.to_string());
    }

    #[test]
    fn test_from_str() {
        let re: Regex = "a|b".parse().unwrap();
        assert!(re.accepts("b"));

        let err = "a{".parse::<Regex>();
        assert_eq!(Err(ParseError::InvalidPower), err.map(|_| ()));
    }

    #[test]
    fn test_to_nfa_matches_regex() {
        let re = Regex::new("a(b|c)*").unwrap();
        let nfa = re.to_nfa();

        for input in ["a", "ab", "ac", "abc", "", "b", "ba"] {
            let symbols: Vec<String> = input.chars().map(|c| c.to_string()).collect();
            let by_nfa = nfa.accepts(&symbols).unwrap_or(false);
            assert_eq!(re.accepts(input), by_nfa);
        }
    }
}
