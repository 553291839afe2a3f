//! Infix formulas over numbers and named variables.
//!
//! A [`Formula`] is parsed and checked once, at construction, and is
//! immutable afterwards. Construction either yields a syntactically valid
//! formula or a [`FormulaFormatError`]; there is no partially valid state.
//!
//! Equality and hashing use the canonical rendering, so formulas that differ
//! only in whitespace, variable spelling (under the normalizer) or numeric
//! literal spelling compare equal:
//!
//! ```
//! use cellgraph_engine::engine::Formula;
//!
//! let a = Formula::new("3+3 * 4").unwrap();
//! let b = Formula::new("3 + 3*4.000").unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.to_string(), "3+3*4");
//! ```

mod eval;
mod lexer;
mod syntax;

use std::fmt;
use std::hash::{Hash, Hasher};

use thiserror::Error;

use crate::error::FormulaFormatError;
use lexer::Token;

pub use lexer::Operator;

/// An evaluation-time failure. This is a value, not a raised fault: it is
/// stored as a cell's value and flows to dependents.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FormulaError {
    reason: String,
}

impl FormulaError {
    pub fn new(reason: impl Into<String>) -> Self {
        FormulaError {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub(crate) fn divide_by_zero() -> Self {
        FormulaError::new("Cannot divide by zero")
    }

    pub(crate) fn malformed() -> Self {
        FormulaError::new("Malformed expression")
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl From<LookupError> for FormulaError {
    fn from(err: LookupError) -> Self {
        FormulaError::new(err.to_string())
    }
}

/// Why a variable lookup produced no number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Invalid variable name: {0}")]
    InvalidName(String),

    #[error("Variable {0} is undefined")]
    Undefined(String),

    #[error("Cell {0} is empty")]
    Empty(String),

    #[error("Cell {0} holds text, not a number")]
    NotANumber(String),

    /// The referenced cell's own value is an error; its reason is forwarded.
    #[error("{reason}")]
    Upstream { cell: String, reason: String },
}

/// A parsed, validated formula.
#[derive(Clone, Debug)]
pub struct Formula {
    /// Variables are stored in normalized form.
    tokens: Vec<Token>,
    canonical: String,
}

impl Formula {
    /// Parse with the identity normalizer and a validator that accepts every variable.
    pub fn new(text: &str) -> Result<Formula, FormulaFormatError> {
        Formula::with(text, |name| name.to_string(), |_| true)
    }

    /// Parse `text`, normalizing every variable with `normalize` and rejecting
    /// the formula if any normalized variable is no longer a variable or is
    /// refused by `is_valid`.
    ///
    /// `normalize` and `is_valid` must be pure.
    pub fn with<N, V>(text: &str, normalize: N, is_valid: V) -> Result<Formula, FormulaFormatError>
    where
        N: Fn(&str) -> String,
        V: Fn(&str) -> bool,
    {
        let tokens = lexer::tokenize(text);
        syntax::check(&tokens, |name| {
            let normalized = normalize(name);
            lexer::is_variable(&normalized) && is_valid(&normalized)
        })?;

        let tokens: Vec<Token> = tokens
            .into_iter()
            .map(|token| match token {
                Token::Variable(name) => Token::Variable(normalize(&name)),
                other => other,
            })
            .collect();
        let canonical = render(&tokens);

        Ok(Formula { tokens, canonical })
    }

    /// Distinct normalized variables, in order of first occurrence.
    pub fn variables(&self) -> Vec<String> {
        let mut vars: Vec<String> = Vec::new();
        for token in &self.tokens {
            if let Token::Variable(name) = token {
                if !vars.iter().any(|v| v == name) {
                    vars.push(name.clone());
                }
            }
        }
        vars
    }

    /// Evaluate using `lookup` for variable values.
    ///
    /// Never panics: lookup failures, division by zero and anything else that
    /// prevents a result come back as a [`FormulaError`].
    pub fn evaluate<L>(&self, lookup: L) -> Result<f64, FormulaError>
    where
        L: Fn(&str) -> Result<f64, LookupError>,
    {
        eval::evaluate(&self.tokens, lookup)
    }

    /// The canonical rendering (same as `to_string()`).
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

fn render(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::LeftParen => out.push('('),
            Token::RightParen => out.push(')'),
            Token::Operator(op) => out.push(op.symbol()),
            Token::Variable(name) => out.push_str(name),
            Token::Number(n) => out.push_str(&n.to_string()),
            Token::Invalid(text) => out.push_str(text),
        }
    }
    out
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for Formula {}

impl Hash for Formula {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl std::str::FromStr for Formula {
    type Err = FormulaFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(formula: &Formula) -> u64 {
        let mut hasher = DefaultHasher::new();
        formula.hash(&mut hasher);
        hasher.finish()
    }

    fn zero(_: &str) -> Result<f64, LookupError> {
        Ok(0.0)
    }

    #[test]
    fn test_to_string_strips_whitespace() {
        assert_eq!(Formula::new("3 + 4").unwrap().to_string(), "3+4");
    }

    #[test]
    fn test_to_string_normalizes_variables() {
        let f = Formula::with("A2 + 3", |s| s.to_lowercase(), |_| true).unwrap();
        assert_eq!(f.to_string(), "a2+3");

        let f = Formula::with("(3 * A2)+ 7/b3 * (c6/Cc3)", |s| s.to_uppercase(), |_| true)
            .unwrap();
        assert_eq!(f.to_string(), "(3*A2)+7/B3*(C6/CC3)");
    }

    #[test]
    fn test_to_string_reprints_numbers() {
        let f = Formula::new("2.000 + 1e1 + 0.50").unwrap();
        assert_eq!(f.to_string(), "2+10+0.5");
    }

    #[test]
    fn test_validator_sees_normalized_name() {
        let upper_only = |s: &str| s.chars().all(|c| !c.is_ascii_lowercase());
        assert!(Formula::with("a1 + b2", |s| s.to_uppercase(), upper_only).is_ok());
        assert_eq!(
            Formula::with("a1 + b2", |s| s.to_string(), upper_only),
            Err(FormulaFormatError::InvalidVariable("a1".to_string()))
        );
    }

    #[test]
    fn test_normalized_name_must_stay_a_variable() {
        assert_eq!(
            Formula::with("x1 + 2", |s| format!("{s}$"), |_| true),
            Err(FormulaFormatError::InvalidVariable("x1".to_string()))
        );
        assert_eq!(
            Formula::with("2 * x_1", |s| s.replace('_', " "), |_| true),
            Err(FormulaFormatError::InvalidVariable("x_1".to_string()))
        );
        assert!(Formula::with("2 * x_1", |s| s.replace('_', ""), |_| true).is_ok());
    }

    #[test]
    fn test_evaluate_constants() {
        assert_eq!(Formula::new("(3 * 3) + 1.5").unwrap().evaluate(zero), Ok(10.5));
        assert_eq!(Formula::new("3 * 3").unwrap().evaluate(zero), Ok(9.0));
        let f = Formula::new("(3 * 20.2) + 7.63 / 5 + (4.00 + 2.0) + (3.0 * (4 * 10) * 7)").unwrap();
        let value = f.evaluate(zero).unwrap();
        assert!((value - 908.126).abs() < 1e-9);
    }

    #[test]
    fn test_evaluate_with_variables() {
        let f = Formula::new("A6 * 3 + 1.5").unwrap();
        assert_eq!(f.evaluate(|_| Ok(3.0)), Ok(10.5));

        let f = Formula::new("(A6 * 20.2) + 7.63 / 5 + (A7 - 2.0)").unwrap();
        let value = f.evaluate(|_| Ok(4.0)).unwrap();
        assert!((value - 84.326).abs() < 1e-9);
    }

    #[test]
    fn test_evaluate_looks_up_normalized_names() {
        let f = Formula::with("x1 - y2", |s| s.to_uppercase(), |_| true).unwrap();
        let value = f.evaluate(|name| match name {
            "X1" => Ok(10.0),
            "Y2" => Ok(4.0),
            other => Err(LookupError::Undefined(other.to_string())),
        });
        assert_eq!(value, Ok(6.0));
    }

    #[test]
    fn test_divide_by_zero_is_a_value() {
        let err = Formula::new("10 / 0").unwrap().evaluate(zero).unwrap_err();
        assert!(err.reason().contains("divide by zero"));
    }

    #[test]
    fn test_lookup_failure_becomes_formula_error() {
        let f = Formula::new("A1 + 1").unwrap();
        let err = f
            .evaluate(|name| Err(LookupError::NotANumber(name.to_string())))
            .unwrap_err();
        assert_eq!(err.reason(), "Cell A1 holds text, not a number");
    }

    #[test]
    fn test_upstream_reason_is_forwarded_unchanged() {
        let f = Formula::new("B1 * 2").unwrap();
        let err = f
            .evaluate(|name| {
                Err(LookupError::Upstream {
                    cell: name.to_string(),
                    reason: "Cannot divide by zero".to_string(),
                })
            })
            .unwrap_err();
        assert_eq!(err.reason(), "Cannot divide by zero");
    }

    #[test]
    fn test_variables_in_first_occurrence_order() {
        let f = Formula::new("(A6 + A7) * A8 + A9 + A6").unwrap();
        assert_eq!(f.variables(), vec!["A6", "A7", "A8", "A9"]);
    }

    #[test]
    fn test_variables_deduplicate_after_normalization() {
        let f = Formula::with("a1 + A1 + b2", |s| s.to_uppercase(), |_| true).unwrap();
        assert_eq!(f.variables(), vec!["A1", "B2"]);
    }

    #[test]
    fn test_variables_none() {
        assert!(Formula::new("6 + 2 * 4 - 1").unwrap().variables().is_empty());
    }

    #[test]
    fn test_many_variables() {
        let mut text = String::new();
        let mut expected = Vec::new();
        for c in 'a'..='z' {
            text.push_str(&format!("{c} + "));
            expected.push(c.to_string());
        }
        text.push_str("A6");
        expected.push("A6".to_string());
        assert_eq!(Formula::new(&text).unwrap().variables(), expected);
    }

    #[test]
    fn test_equality_and_hash() {
        let spaced = Formula::new("3+3 * 4").unwrap();
        let tight = Formula::new("3+3*4").unwrap();
        assert_eq!(spaced.to_string(), tight.to_string());
        assert_eq!(spaced, tight);
        assert_eq!(hash_of(&spaced), hash_of(&tight));

        let reordered = Formula::new("4*3+3").unwrap();
        assert_ne!(reordered, tight);
        assert_ne!(hash_of(&reordered), hash_of(&tight));
    }

    #[test]
    fn test_equality_across_normalizers() {
        let lower = Formula::with("3+3 * a6", |s| s.to_uppercase(), |_| true).unwrap();
        let upper = Formula::new("3+3*A6").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(hash_of(&lower), hash_of(&upper));
    }

    #[test]
    fn test_canonical_form_reparses_equal() {
        let f = Formula::new("( a1 + 2.50 ) / 1e2").unwrap();
        let again: Formula = f.to_string().parse().unwrap();
        assert_eq!(f, again);
    }

    #[test]
    fn test_construction_errors() {
        assert_eq!(Formula::new(""), Err(FormulaFormatError::Empty));
        assert_eq!(Formula::new("-3 + 2"), Err(FormulaFormatError::LeadingOperator));
        assert!(Formula::new("3 +").is_err());
        assert!(Formula::new("A1 # 2").is_err());
    }
}
