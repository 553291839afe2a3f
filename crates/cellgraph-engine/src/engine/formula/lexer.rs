//! Formula tokenizer.
//!
//! Splits formula text into five token classes: `(`, `)`, one of `+ - * /`,
//! variables (`[A-Za-z_][A-Za-z0-9_]*`) and unsigned floating-point literals.
//! Whitespace separates tokens and is dropped. Any run of characters that
//! matches none of the classes becomes a [`Token::Invalid`] so the syntax
//! check can report it.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// One of the four binary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    fn from_symbol(symbol: &str) -> Option<Operator> {
        match symbol {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Sub),
            "*" => Some(Operator::Mul),
            "/" => Some(Operator::Div),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    /// `+` and `-`, which bind looser than `*` and `/`.
    pub fn is_additive(self) -> bool {
        matches!(self, Operator::Add | Operator::Sub)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token {
    LeftParen,
    RightParen,
    Operator(Operator),
    Variable(String),
    Number(f64),
    Invalid(String),
}

impl Token {
    pub(crate) fn is_operator(&self) -> bool {
        matches!(self, Token::Operator(_))
    }
}

fn token_re() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?P<lparen>\()",
            r"|(?P<rparen>\))",
            r"|(?P<op>[+\-*/])",
            r"|(?P<var>[a-zA-Z_][a-zA-Z_0-9]*)",
            r"|(?P<num>(?:[0-9]+\.[0-9]*|[0-9]*\.[0-9]+|[0-9]+)(?:[eE][+-]?[0-9]+)?)",
            r"|(?P<space>\s+)",
        ))
        .expect("formula token regex must compile")
    })
}

fn variable_re() -> &'static Regex {
    static VARIABLE_RE: OnceLock<Regex> = OnceLock::new();
    VARIABLE_RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z_][a-zA-Z_0-9]*$").expect("variable regex must compile")
    })
}

/// Whether `name` would tokenize as a single variable.
pub(crate) fn is_variable(name: &str) -> bool {
    variable_re().is_match(name)
}

/// Tokenize formula text.
pub(crate) fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut last_end = 0;

    for caps in token_re().captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last_end {
            tokens.push(Token::Invalid(text[last_end..whole.start()].to_string()));
        }
        last_end = whole.end();

        let token = if caps.name("space").is_some() {
            continue;
        } else if caps.name("lparen").is_some() {
            Token::LeftParen
        } else if caps.name("rparen").is_some() {
            Token::RightParen
        } else if let Some(op) = caps.name("op").and_then(|m| Operator::from_symbol(m.as_str())) {
            Token::Operator(op)
        } else if let Some(var) = caps.name("var") {
            Token::Variable(var.as_str().to_string())
        } else {
            number_token(whole.as_str())
        };
        tokens.push(token);
    }

    if last_end < text.len() {
        tokens.push(Token::Invalid(text[last_end..].to_string()));
    }

    tokens
}

/// Literals that overflow to infinity are not representable in canonical form.
fn number_token(literal: &str) -> Token {
    match literal.parse::<f64>() {
        Ok(n) if n.is_finite() => Token::Number(n),
        _ => Token::Invalid(literal.to_string()),
    }
}
