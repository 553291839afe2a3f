//! Two-stack infix evaluation.
//!
//! Operands go on one stack, pending operators and open parentheses on the
//! other. `*` and `/` are applied as soon as their right operand arrives;
//! `+` and `-` are deferred until the next additive operator, a closing
//! parenthesis, or the end of input. Both rules give left-to-right
//! associativity within a precedence level.

use super::lexer::{Operator, Token};
use super::{FormulaError, LookupError};

enum Pending {
    Op(Operator),
    LeftParen,
}

struct Stacks {
    values: Vec<f64>,
    pending: Vec<Pending>,
}

impl Operator {
    /// Apply `left op right`.
    pub(crate) fn apply(self, left: f64, right: f64) -> Result<f64, FormulaError> {
        match self {
            Operator::Add => Ok(left + right),
            Operator::Sub => Ok(left - right),
            Operator::Mul => Ok(left * right),
            Operator::Div if right == 0.0 => Err(FormulaError::divide_by_zero()),
            Operator::Div => Ok(left / right),
        }
    }
}

impl Stacks {
    fn pop_value(&mut self) -> Result<f64, FormulaError> {
        self.values.pop().ok_or_else(FormulaError::malformed)
    }

    fn top_operator(&self, additive: bool) -> Option<Operator> {
        match self.pending.last() {
            Some(Pending::Op(op)) if op.is_additive() == additive => Some(*op),
            _ => None,
        }
    }

    /// Pop the top operator and the two topmost operands, push the result.
    fn fold(&mut self, op: Operator) -> Result<(), FormulaError> {
        self.pending.pop();
        let right = self.pop_value()?;
        let left = self.pop_value()?;
        self.values.push(op.apply(left, right)?);
        Ok(())
    }

    fn fold_additive(&mut self) -> Result<(), FormulaError> {
        match self.top_operator(true) {
            Some(op) => self.fold(op),
            None => Ok(()),
        }
    }

    fn fold_multiplicative(&mut self) -> Result<(), FormulaError> {
        match self.top_operator(false) {
            Some(op) => self.fold(op),
            None => Ok(()),
        }
    }

    fn push_operand(&mut self, value: f64) -> Result<(), FormulaError> {
        self.values.push(value);
        self.fold_multiplicative()
    }
}

/// Evaluate a checked token sequence. Variable names are already normalized.
pub(crate) fn evaluate<L>(tokens: &[Token], lookup: L) -> Result<f64, FormulaError>
where
    L: Fn(&str) -> Result<f64, LookupError>,
{
    let mut stacks = Stacks {
        values: Vec::with_capacity(tokens.len() / 2 + 1),
        pending: Vec::new(),
    };

    for token in tokens {
        match token {
            Token::Number(n) => stacks.push_operand(*n)?,
            Token::Variable(name) => {
                let value = lookup(name).map_err(FormulaError::from)?;
                stacks.push_operand(value)?;
            }
            Token::Operator(op) if op.is_additive() => {
                stacks.fold_additive()?;
                stacks.pending.push(Pending::Op(*op));
            }
            Token::Operator(op) => stacks.pending.push(Pending::Op(*op)),
            Token::LeftParen => stacks.pending.push(Pending::LeftParen),
            Token::RightParen => {
                stacks.fold_additive()?;
                match stacks.pending.pop() {
                    Some(Pending::LeftParen) => {}
                    _ => return Err(FormulaError::malformed()),
                }
                stacks.fold_multiplicative()?;
            }
            Token::Invalid(_) => return Err(FormulaError::malformed()),
        }
    }

    match stacks.pending.last() {
        None => {}
        Some(Pending::Op(op)) => {
            let op = *op;
            stacks.fold(op)?;
        }
        Some(Pending::LeftParen) => return Err(FormulaError::malformed()),
    }
    let result = stacks.pop_value()?;
    if stacks.values.is_empty() && stacks.pending.is_empty() {
        Ok(result)
    } else {
        Err(FormulaError::malformed())
    }
}
