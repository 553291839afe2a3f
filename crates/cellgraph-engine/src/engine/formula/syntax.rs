//! Syntax rules a token sequence must satisfy before it becomes a formula.

use super::lexer::Token;
use crate::error::FormulaFormatError;

/// Check `tokens` against the formula grammar.
///
/// `accepts_variable` receives each variable as written and decides whether
/// its normalized form is acceptable.
pub(crate) fn check<F>(tokens: &[Token], accepts_variable: F) -> Result<(), FormulaFormatError>
where
    F: Fn(&str) -> bool,
{
    let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
        return Err(FormulaFormatError::Empty);
    };
    if let Some(Token::Invalid(text)) = tokens.iter().find(|t| matches!(t, Token::Invalid(_))) {
        return Err(FormulaFormatError::InvalidToken(text.clone()));
    }
    if first.is_operator() {
        return Err(FormulaFormatError::LeadingOperator);
    }
    if last.is_operator() {
        return Err(FormulaFormatError::TrailingOperator);
    }

    let mut open = 0usize;
    let mut close = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        let next = tokens.get(i + 1);
        let closes_or_operates =
            next.is_none_or(|n| *n == Token::RightParen || n.is_operator());

        match token {
            // Rejected before the walk.
            Token::Invalid(_) => {}
            Token::LeftParen => {
                open += 1;
                match next {
                    Some(n) if n.is_operator() => {
                        return Err(FormulaFormatError::OperatorAfterOpenParen);
                    }
                    Some(Token::RightParen) => return Err(FormulaFormatError::EmptyParentheses),
                    _ => {}
                }
            }
            Token::RightParen => {
                close += 1;
                if close > open {
                    return Err(FormulaFormatError::UnmatchedCloseParen);
                }
                if !closes_or_operates {
                    return Err(FormulaFormatError::InvalidAfterCloseParen);
                }
            }
            Token::Operator(_) => {
                if next.is_some_and(Token::is_operator) {
                    return Err(FormulaFormatError::ConsecutiveOperators);
                }
            }
            Token::Number(_) => {
                if !closes_or_operates {
                    return Err(FormulaFormatError::InvalidAfterNumber);
                }
            }
            Token::Variable(name) => {
                if !accepts_variable(name) {
                    return Err(FormulaFormatError::InvalidVariable(name.clone()));
                }
                if !closes_or_operates {
                    return Err(FormulaFormatError::InvalidAfterVariable);
                }
            }
        }
    }

    if open != close {
        return Err(FormulaFormatError::UnbalancedParentheses { open, close });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::check;
    use crate::engine::formula::lexer::tokenize;
    use crate::error::FormulaFormatError;

    fn check_str(text: &str) -> Result<(), FormulaFormatError> {
        check(&tokenize(text), |_| true)
    }

    #[test]
    fn test_accepts_well_formed() {
        assert!(check_str("3 + 4").is_ok());
        assert!(check_str("(A1 + 2) * (b3 / 4)").is_ok());
        assert!(check_str("((x))").is_ok());
        assert!(check_str("7").is_ok());
    }

    #[test]
    fn test_rule_violations() {
        assert_eq!(check_str(""), Err(FormulaFormatError::Empty));
        assert_eq!(check_str("-3 + 2"), Err(FormulaFormatError::LeadingOperator));
        assert_eq!(check_str("3 + 2 *"), Err(FormulaFormatError::TrailingOperator));
        assert_eq!(check_str("(-3 + 2)"), Err(FormulaFormatError::OperatorAfterOpenParen));
        assert_eq!(
            check_str("(3 + 2))))) + 2"),
            Err(FormulaFormatError::UnmatchedCloseParen)
        );
        assert_eq!(check_str("(3 + 2) 2"), Err(FormulaFormatError::InvalidAfterCloseParen));
        assert_eq!(check_str("3 +- 2"), Err(FormulaFormatError::ConsecutiveOperators));
        assert_eq!(check_str("2 A6 + 2"), Err(FormulaFormatError::InvalidAfterNumber));
        assert_eq!(check_str("A6 2 + 2"), Err(FormulaFormatError::InvalidAfterVariable));
        assert_eq!(
            check_str("(((3 +2) * 5)"),
            Err(FormulaFormatError::UnbalancedParentheses { open: 3, close: 2 })
        );
        assert_eq!(check_str("()"), Err(FormulaFormatError::EmptyParentheses));
    }

    #[test]
    fn test_close_paren_before_open() {
        assert_eq!(check_str(")3("), Err(FormulaFormatError::UnmatchedCloseParen));
    }

    #[test]
    fn test_operand_before_open_paren() {
        assert_eq!(check_str("2(3)"), Err(FormulaFormatError::InvalidAfterNumber));
        assert_eq!(check_str("(1)(2)"), Err(FormulaFormatError::InvalidAfterCloseParen));
    }

    #[test]
    fn test_rejected_variables() {
        let tokens = tokenize("A6 * 2 + 2");
        assert_eq!(
            check(&tokens, |_| false),
            Err(FormulaFormatError::InvalidVariable("A6".to_string()))
        );
        let tokens = tokenize("3 * A6");
        assert_eq!(
            check(&tokens, |_| false),
            Err(FormulaFormatError::InvalidVariable("A6".to_string()))
        );
    }

    #[test]
    fn test_invalid_token() {
        assert_eq!(
            check_str("A1 & 2"),
            Err(FormulaFormatError::InvalidToken("&".to_string()))
        );
    }
}
