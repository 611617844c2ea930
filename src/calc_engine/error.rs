use super::token::Operator;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("invalid number '{literal}' at position {position}")]
    InvalidNumber { literal: String, position: usize },
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("operand expected")]
    OperandExpected,
    #[error("operator expected")]
    OperatorExpected,
    #[error("')' without matching '('")]
    UnmatchedRightParen,
    #[error("'(' without matching ')'")]
    UnmatchedLeftParen,
    #[error("incomplete expression")]
    IncompleteExpression,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("operator '{op}' needs {needed} operand(s), found {found}")]
    InsufficientOperands { op: Operator, needed: usize, found: usize },
    #[error("division by zero")]
    DivisionByZero,
    #[error("unexpected token '{0}' in postfix sequence")]
    UnexpectedToken(String),
    #[error("invalid expression, {remaining} value(s) left on the stack")]
    Malformed { remaining: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lexer,
    Parser,
    Evaluator,
}

/// Any pipeline failure, tagged with the stage that produced it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Lexer error: {0}")]
    Lex(#[from] LexError),
    #[error("Parser error: {0}")]
    Parse(#[from] ParseError),
    #[error("Eval error: {0}")]
    Eval(#[from] EvalError),
}

impl CalcError {
    pub fn stage(&self) -> Stage {
        match self {
            CalcError::Lex(_) => Stage::Lexer,
            CalcError::Parse(_) => Stage::Parser,
            CalcError::Eval(_) => Stage::Evaluator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_stage_prefix() {
        let err: CalcError = ParseError::UnmatchedLeftParen.into();
        assert_eq!(err.to_string(), "Parser error: '(' without matching ')'");
        assert_eq!(err.stage(), Stage::Parser);

        let err: CalcError = EvalError::DivisionByZero.into();
        assert_eq!(err.to_string(), "Eval error: division by zero");
        assert_eq!(err.stage(), Stage::Evaluator);
    }

    #[test]
    fn lex_error_names_character() {
        let err: CalcError = LexError::UnexpectedChar { ch: '&', position: 2 }.into();
        assert_eq!(err.to_string(), "Lexer error: unexpected character '&' at position 2");
        assert_eq!(err.stage(), Stage::Lexer);
    }
}
