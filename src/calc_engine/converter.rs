use super::error::{CalcError, ParseError};
use super::token::{format_postfix, Operator, Token};
use super::tokenizer::Tokenizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ExpectingOperand,
    ExpectingOperator,
}

/// Shunting-yard conversion of the tokenizer's remaining input to postfix order.
///
/// Tokens are pulled one at a time, so a lexical error past a grammar error is
/// never reached: `2 3 &` fails with "operator expected", not with the `&`.
pub fn convert(tokenizer: &mut Tokenizer) -> Result<Vec<Token>, CalcError> {
    let mut output = Vec::new();
    let mut stack: Vec<Token> = Vec::new();
    let mut state = State::ExpectingOperand;

    loop {
        let token = tokenizer.next_token()?;

        match state {
            State::ExpectingOperand => match token {
                Token::Number { .. } => {
                    output.push(token);
                    state = State::ExpectingOperator;
                }
                Token::LParen | Token::Op(Operator::Neg) => stack.push(token),
                Token::End => return Err(ParseError::IncompleteExpression.into()),
                _ => return Err(ParseError::OperandExpected.into()),
            },
            State::ExpectingOperator => match token {
                Token::Op(op) if op.arity() == 2 => {
                    pop_higher(&mut stack, &mut output, op);
                    stack.push(token);
                    state = State::ExpectingOperand;
                }
                Token::RParen => close_group(&mut stack, &mut output)?,
                Token::End => {
                    while let Some(top) = stack.pop() {
                        if top == Token::LParen {
                            return Err(ParseError::UnmatchedLeftParen.into());
                        }
                        output.push(top);
                    }
                    log::debug!("postfix: {}", format_postfix(&output));
                    return Ok(output);
                }
                _ => return Err(ParseError::OperatorExpected.into()),
            },
        }
    }
}

fn pop_higher(stack: &mut Vec<Token>, output: &mut Vec<Token>, incoming: Operator) {
    while let Some(&Token::Op(top)) = stack.last() {
        let pops = top.precedence() > incoming.precedence()
            || (top.precedence() == incoming.precedence() && !incoming.is_right_associative());
        if !pops {
            break;
        }
        output.push(Token::Op(top));
        stack.pop();
    }
}

fn close_group(stack: &mut Vec<Token>, output: &mut Vec<Token>) -> Result<(), ParseError> {
    while let Some(top) = stack.pop() {
        if top == Token::LParen {
            return Ok(());
        }
        output.push(top);
    }
    Err(ParseError::UnmatchedRightParen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc_engine::error::LexError;
    use assert_matches::assert_matches;

    fn rpn(input: &str) -> Result<String, CalcError> {
        let mut tokenizer = Tokenizer::new();
        tokenizer.reset(input);
        convert(&mut tokenizer).map(|tokens| format_postfix(&tokens))
    }

    #[test]
    fn precedence() {
        assert_eq!(rpn("2+3*4").unwrap(), "2 3 4 * +");
        assert_eq!(rpn("2*3+4").unwrap(), "2 3 * 4 +");
    }

    #[test]
    fn left_associative() {
        assert_eq!(rpn("8/2*3").unwrap(), "8 2 / 3 *");
        assert_eq!(rpn("10-3-2").unwrap(), "10 3 - 2 -");
    }

    #[test]
    fn classic_example() {
        assert_eq!(rpn("3 + 4 * 2 / (1 - 5)").unwrap(), "3 4 2 * 1 5 - / +");
    }

    #[test]
    fn parens_are_dropped() {
        assert_eq!(rpn("((42))").unwrap(), "42");
        assert_eq!(rpn("(2+3)*4").unwrap(), "2 3 + 4 *");
    }

    #[test]
    fn unary_minus() {
        assert_eq!(rpn("-5").unwrap(), "5 ~");
        assert_eq!(rpn("--3").unwrap(), "3 ~ ~");
        assert_eq!(rpn("-3*2").unwrap(), "3 ~ 2 *");
        assert_eq!(rpn("5*-3").unwrap(), "5 3 ~ *");
        assert_eq!(rpn("-(2+3)*4").unwrap(), "2 3 + ~ 4 *");
    }

    #[test]
    fn empty_input() {
        assert_matches!(rpn(""), Err(CalcError::Parse(ParseError::IncompleteExpression)));
        assert_matches!(rpn(" \t\r\n"), Err(CalcError::Parse(ParseError::IncompleteExpression)));
    }

    #[test]
    fn trailing_operator() {
        assert_matches!(rpn("2+3-"), Err(CalcError::Parse(ParseError::IncompleteExpression)));
        assert_matches!(rpn("-"), Err(CalcError::Parse(ParseError::IncompleteExpression)));
    }

    #[test]
    fn operand_position_errors() {
        assert_matches!(rpn("+3"), Err(CalcError::Parse(ParseError::OperandExpected)));
        assert_matches!(rpn("5**2"), Err(CalcError::Parse(ParseError::OperandExpected)));
        assert_matches!(rpn("()"), Err(CalcError::Parse(ParseError::OperandExpected)));
        assert_matches!(rpn("(1+)"), Err(CalcError::Parse(ParseError::OperandExpected)));
    }

    #[test]
    fn operator_position_errors() {
        assert_matches!(rpn("2 3"), Err(CalcError::Parse(ParseError::OperatorExpected)));
        assert_matches!(rpn("1(2+3)"), Err(CalcError::Parse(ParseError::OperatorExpected)));
        assert_matches!(rpn("1..2"), Err(CalcError::Parse(ParseError::OperatorExpected)));
        assert_matches!(rpn("2 3 &"), Err(CalcError::Parse(ParseError::OperatorExpected)));
    }

    #[test]
    fn unbalanced_parens() {
        assert_matches!(rpn("(2+3"), Err(CalcError::Parse(ParseError::UnmatchedLeftParen)));
        assert_matches!(rpn("((1+2)"), Err(CalcError::Parse(ParseError::UnmatchedLeftParen)));
        assert_matches!(rpn("2+3)"), Err(CalcError::Parse(ParseError::UnmatchedRightParen)));
        assert_matches!(rpn("(1+2))"), Err(CalcError::Parse(ParseError::UnmatchedRightParen)));
    }

    #[test]
    fn lex_errors_pass_through() {
        assert_matches!(
            rpn("2+a"),
            Err(CalcError::Lex(LexError::UnexpectedChar { ch: 'a', position: 2 }))
        );
    }
}
