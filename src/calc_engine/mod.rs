//! Expression engine: tokenizer, infix-to-postfix converter and postfix evaluator.

pub mod converter;
pub mod error;
pub mod evaluator;
pub mod token;
pub mod tokenizer;

pub use converter::convert;
pub use error::{CalcError, EvalError, LexError, ParseError, Stage};
pub use evaluator::{EvaluationTrace, Step};
pub use token::{format_postfix, Operator, Token};
pub use tokenizer::Tokenizer;

/// Runs the three stages over one input string at a time.
///
/// Holds a single tokenizer, so one instance serves one caller; every call
/// resets it before use and nothing carries over between calls.
#[derive(Debug, Default)]
pub struct Calculator {
    tokenizer: Tokenizer,
}

impl Calculator {
    pub fn new() -> Self {
        Calculator {
            tokenizer: Tokenizer::new(),
        }
    }

    pub fn evaluate(&mut self, text: &str) -> Result<f64, CalcError> {
        self.evaluate_traced(text, &mut EvaluationTrace::new(false))
    }

    pub fn evaluate_traced(&mut self, text: &str, trace: &mut EvaluationTrace) -> Result<f64, CalcError> {
        self.evaluate_detailed(text, trace).map(|(_, value)| value)
    }

    /// Runs all three stages and hands back the postfix sequence along with
    /// the value.
    pub fn evaluate_detailed(
        &mut self,
        text: &str,
        trace: &mut EvaluationTrace,
    ) -> Result<(Vec<Token>, f64), CalcError> {
        self.tokenizer.reset(text);
        let outcome = convert(&mut self.tokenizer).and_then(|postfix| {
            let value = evaluator::evaluate_traced(&postfix, trace)?;
            Ok((postfix, value))
        });

        match &outcome {
            Ok((_, value)) => log::debug!("{:?} = {}", text, value),
            Err(e) => log::debug!(
                "{:?} failed near position {}: {}",
                text,
                self.tokenizer.position(),
                e
            ),
        }
        outcome
    }

    /// Stages 1 and 2 only.
    pub fn to_postfix(&mut self, text: &str) -> Result<Vec<Token>, CalcError> {
        self.tokenizer.reset(text);
        convert(&mut self.tokenizer)
    }
}

/// One-off evaluation with a fresh [`Calculator`].
pub fn evaluate(text: &str) -> Result<f64, CalcError> {
    Calculator::new().evaluate(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_tagged() {
        let mut calc = Calculator::new();
        assert_eq!(calc.evaluate("1 # 2").unwrap_err().stage(), Stage::Lexer);
        assert_eq!(calc.evaluate("1 2").unwrap_err().stage(), Stage::Parser);
        assert_eq!(calc.evaluate("1/0").unwrap_err().stage(), Stage::Evaluator);
    }

    #[test]
    fn instance_is_reusable_after_errors() {
        let mut calc = Calculator::new();
        assert!(calc.evaluate("(").is_err());
        assert_eq!(calc.evaluate("-1"), Ok(-1.0));
        assert!(calc.evaluate("2 &").is_err());
        assert_eq!(calc.evaluate("-1"), Ok(-1.0));
    }

    #[test]
    fn postfix_of_text() {
        let mut calc = Calculator::new();
        let postfix = calc.to_postfix("-(2+3)*4").unwrap();
        assert_eq!(format_postfix(&postfix), "2 3 + ~ 4 *");
    }

    #[test]
    fn detailed_evaluation_returns_postfix_and_value() {
        let mut calc = Calculator::new();
        let mut trace = EvaluationTrace::new(true);
        let (postfix, value) = calc.evaluate_detailed("3 + 4 * 2 / (1 - 5)", &mut trace).unwrap();
        assert_eq!(format_postfix(&postfix), "3 4 2 * 1 5 - / +");
        assert_eq!(value, 1.0);
        assert_eq!(trace.steps.len(), 4);

        let mut trace = EvaluationTrace::new(true);
        assert_eq!(
            calc.evaluate_detailed("5/(3-3)", &mut trace).map(|(_, v)| v),
            Err(CalcError::Eval(EvalError::DivisionByZero))
        );
        assert_eq!(
            calc.evaluate_detailed("2 3", &mut trace).map(|(_, v)| v),
            Err(CalcError::Parse(ParseError::OperatorExpected))
        );
    }

    #[test]
    fn traced_evaluation() {
        let mut calc = Calculator::new();
        let mut trace = EvaluationTrace::new(true);
        assert_eq!(calc.evaluate_traced("2 + 3 * 4", &mut trace), Ok(14.0));
        assert_eq!(trace.steps.len(), 2);
        assert_eq!(trace.steps[0].operation, "3 * 4");
        assert_eq!(trace.steps[1].operation, "2 + 12");
    }
}
