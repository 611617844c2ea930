use super::error::EvalError;
use super::token::{Operator, Token};

pub struct Step {
    pub operation: String,
    pub result: f64,
}

/// Step-by-step record of an evaluation, filled only in detailed mode.
pub struct EvaluationTrace {
    pub steps: Vec<Step>,
    pub detailed_mode: bool,
}

impl EvaluationTrace {
    pub fn new(detailed_mode: bool) -> Self {
        EvaluationTrace {
            steps: Vec::new(),
            detailed_mode,
        }
    }

    pub fn add_step(&mut self, operation: String, result: f64) {
        if self.detailed_mode {
            self.steps.push(Step { operation, result });
        }
    }
}

pub fn evaluate(postfix: &[Token]) -> Result<f64, EvalError> {
    evaluate_traced(postfix, &mut EvaluationTrace::new(false))
}

pub fn evaluate_traced(postfix: &[Token], trace: &mut EvaluationTrace) -> Result<f64, EvalError> {
    let mut values: Vec<f64> = Vec::with_capacity(postfix.len());

    for token in postfix {
        match token {
            Token::Number { value, .. } => values.push(*value),
            Token::Op(op) => {
                let result = apply(*op, &mut values, trace)?;
                values.push(result);
            }
            other => return Err(EvalError::UnexpectedToken(other.to_string())),
        }
    }

    match values.as_slice() {
        [result] => Ok(*result),
        rest => Err(EvalError::Malformed {
            remaining: rest.len(),
        }),
    }
}

fn apply(op: Operator, values: &mut Vec<f64>, trace: &mut EvaluationTrace) -> Result<f64, EvalError> {
    let (operation, result) = match op {
        Operator::Neg => {
            let [x] = pop_operands(op, values)?;
            (format!("-({})", x), -x)
        }
        Operator::Add => {
            let [left, right] = pop_operands(op, values)?;
            (format!("{} + {}", left, right), left + right)
        }
        Operator::Sub => {
            let [left, right] = pop_operands(op, values)?;
            (format!("{} - {}", left, right), left - right)
        }
        Operator::Mul => {
            let [left, right] = pop_operands(op, values)?;
            (format!("{} * {}", left, right), left * right)
        }
        Operator::Div => {
            let [left, right] = pop_operands(op, values)?;
            if right == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            (format!("{} / {}", left, right), left / right)
        }
    };
    trace.add_step(operation, result);
    Ok(result)
}

/// Takes the top `N` values off the stack, deepest first.
fn pop_operands<const N: usize>(op: Operator, values: &mut Vec<f64>) -> Result<[f64; N], EvalError> {
    let found = values.len();
    let Some(split) = found.checked_sub(N) else {
        return Err(EvalError::InsufficientOperands {
            op,
            needed: op.arity(),
            found,
        });
    };

    let mut operands = [0.0; N];
    operands.copy_from_slice(&values[split..]);
    values.truncate(split);
    Ok(operands)
}
