use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    /// Unary minus. Never produced for a `-` that follows a number or `)`.
    Neg,
}

impl Operator {
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div => 2,
            Operator::Neg => 3,
        }
    }

    pub fn is_right_associative(self) -> bool {
        self == Operator::Neg
    }

    pub fn arity(self) -> usize {
        match self {
            Operator::Neg => 1,
            _ => 2,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Neg => '~',
        }
    }

    /// Maps a binary operator character. `-` always maps to `Sub` here,
    /// the tokenizer decides when it is a `Neg` instead.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A finite literal. `literal` is the source text it was read from.
    Number { value: f64, literal: String },
    Op(Operator),
    LParen,
    RParen,
    End,
}

impl Token {
    /// True when a `-` following this token starts an operand rather than
    /// subtracting from one.
    pub fn admits_unary_minus(&self) -> bool {
        matches!(self, Token::End | Token::Op(_) | Token::LParen)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number { literal, .. } => write!(f, "{}", literal),
            Token::Op(op) => write!(f, "{}", op),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::End => write!(f, "<end>"),
        }
    }
}

pub fn format_postfix(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
