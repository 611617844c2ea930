pub mod calc_engine;
pub mod stream_mode;

pub use calc_engine::{evaluate, CalcError, Calculator, Operator, Token};
