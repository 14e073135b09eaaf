//! Propositional formulas: the expression tree, its text syntax and its canonical rendering.

pub mod expression;
pub mod operator;
pub mod parsing;
pub mod rendering;

pub use expression::{Expression, OwnedPath, Path};
pub use operator::{BinaryOperator, UnaryOperator};
pub use parsing::{ParseError, parse};
