//! Logical connectives.
//!
//! Operators always carry their Unicode spelling; the ASCII spellings accepted by the
//! parser (`!`, `/\`, `\/`, `->`) are normalized away when the tree is built.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum UnaryOperator {
    #[serde(rename = "¬")]
    Not,
}

#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum BinaryOperator {
    #[serde(rename = "∧")]
    And,
    #[serde(rename = "∨")]
    Or,
    #[serde(rename = "→")]
    Implies,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Not => "¬",
        }
    }
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::And => "∧",
            BinaryOperator::Or => "∨",
            BinaryOperator::Implies => "→",
        }
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
