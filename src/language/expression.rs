//! Propositional expression trees.
//!
//! An [`Expression`] is immutable. Children sit behind [`Arc`], so rewriting a subtree
//! rebuilds only the spine from the root down to the rewritten node and shares every
//! untouched sibling with the original tree.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::operator::{BinaryOperator, UnaryOperator};

pub mod path;

pub use path::{OwnedPath, Path, SubexpressionIterator};

#[derive(Clone, Hash, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Expression {
    /// A propositional variable such as `p`, `abc`, `φ` or `?a`. Inside rule patterns,
    /// variables act as wildcards.
    Variable(String),
    /// `true` (⊤) or `false` (⊥)
    Constant(bool),
    Unary {
        operator: UnaryOperator,
        operand: Arc<Expression>,
    },
    Binary {
        operator: BinaryOperator,
        left: Arc<Expression>,
        right: Arc<Expression>,
    },
}

impl Expression {
    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    pub fn constant(value: bool) -> Self {
        Expression::Constant(value)
    }

    pub fn not(operand: Expression) -> Self {
        Expression::Unary {
            operator: UnaryOperator::Not,
            operand: Arc::new(operand),
        }
    }

    pub fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            operator,
            left: Arc::new(left),
            right: Arc::new(right),
        }
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Self::binary(BinaryOperator::And, left, right)
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Self::binary(BinaryOperator::Or, left, right)
    }

    pub fn implies(left: Expression, right: Expression) -> Self {
        Self::binary(BinaryOperator::Implies, left, right)
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Expression::Binary { .. })
    }

    /// Direct children in positional order: the operand of a negation, or left then right.
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::Variable(_) | Expression::Constant(_) => Vec::new(),
            Expression::Unary { operand, .. } => vec![operand.as_ref()],
            Expression::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
        }
    }

    /// Returns the subexpression at `path`, or `None` if the path leaves the tree.
    pub fn subexpression(&self, path: Path) -> Option<&Expression> {
        if let Some(head) = path.head() {
            self.children().get(head).copied()?.subexpression(path.child())
        } else {
            Some(self)
        }
    }

    /// Returns a copy of `self` in which the node at `path` is replaced by `replacement`.
    ///
    /// Only the nodes along `path` are rebuilt. Returns `None` if `path` does not resolve.
    pub fn replace_at(&self, path: Path, replacement: Expression) -> Option<Expression> {
        let Some(head) = path.head() else {
            return Some(replacement);
        };

        match (self, head) {
            (Expression::Unary { operator, operand }, 0) => Some(Expression::Unary {
                operator: *operator,
                operand: Arc::new(operand.replace_at(path.child(), replacement)?),
            }),
            (
                Expression::Binary {
                    operator,
                    left,
                    right,
                },
                0,
            ) => Some(Expression::Binary {
                operator: *operator,
                left: Arc::new(left.replace_at(path.child(), replacement)?),
                right: Arc::clone(right),
            }),
            (
                Expression::Binary {
                    operator,
                    left,
                    right,
                },
                1,
            ) => Some(Expression::Binary {
                operator: *operator,
                left: Arc::clone(left),
                right: Arc::new(right.replace_at(path.child(), replacement)?),
            }),
            _ => None,
        }
    }

    /// Pre-order iteration over `(path, subexpression)` pairs, root first.
    pub fn iter_subexpressions(&self) -> SubexpressionIterator<'_> {
        SubexpressionIterator::new(self)
    }

    /// Names of all variables occurring in the tree.
    pub fn variables(&self) -> BTreeSet<&str> {
        self.iter_subexpressions()
            .filter_map(|(_, subexpression)| match subexpression {
                Expression::Variable(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{Expression, Path};

    fn sample() -> Expression {
        // a ∧ (b ∨ ¬a)
        Expression::and(
            Expression::variable("a"),
            Expression::or(
                Expression::variable("b"),
                Expression::not(Expression::variable("a")),
            ),
        )
    }

    #[test]
    fn subexpression_lookup() {
        let expr = sample();

        assert_eq!(expr.subexpression(Path::new(&[])), Some(&expr));
        assert_eq!(
            expr.subexpression(Path::new(&[1, 1, 0])),
            Some(&Expression::variable("a"))
        );
        assert_eq!(
            expr.subexpression(Path::new(&[1, 0])),
            Some(&Expression::variable("b"))
        );
    }

    #[test]
    fn subexpression_out_of_tree() {
        let expr = sample();

        assert!(expr.subexpression(Path::new(&[0, 0])).is_none());
        assert!(expr.subexpression(Path::new(&[2])).is_none());
        assert!(expr.subexpression(Path::new(&[1, 1, 1])).is_none());
    }

    #[test]
    fn structural_equality() {
        assert_eq!(sample(), sample());
        assert_ne!(Expression::variable("true"), Expression::constant(true));
        assert_ne!(
            Expression::and(Expression::variable("a"), Expression::variable("b")),
            Expression::or(Expression::variable("a"), Expression::variable("b"))
        );
    }

    #[test]
    fn replace_shares_untouched_siblings() {
        let expr = sample();
        let replaced = expr
            .replace_at(Path::new(&[1, 0]), Expression::constant(false))
            .unwrap();

        let Expression::Binary { left: old_left, .. } = &expr else {
            panic!("Expected binary root")
        };
        let Expression::Binary { left: new_left, right, .. } = &replaced else {
            panic!("Expected binary root")
        };
        assert!(Arc::ptr_eq(old_left, new_left));
        assert_eq!(
            right.as_ref(),
            &Expression::or(
                Expression::constant(false),
                Expression::not(Expression::variable("a"))
            )
        );

        // The original is left untouched
        assert_eq!(expr, sample());
    }

    #[test]
    fn replace_root() {
        let replaced = sample()
            .replace_at(Path::new(&[]), Expression::variable("z"))
            .unwrap();
        assert_eq!(replaced, Expression::variable("z"));
    }

    #[test]
    fn replace_unresolved_path() {
        assert!(
            sample()
                .replace_at(Path::new(&[0, 1]), Expression::variable("z"))
                .is_none()
        );
        assert!(
            Expression::not(Expression::variable("a"))
                .replace_at(Path::new(&[1]), Expression::variable("z"))
                .is_none()
        );
    }

    #[test]
    fn variables() {
        let expr = sample();
        assert_eq!(expr.variables().into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn serialization() {
        let expr = sample();
        let serialized = serde_json::to_string(&expr).unwrap();
        let deserialized: Expression = serde_json::from_str(&serialized).unwrap();
        assert_eq!(expr, deserialized);
    }
}
