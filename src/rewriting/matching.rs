//! Pattern matching for expressions.
//!
//! A pattern is an ordinary [`Expression`] whose variables are wildcards. Variables of
//! the subject expression are treated as atoms: the pattern `A ∧ B` matches `p ∧ q`
//! with `A ↦ p` and `B ↦ q`, but the pattern `p` only matches a subject that binds `p`
//! as a wildcard. Matching is purely syntactic, operands are never commuted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::language::expression::{Expression, OwnedPath, Path};

/// Bindings from pattern variable names to the subexpressions they matched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Substitution {
    bindings: BTreeMap<String, Expression>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the expression bound to a pattern variable.
    pub fn at(&self, variable: &str) -> Option<&Expression> {
        self.bindings.get(variable)
    }

    /// Binds a pattern variable, replacing any previous binding.
    pub fn set(&mut self, variable: impl Into<String>, expression: Expression) {
        self.bindings.insert(variable.into(), expression);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expression)> {
        self.bindings
            .iter()
            .map(|(name, expression)| (name.as_str(), expression))
    }

    /// Layers `overrides` on top of `self`; on conflict the binding from `overrides` wins.
    pub fn merged_with(mut self, overrides: &Substitution) -> Self {
        self.bindings.extend(
            overrides
                .bindings
                .iter()
                .map(|(name, expression)| (name.clone(), expression.clone())),
        );
        self
    }
}

impl FromIterator<(String, Expression)> for Substitution {
    fn from_iter<T: IntoIterator<Item = (String, Expression)>>(iter: T) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

/// A successful match of a pattern at a position of an expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    pub substitution: Substitution,
    pub position: OwnedPath,
}

/// Tries to match `pattern` against the whole of `expression`.
///
/// A variable occurring several times in the pattern must match structurally equal
/// subexpressions each time.
pub fn unify(expression: &Expression, pattern: &Expression) -> Option<Substitution> {
    unify_with(expression, pattern, Substitution::default())
}

fn unify_with(
    expression: &Expression,
    pattern: &Expression,
    mut substitution: Substitution,
) -> Option<Substitution> {
    match (pattern, expression) {
        (Expression::Variable(name), _) => {
            match substitution.at(name).map(|bound| bound == expression) {
                Some(true) => Some(substitution),
                Some(false) => None,
                None => {
                    substitution.set(name.clone(), expression.clone());
                    Some(substitution)
                }
            }
        }
        (Expression::Constant(expected), Expression::Constant(actual)) => {
            (expected == actual).then_some(substitution)
        }
        (
            Expression::Unary {
                operator: pattern_operator,
                operand: pattern_operand,
            },
            Expression::Unary { operator, operand },
        ) if pattern_operator == operator => unify_with(operand, pattern_operand, substitution),
        (
            Expression::Binary {
                operator: pattern_operator,
                left: pattern_left,
                right: pattern_right,
            },
            Expression::Binary {
                operator,
                left,
                right,
            },
        ) if pattern_operator == operator => {
            let substitution = unify_with(left, pattern_left, substitution)?;
            unify_with(right, pattern_right, substitution)
        }
        _ => None,
    }
}

/// Instantiates `pattern`, replacing every variable bound in `substitution`.
///
/// Unbound variables and constants are kept as they are.
pub fn instantiate(pattern: &Expression, substitution: &Substitution) -> Expression {
    match pattern {
        Expression::Variable(name) => substitution
            .at(name)
            .cloned()
            .unwrap_or_else(|| pattern.clone()),
        Expression::Constant(_) => pattern.clone(),
        Expression::Unary { operator, operand } => Expression::Unary {
            operator: *operator,
            operand: instantiate(operand, substitution).into(),
        },
        Expression::Binary {
            operator,
            left,
            right,
        } => Expression::Binary {
            operator: *operator,
            left: instantiate(left, substitution).into(),
            right: instantiate(right, substitution).into(),
        },
    }
}

/// Finds every position of `expression` at which `pattern` matches, in pre-order.
///
/// Nested and sibling positions are reported independently of each other.
pub fn find_all_matches(expression: &Expression, pattern: &Expression) -> Vec<Match> {
    expression
        .iter_subexpressions()
        .filter_map(|(position, subexpression)| {
            unify(subexpression, pattern).map(|substitution| Match {
                substitution,
                position,
            })
        })
        .collect()
}

/// Finds the first position, in pre-order, at which `pattern` matches.
pub fn find_first_match(expression: &Expression, pattern: &Expression) -> Option<Match> {
    expression
        .iter_subexpressions()
        .find_map(|(position, subexpression)| {
            unify(subexpression, pattern).map(|substitution| Match {
                substitution,
                position,
            })
        })
}

/// Matches `pattern` exactly at `position`. Fails if the position does not resolve.
pub fn match_at(expression: &Expression, pattern: &Expression, position: Path) -> Option<Match> {
    let subexpression = expression.subexpression(position)?;
    unify(subexpression, pattern).map(|substitution| Match {
        substitution,
        position: position.to_owned_path(),
    })
}
