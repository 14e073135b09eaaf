//! Canonical text form of expressions.
//!
//! Every binary child is parenthesized regardless of precedence, and a negated binary
//! expression is parenthesized. Leaves and negations are never wrapped. The output is
//! therefore unambiguous, always parses back to the same tree, and can be compared as
//! a string.

use std::fmt::{self, Display, Formatter};

use super::expression::Expression;

impl Expression {
    /// Canonical rendering, identical to the [`Display`] output.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    fn fmt_operand(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_binary() {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Variable(name) => f.write_str(name),
            Expression::Constant(true) => f.write_str("⊤"),
            Expression::Constant(false) => f.write_str("⊥"),
            Expression::Unary { operator, operand } => {
                write!(f, "{operator}")?;
                operand.fmt_operand(f)
            }
            Expression::Binary {
                operator,
                left,
                right,
            } => {
                left.fmt_operand(f)?;
                write!(f, " {operator} ")?;
                right.fmt_operand(f)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::language::expression::Expression;
    use crate::language::parsing::parse;

    fn test_display(input: &str, expected: &str) {
        let expr = parse(input).unwrap();
        assert_eq!(expr.to_text(), expected);
    }

    #[test]
    fn leaves() {
        test_display("a", "a");
        test_display("true", "⊤");
        test_display("false", "⊥");
        test_display("?b", "?b");
    }

    #[test]
    fn negation() {
        test_display("¬a", "¬a");
        test_display("!!a", "¬¬a");
        test_display("¬(a ∧ b)", "¬(a ∧ b)");
        test_display("¬a ∧ b", "¬a ∧ b");
        test_display("a ∧ ¬b", "a ∧ ¬b");
        test_display("¬¬(a ∧ (b ∨ ¬a))", "¬¬(a ∧ (b ∨ ¬a))");
        test_display("¬¬a ∧ (b ∨ ¬a)", "¬¬a ∧ (b ∨ ¬a)");
    }

    #[test]
    fn binary_children_always_parenthesized() {
        test_display("a ∧ b ∨ c", "(a ∧ b) ∨ c");
        test_display("a ∨ b ∧ c", "a ∨ (b ∧ c)");
        test_display("a ∧ b → c", "(a ∧ b) → c");
        test_display("a → b ∧ c", "a → (b ∧ c)");
        test_display("a ∧ b ∧ c", "(a ∧ b) ∧ c");
        test_display("a /\\ (b \\/ !a)", "a ∧ (b ∨ ¬a)");
    }

    #[test]
    fn constants_render_as_glyphs() {
        test_display("(a ∧ b) ∨ false", "(a ∧ b) ∨ ⊥");
        test_display("true -> ⊥", "⊤ → ⊥");
    }

    fn arb_expression() -> impl Strategy<Value = Expression> {
        let leaf = prop_oneof![
            prop::sample::select(vec!["a", "b", "abc", "φ", "?x", "A"])
                .prop_map(Expression::variable),
            any::<bool>().prop_map(Expression::constant),
        ];

        leaf.prop_recursive(6, 48, 2, |inner| {
            prop_oneof![
                inner.clone().prop_map(Expression::not),
                (inner.clone(), inner.clone()).prop_map(|(l, r)| Expression::and(l, r)),
                (inner.clone(), inner.clone()).prop_map(|(l, r)| Expression::or(l, r)),
                (inner.clone(), inner).prop_map(|(l, r)| Expression::implies(l, r)),
            ]
        })
    }

    proptest! {
        #[test]
        fn rendering_round_trips(expr in arb_expression()) {
            let text = expr.to_text();
            prop_assert_eq!(parse(&text).unwrap(), expr);
        }

        #[test]
        fn rendering_is_stable(expr in arb_expression()) {
            let once = expr.to_text();
            let twice = parse(&once).unwrap().to_text();
            prop_assert_eq!(once, twice);
        }
    }
}
