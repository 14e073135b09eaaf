//! A record of successive rewrites.
//!
//! The engine only ever produces the next expression. Keeping track of how an
//! expression was reached is the business of this module's [`Derivation`], which callers
//! own and extend.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::rule::{Direction, Rule};
use crate::language::{Expression, OwnedPath};

/// One rewrite `from ≡ to`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformationStep {
    pub from: Expression,
    pub to: Expression,
    pub rule: Rule,
    pub direction: Direction,
    pub position: OwnedPath,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
}

impl TransformationStep {
    pub fn new(
        from: Expression,
        to: Expression,
        rule: Rule,
        direction: Direction,
        position: OwnedPath,
    ) -> Self {
        Self {
            from,
            to,
            rule,
            direction,
            position,
            timestamp: now_millis(),
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("step starts from `{found}` but the derivation is at `{expected}`")]
pub struct DisconnectedStep {
    pub expected: String,
    pub found: String,
}

/// A chain of equivalent expressions, each step starting where the previous one ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivation {
    start: Expression,
    steps: Vec<TransformationStep>,
}

impl Derivation {
    pub fn new(start: Expression) -> Self {
        Self {
            start,
            steps: Vec::new(),
        }
    }

    pub fn start(&self) -> &Expression {
        &self.start
    }

    /// The most recently derived expression.
    pub fn current(&self) -> &Expression {
        self.steps.last().map_or(&self.start, |step| &step.to)
    }

    pub fn steps(&self) -> &[TransformationStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn push(&mut self, step: TransformationStep) -> Result<(), DisconnectedStep> {
        if &step.from != self.current() {
            return Err(DisconnectedStep {
                expected: self.current().to_text(),
                found: step.from.to_text(),
            });
        }
        self.steps.push(step);
        Ok(())
    }

    /// Records a rewrite of the current expression into `to`.
    pub fn record(
        &mut self,
        to: Expression,
        rule: Rule,
        direction: Direction,
        position: OwnedPath,
    ) {
        let from = self.current().clone();
        self.steps.push(TransformationStep::new(from, to, rule, direction, position));
    }

    /// Drops the latest step, returning it.
    pub fn undo(&mut self) -> Option<TransformationStep> {
        self.steps.pop()
    }
}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}", self.start)?;
        for step in &self.steps {
            write!(
                f,
                "\n≡ {}    [{}, {} at {}]",
                step.to, step.rule.id, step.direction, step.position
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Derivation, TransformationStep};
    use crate::language::{Expression, OwnedPath, parse};
    use crate::rewriting::catalog::RuleCatalog;
    use crate::rewriting::rule::{Direction, Rule};

    fn p(s: &str) -> Expression {
        parse(s).unwrap()
    }

    fn rule(id: &str) -> Rule {
        RuleCatalog::builtin().get(id).unwrap().clone()
    }

    #[test]
    fn recording_steps() {
        let mut derivation = Derivation::new(p("¬¬(a ∧ b)"));
        assert!(derivation.is_empty());
        assert_eq!(derivation.current(), &p("¬¬(a ∧ b)"));

        derivation.record(
            p("a ∧ b"),
            rule("double-negation"),
            Direction::LeftToRight,
            OwnedPath::root(),
        );
        derivation.record(
            p("b ∧ a"),
            rule("commutativity-and"),
            Direction::LeftToRight,
            OwnedPath::root(),
        );

        assert_eq!(derivation.len(), 2);
        assert_eq!(derivation.current(), &p("b ∧ a"));
        assert_eq!(derivation.steps()[1].from, p("a ∧ b"));
        assert_eq!(derivation.start(), &p("¬¬(a ∧ b)"));
        assert!(derivation.steps()[0].timestamp > 0);

        let undone = derivation.undo().unwrap();
        assert_eq!(undone.rule.id, "commutativity-and");
        assert_eq!(derivation.current(), &p("a ∧ b"));
    }

    #[test]
    fn disconnected_steps_are_rejected() {
        let mut derivation = Derivation::new(p("a"));
        let step = TransformationStep::new(
            p("b"),
            p("¬¬b"),
            rule("double-negation"),
            Direction::RightToLeft,
            OwnedPath::root(),
        );

        let error = derivation.push(step).unwrap_err();
        assert_eq!(error.expected, "a");
        assert_eq!(error.found, "b");
        assert!(derivation.is_empty());
    }

    #[test]
    fn display() {
        let mut derivation = Derivation::new(p("a ∨ ⊥"));
        derivation.record(
            p("a"),
            rule("identity-or-bottom"),
            Direction::LeftToRight,
            OwnedPath::root(),
        );

        assert_eq!(
            derivation.to_string(),
            "  a ∨ ⊥\n≡ a    [identity-or-bottom, left-to-right at []]"
        );
    }
}
