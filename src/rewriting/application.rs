use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::matching::{Substitution, find_all_matches, instantiate};
use super::rule::{Direction, OrientedRule, Rule};
use crate::language::{Expression, OwnedPath};

/// One concrete way of rewriting an expression: a rule, used in a direction, at a
/// position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub rule: Rule,
    pub direction: Direction,
    pub position: OwnedPath,
    /// The matched subexpression and its replacement, `from → to`
    pub description: String,
    /// The whole expression after the rewrite
    pub full_preview: String,
}

/// Rewrites the subexpression at `position`, already unified into `substitution`.
pub(crate) fn rewrite_at(
    expression: &Expression,
    oriented: &OrientedRule,
    position: &OwnedPath,
    substitution: &Substitution,
) -> Option<Expression> {
    let replacement = instantiate(&oriented.replacement, substitution);
    expression.replace_at(position.as_path(), replacement)
}

/// Enumerates the applications of `rule` in one direction.
pub fn applications_in_direction(
    expression: &Expression,
    rule: &Rule,
    direction: Direction,
) -> Vec<Application> {
    let oriented = match rule.oriented(direction) {
        Ok(oriented) => oriented,
        Err(error) => {
            warn!(rule = %rule.id, %error, "skipping rule with malformed pattern");
            return Vec::new();
        }
    };

    find_all_matches(expression, &oriented.pattern)
        .into_iter()
        .filter_map(|found| {
            let result = rewrite_at(expression, &oriented, &found.position, &found.substitution)?;
            let from = instantiate(&oriented.pattern, &found.substitution);
            let to = instantiate(&oriented.replacement, &found.substitution);

            Some(Application {
                rule: rule.clone(),
                direction,
                position: found.position,
                description: format!("{from} → {to}"),
                full_preview: result.to_text(),
            })
        })
        .collect()
}

/// Enumerates the applications of every rule, left-to-right then right-to-left per rule,
/// dropping repeats of the same rule, direction, position and result.
pub fn enumerate_applications<'r>(
    expression: &Expression,
    rules: impl IntoIterator<Item = &'r Rule>,
) -> Vec<Application> {
    let applications: Vec<_> = rules
        .into_iter()
        .flat_map(|rule| {
            Direction::BOTH
                .into_iter()
                .flat_map(move |direction| applications_in_direction(expression, rule, direction))
        })
        .collect();

    let total = applications.len();
    let unique: Vec<_> = applications
        .into_iter()
        .unique_by(|application| {
            (
                application.rule.id.clone(),
                application.direction,
                application.position.clone(),
                application.full_preview.clone(),
            )
        })
        .collect();

    debug!(
        expression = %expression,
        total,
        unique = unique.len(),
        "enumerated applications"
    );
    unique
}
