//! The rule engine: a catalog of equivalences together with the operations that
//! enumerate and perform rewrites with it.

use std::collections::BTreeMap;
use std::path::Path as FsPath;

use tracing::{debug, warn};

use crate::language::{Expression, ParseError, Path, parse};
use crate::rewriting::application::{Application, enumerate_applications, rewrite_at};
use crate::rewriting::catalog::{CatalogError, RuleCatalog};
use crate::rewriting::matching::{
    Match, Substitution, find_all_matches, find_first_match, match_at,
};
use crate::rewriting::rule::{Direction, Rule};
use crate::rewriting::variables::{VariableKind, new_variables};

/// Rewrites propositional expressions with a fixed catalog of rules.
///
/// The catalog is read-only once the engine is built; every operation is a pure
/// function of its arguments.
#[derive(Clone, Debug, Default)]
pub struct RuleEngine {
    catalog: RuleCatalog,
}

impl RuleEngine {
    /// An engine over the built-in catalog.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: RuleCatalog) -> Self {
        Self { catalog }
    }

    /// An engine over a validated set of rules.
    pub fn with_rules(rules: Vec<Rule>) -> Result<Self, CatalogError> {
        RuleCatalog::new(rules).map(Self::with_catalog)
    }

    /// Loads the catalog from a JSON file of the form `{"rules": [...]}`.
    pub fn from_json_file<P: AsRef<FsPath>>(path: P) -> Result<Self, CatalogError> {
        RuleCatalog::from_json_file(path).map(Self::with_catalog)
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn parse(&self, text: &str) -> Result<Expression, ParseError> {
        parse(text)
    }

    pub fn to_text(&self, expression: &Expression) -> String {
        expression.to_text()
    }

    /// A copy of every rule, in catalog order.
    pub fn rules(&self) -> Vec<Rule> {
        self.catalog.rules().to_vec()
    }

    pub fn find_rule(&self, id: &str) -> Option<&Rule> {
        self.catalog.get(id)
    }

    /// Rules that match somewhere in `expression`, in either direction.
    pub fn applicable_rules(&self, expression: &Expression) -> Vec<Rule> {
        self.catalog
            .iter()
            .filter(|rule| {
                Direction::BOTH
                    .into_iter()
                    .any(|direction| match rule.oriented(direction) {
                        Ok(oriented) => find_first_match(expression, &oriented.pattern).is_some(),
                        Err(error) => {
                            warn!(rule = %rule.id, %error, "skipping rule with malformed pattern");
                            false
                        }
                    })
            })
            .cloned()
            .collect()
    }

    /// Every distinct way of rewriting `expression` with one rule of the catalog.
    pub fn all_possible_applications(&self, expression: &Expression) -> Vec<Application> {
        enumerate_applications(expression, &self.catalog)
    }

    /// Rewrites `expression` with `rule`.
    ///
    /// With a `position` the rule must match exactly there; without one, the first
    /// match in pre-order is rewritten. `instantiations` bind replacement variables
    /// that matching leaves unbound, and take precedence over bindings from matching.
    ///
    /// Returns `None` if the rule does not match, the position does not exist, or the
    /// rule's patterns do not parse.
    pub fn apply_rule(
        &self,
        expression: &Expression,
        rule: &Rule,
        direction: Direction,
        position: Option<Path>,
        instantiations: Option<&Substitution>,
    ) -> Option<Expression> {
        let oriented = match rule.oriented(direction) {
            Ok(oriented) => oriented,
            Err(error) => {
                warn!(rule = %rule.id, %error, "cannot apply rule with malformed pattern");
                return None;
            }
        };

        let found = match position {
            Some(position) => match_at(expression, &oriented.pattern, position),
            None => find_first_match(expression, &oriented.pattern),
        };
        let Some(Match {
            substitution,
            position,
        }) = found
        else {
            debug!(rule = %rule.id, %direction, expression = %expression, "rule does not match");
            return None;
        };

        let substitution = match instantiations {
            Some(instantiations) => substitution.merged_with(instantiations),
            None => substitution,
        };
        let result = rewrite_at(expression, &oriented, &position, &substitution)?;

        debug!(
            rule = %rule.id,
            %direction,
            %position,
            from = %expression,
            to = %result,
            "applied rule"
        );
        Some(result)
    }

    /// Performs an application produced by [`RuleEngine::all_possible_applications`].
    pub fn apply_application(
        &self,
        expression: &Expression,
        application: &Application,
        instantiations: Option<&Substitution>,
    ) -> Option<Expression> {
        self.apply_rule(
            expression,
            &application.rule,
            application.direction,
            Some(application.position.as_path()),
            instantiations,
        )
    }

    /// Variables that rewriting with `rule` in `direction` introduces, i.e. those of
    /// the replacement that do not occur in the pattern. Empty for a malformed rule.
    pub fn detect_new_variables(
        &self,
        rule: &Rule,
        direction: Direction,
    ) -> BTreeMap<String, VariableKind> {
        match rule.oriented(direction) {
            Ok(oriented) => new_variables(&oriented.pattern, &oriented.replacement),
            Err(error) => {
                warn!(rule = %rule.id, %error, "rule with malformed pattern introduces nothing");
                BTreeMap::new()
            }
        }
    }

    /// Every position of `expression` at which `rule` matches in `direction`.
    pub fn matches(
        &self,
        expression: &Expression,
        rule: &Rule,
        direction: Direction,
    ) -> Vec<Match> {
        match rule.oriented(direction) {
            Ok(oriented) => find_all_matches(expression, &oriented.pattern),
            Err(error) => {
                warn!(rule = %rule.id, %error, "cannot match rule with malformed pattern");
                Vec::new()
            }
        }
    }
}
