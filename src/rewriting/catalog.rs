//! The rule catalog.
//!
//! The built-in catalog is a static table of equivalences. A catalog can also be read
//! from (and written to) a JSON file of the form `{"rules": [...]}`; such catalogs are
//! validated when loaded.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::rule::{Rule, RuleCategory};
use crate::language::ParseError;
use crate::utils::json::{JsonFileError, load_json, save_json};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read rule catalog: {0}")]
    File(#[from] JsonFileError),
    #[error("duplicate rule id `{0}`")]
    DuplicateId(String),
    #[error("rule `{id}` has a malformed pattern: {source}")]
    MalformedPattern {
        id: String,
        #[source]
        source: ParseError,
    },
}

struct RuleRecord {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: RuleCategory,
    left: &'static str,
    right: &'static str,
    variables: &'static [&'static str],
}

impl From<&RuleRecord> for Rule {
    fn from(record: &RuleRecord) -> Self {
        Rule {
            id: record.id.to_string(),
            name: record.name.to_string(),
            description: record.description.to_string(),
            category: record.category,
            left_pattern: record.left.to_string(),
            right_pattern: record.right.to_string(),
            variables: record.variables.iter().map(|v| v.to_string()).collect(),
        }
    }
}

macro_rules! rule_table {
    ($( $id:literal, $name:literal, $description:literal, $category:ident:
        $left:literal <=> $right:literal, [$($var:literal),*]; )*) => {
        &[$(RuleRecord {
            id: $id,
            name: $name,
            description: $description,
            category: RuleCategory::$category,
            left: $left,
            right: $right,
            variables: &[$($var),*],
        }),*]
    };
}

const BUILTIN_RULES: &[RuleRecord] = rule_table! {
    "commutativity-and", "Commutativity of AND", "𝜑 ∧ 𝜓 ≡ 𝜓 ∧ 𝜑", Commutativity:
        "A ∧ B" <=> "B ∧ A", ["A", "B"];
    "commutativity-or", "Commutativity of OR", "𝜑 ∨ 𝜓 ≡ 𝜓 ∨ 𝜑", Commutativity:
        "A ∨ B" <=> "B ∨ A", ["A", "B"];

    "associativity-and", "Associativity of AND", "𝜑 ∧ (𝜓 ∧ 𝜒) ≡ (𝜑 ∧ 𝜓) ∧ 𝜒", Associativity:
        "A ∧ (B ∧ C)" <=> "(A ∧ B) ∧ C", ["A", "B", "C"];
    "associativity-or", "Associativity of OR", "𝜑 ∨ (𝜓 ∨ 𝜒) ≡ (𝜑 ∨ 𝜓) ∨ 𝜒", Associativity:
        "A ∨ (B ∨ C)" <=> "(A ∨ B) ∨ C", ["A", "B", "C"];

    "distributivity-and-over-or", "Distributivity of AND over OR",
        "𝜑 ∧ (𝜓 ∨ 𝜒) ≡ (𝜑 ∧ 𝜓) ∨ (𝜑 ∧ 𝜒)", Distributivity:
        "A ∧ (B ∨ C)" <=> "(A ∧ B) ∨ (A ∧ C)", ["A", "B", "C"];
    "distributivity-or-over-and", "Distributivity of OR over AND",
        "𝜑 ∨ (𝜓 ∧ 𝜒) ≡ (𝜑 ∨ 𝜓) ∧ (𝜑 ∨ 𝜒)", Distributivity:
        "A ∨ (B ∧ C)" <=> "(A ∨ B) ∧ (A ∨ C)", ["A", "B", "C"];
    "distributivity-and-over-or-right", "Distributivity of AND over OR (Right)",
        "(𝜑 ∨ 𝜓) ∧ 𝜒 ≡ (𝜑 ∧ 𝜒) ∨ (𝜓 ∧ 𝜒)", Distributivity:
        "(A ∨ B) ∧ C" <=> "(A ∧ C) ∨ (B ∧ C)", ["A", "B", "C"];
    "distributivity-or-over-and-right", "Distributivity of OR over AND (Right)",
        "(𝜑 ∧ 𝜓) ∨ 𝜒 ≡ (𝜑 ∨ 𝜒) ∧ (𝜓 ∨ 𝜒)", Distributivity:
        "(A ∧ B) ∨ C" <=> "(A ∨ C) ∧ (B ∨ C)", ["A", "B", "C"];
    "factoring-and-over-or", "Factoring AND over OR",
        "(𝜑 ∧ 𝜓) ∨ (𝜑 ∧ 𝜒) ≡ 𝜑 ∧ (𝜓 ∨ 𝜒)", Distributivity:
        "(A ∧ B) ∨ (A ∧ C)" <=> "A ∧ (B ∨ C)", ["A", "B", "C"];
    "factoring-or-over-and", "Factoring OR over AND",
        "(𝜑 ∨ 𝜓) ∧ (𝜑 ∨ 𝜒) ≡ 𝜑 ∨ (𝜓 ∧ 𝜒)", Distributivity:
        "(A ∨ B) ∧ (A ∨ C)" <=> "A ∨ (B ∧ C)", ["A", "B", "C"];

    "de-morgan-and", "De Morgan's Law for AND", "¬(𝜑 ∧ 𝜓) ≡ ¬𝜑 ∨ ¬𝜓", DeMorgan:
        "¬(A ∧ B)" <=> "¬A ∨ ¬B", ["A", "B"];
    "de-morgan-or", "De Morgan's Law for OR", "¬(𝜑 ∨ 𝜓) ≡ ¬𝜑 ∧ ¬𝜓", DeMorgan:
        "¬(A ∨ B)" <=> "¬A ∧ ¬B", ["A", "B"];
    "de-morgan-top", "De Morgan for Top", "¬⊤ ≡ ⊥", DeMorgan:
        "¬true" <=> "false", [];
    "de-morgan-bottom", "De Morgan for Bottom", "¬⊥ ≡ ⊤", DeMorgan:
        "¬false" <=> "true", [];

    "implication-definition", "Implication Definition", "𝜑 → 𝜓 ≡ ¬𝜑 ∨ 𝜓", Definability:
        "A → B" <=> "¬A ∨ B", ["A", "B"];
    "negation-definition", "Negation Definition", "¬𝜑 ≡ 𝜑 → ⊥", Definability:
        "¬A" <=> "A → false", ["A"];

    "contraposition", "Contraposition", "𝜑 → 𝜓 ≡ ¬𝜓 → ¬𝜑", Contraposition:
        "A → B" <=> "¬B → ¬A", ["A", "B"];

    "absorption-and", "Absorption for AND", "𝜑 ∧ (𝜑 ∨ 𝜓) ≡ 𝜑", Absorption:
        "A ∧ (A ∨ B)" <=> "A", ["A", "B"];
    "absorption-or", "Absorption for OR", "𝜑 ∨ (𝜑 ∧ 𝜓) ≡ 𝜑", Absorption:
        "A ∨ (A ∧ B)" <=> "A", ["A", "B"];

    "idempotence-and", "Idempotence of AND", "𝜑 ∧ 𝜑 ≡ 𝜑", Idempotence:
        "A ∧ A" <=> "A", ["A"];
    "idempotence-or", "Idempotence of OR", "𝜑 ∨ 𝜑 ≡ 𝜑", Idempotence:
        "A ∨ A" <=> "A", ["A"];

    "identity-and-top", "Identity for AND with Top", "𝜑 ∧ ⊤ ≡ 𝜑 ≡ ⊤ ∧ 𝜑", Identity:
        "A ∧ true" <=> "A", ["A"];
    "identity-or-bottom", "Identity for OR with Bottom", "𝜑 ∨ ⊥ ≡ 𝜑 ≡ ⊥ ∨ 𝜑", Identity:
        "A ∨ false" <=> "A", ["A"];
    "identity-top-implies", "Top Implies Identity", "⊤ → 𝜑 ≡ 𝜑", Identity:
        "true → A" <=> "A", ["A"];

    "domination-and-bottom", "Domination for AND with Bottom", "𝜑 ∧ ⊥ ≡ ⊥ ≡ ⊥ ∧ 𝜑", Domination:
        "A ∧ false" <=> "false", ["A"];
    "domination-or-top", "Domination for OR with Top", "𝜑 ∨ ⊤ ≡ ⊤ ≡ ⊤ ∨ 𝜑", Domination:
        "A ∨ true" <=> "true", ["A"];
    "domination-implies-top", "Domination for Implies with Top", "𝜑 → ⊤ ≡ ⊤", Domination:
        "A → true" <=> "true", ["A"];
    "domination-bottom-implies", "Domination for Bottom Implies", "⊥ → 𝜑 ≡ ⊤", Domination:
        "false → A" <=> "true", ["A"];

    "complement-or", "Complement for OR", "𝜑 ∨ ¬𝜑 ≡ ⊤", Complement:
        "A ∨ ¬A" <=> "true", ["A"];
    "complement-and", "Complement for AND", "𝜑 ∧ ¬𝜑 ≡ ⊥", Complement:
        "A ∧ ¬A" <=> "false", ["A"];

    "double-negation", "Double Negation", "¬¬𝜑 ≡ 𝜑", DoubleNegation:
        "¬¬A" <=> "A", ["A"];
};

/// An ordered, read-only collection of rules with unique ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
}

impl RuleCatalog {
    /// The built-in propositional equivalences.
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN_RULES.iter().map(Rule::from).collect(),
        }
    }

    /// Builds a catalog, rejecting duplicate ids and patterns that do not parse.
    pub fn new(rules: Vec<Rule>) -> Result<Self, CatalogError> {
        let catalog = Self { rules };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Builds a catalog without checking its rules. Malformed rules are then simply
    /// never applicable.
    pub fn new_unchecked(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(CatalogError::DuplicateId(rule.id.clone()));
            }
            rule.validate().map_err(|source| CatalogError::MalformedPattern {
                id: rule.id.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Loads and validates a catalog from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let catalog: Self = load_json(path.as_ref())?;
        catalog.validate()?;
        debug!(
            path = %path.as_ref().display(),
            rules = catalog.len(),
            "loaded rule catalog"
        );
        Ok(catalog)
    }

    pub fn save_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CatalogError> {
        save_json(self, path)?;
        Ok(())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    pub fn by_category(&self, category: RuleCategory) -> impl Iterator<Item = &Rule> {
        self.rules
            .iter()
            .filter(move |rule| rule.category == category)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'c> IntoIterator for &'c RuleCatalog {
    type Item = &'c Rule;
    type IntoIter = std::slice::Iter<'c, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
