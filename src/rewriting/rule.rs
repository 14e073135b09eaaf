use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::language::{Expression, ParseError, parse};

/// Family a rule belongs to.
#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleCategory {
    Commutativity,
    Associativity,
    Distributivity,
    Idempotence,
    Identity,
    Complement,
    DeMorgan,
    Implication,
    Absorption,
    Domination,
    Definability,
    Contraposition,
    DoubleNegation,
}

impl RuleCategory {
    pub const ALL: [RuleCategory; 13] = [
        RuleCategory::Commutativity,
        RuleCategory::Associativity,
        RuleCategory::Distributivity,
        RuleCategory::Idempotence,
        RuleCategory::Identity,
        RuleCategory::Complement,
        RuleCategory::DeMorgan,
        RuleCategory::Implication,
        RuleCategory::Absorption,
        RuleCategory::Domination,
        RuleCategory::Definability,
        RuleCategory::Contraposition,
        RuleCategory::DoubleNegation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleCategory::Commutativity => "commutativity",
            RuleCategory::Associativity => "associativity",
            RuleCategory::Distributivity => "distributivity",
            RuleCategory::Idempotence => "idempotence",
            RuleCategory::Identity => "identity",
            RuleCategory::Complement => "complement",
            RuleCategory::DeMorgan => "deMorgan",
            RuleCategory::Implication => "implication",
            RuleCategory::Absorption => "absorption",
            RuleCategory::Domination => "domination",
            RuleCategory::Definability => "definability",
            RuleCategory::Contraposition => "contraposition",
            RuleCategory::DoubleNegation => "doubleNegation",
        }
    }
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown rule category `{s}`"))
    }
}

/// Which side of a rule is matched and which side replaces it.
#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "left-to-right")]
    LeftToRight,
    #[serde(rename = "right-to-left")]
    RightToLeft,
}

impl Direction {
    pub const BOTH: [Direction; 2] = [Direction::LeftToRight, Direction::RightToLeft];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::LeftToRight => "left-to-right",
            Direction::RightToLeft => "right-to-left",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named equivalence `left_pattern ≡ right_pattern`, usable in either direction.
///
/// Patterns are stored as text and parsed when the rule is used. Their variables,
/// conventionally single capital letters, match arbitrary subexpressions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: RuleCategory,
    pub left_pattern: String,
    pub right_pattern: String,
    pub variables: Vec<String>,
}

/// The two parsed sides of a rule, oriented by a [`Direction`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrientedRule {
    /// Side that is searched for in the subject expression
    pub pattern: Expression,
    /// Side that is instantiated and spliced in
    pub replacement: Expression,
}

impl Rule {
    /// Parses both sides, `pattern` being the side matched when rewriting in `direction`.
    pub fn oriented(&self, direction: Direction) -> Result<OrientedRule, ParseError> {
        let left = parse(&self.left_pattern)?;
        let right = parse(&self.right_pattern)?;

        Ok(match direction {
            Direction::LeftToRight => OrientedRule {
                pattern: left,
                replacement: right,
            },
            Direction::RightToLeft => OrientedRule {
                pattern: right,
                replacement: left,
            },
        })
    }

    /// Checks that both patterns parse.
    pub fn validate(&self) -> Result<(), ParseError> {
        self.oriented(Direction::LeftToRight).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, Rule, RuleCategory};
    use crate::language::parse;

    fn absorption() -> Rule {
        Rule {
            id: "absorption-and".to_string(),
            name: "Absorption for AND".to_string(),
            description: "𝜑 ∧ (𝜑 ∨ 𝜓) ≡ 𝜑".to_string(),
            category: RuleCategory::Absorption,
            left_pattern: "A ∧ (A ∨ B)".to_string(),
            right_pattern: "A".to_string(),
            variables: vec!["A".to_string(), "B".to_string()],
        }
    }

    #[test]
    fn orientation() {
        let rule = absorption();

        let forward = rule.oriented(Direction::LeftToRight).unwrap();
        assert_eq!(forward.pattern, parse("A ∧ (A ∨ B)").unwrap());
        assert_eq!(forward.replacement, parse("A").unwrap());

        let backward = rule.oriented(Direction::RightToLeft).unwrap();
        assert_eq!(backward.pattern, forward.replacement);
        assert_eq!(backward.replacement, forward.pattern);
    }

    #[test]
    fn malformed_patterns() {
        let mut rule = absorption();
        rule.right_pattern = "A ∧".to_string();

        assert!(rule.validate().is_err());
        assert!(rule.oriented(Direction::LeftToRight).is_err());
        assert!(rule.oriented(Direction::RightToLeft).is_err());
    }

    #[test]
    fn direction_helpers() {
        assert_eq!(Direction::default(), Direction::LeftToRight);
        assert_eq!(Direction::RightToLeft.to_string(), "right-to-left");
        assert_eq!(
            serde_json::to_string(&Direction::RightToLeft).unwrap(),
            "\"right-to-left\""
        );
    }

    #[test]
    fn category_names() {
        assert_eq!("deMorgan".parse::<RuleCategory>().unwrap(), RuleCategory::DeMorgan);
        assert_eq!("DOUBLENEGATION".parse::<RuleCategory>().unwrap(), RuleCategory::DoubleNegation);
        assert!("associative".parse::<RuleCategory>().is_err());
        assert_eq!(
            serde_json::to_string(&RuleCategory::DoubleNegation).unwrap(),
            "\"doubleNegation\""
        );
    }

    #[test]
    fn test_rule_serialization() {
        let rule = absorption();
        let serialized = serde_json::to_string(&rule).unwrap();
        assert!(serialized.contains("\"leftPattern\":\"A ∧ (A ∨ B)\""));

        let deserialized: Rule = serde_json::from_str(&serialized).unwrap();
        assert_eq!(rule, deserialized);
    }
}
