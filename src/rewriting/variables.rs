use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::language::Expression;

fn is_greek_letter(c: char) -> bool {
    ('\u{0391}'..='\u{03A9}').contains(&c) || ('\u{03B1}'..='\u{03C9}').contains(&c)
}

/// Lexical family of a variable name.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    /// Starts with a Greek letter, like `φ` or `ψ1`
    Greek,
    /// A `?` followed by one lowercase letter, like `?x`
    Ascii,
    /// A single uppercase letter, the convention for rule patterns
    Pattern,
}

impl VariableKind {
    /// Classifies a variable name. Names fitting no family yield `None`.
    pub fn classify(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let first = chars.next()?;

        if is_greek_letter(first) {
            return Some(VariableKind::Greek);
        }

        match (first, chars.next(), chars.next()) {
            ('?', Some(letter), None) if letter.is_ascii_lowercase() => Some(VariableKind::Ascii),
            (letter, None, _) if letter.is_ascii_uppercase() => Some(VariableKind::Pattern),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Greek => "greek",
            VariableKind::Ascii => "ascii",
            VariableKind::Pattern => "pattern",
        }
    }
}

impl std::fmt::Display for VariableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified variables of `expression`.
pub fn classified_variables(expression: &Expression) -> BTreeMap<String, VariableKind> {
    expression
        .variables()
        .into_iter()
        .filter_map(|name| VariableKind::classify(name).map(|kind| (name.to_string(), kind)))
        .collect()
}

/// Variables of `replacement` that do not occur in `pattern`.
///
/// These are left unbound by matching `pattern` and have to be instantiated by the
/// caller, otherwise they end up verbatim in the rewritten expression.
pub fn new_variables(
    pattern: &Expression,
    replacement: &Expression,
) -> BTreeMap<String, VariableKind> {
    let bound = pattern.variables();
    classified_variables(replacement)
        .into_iter()
        .filter(|(name, _)| !bound.contains(name.as_str()))
        .collect()
}
