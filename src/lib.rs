//! Equivalence-preserving rewriting of propositional formulas.
//!
//! ```
//! use verum::{Direction, RuleEngine, parse};
//!
//! let engine = RuleEngine::new();
//! let expression = parse("¬(p ∨ q)").unwrap();
//! let rule = engine.find_rule("de-morgan-or").unwrap();
//!
//! let rewritten = engine
//!     .apply_rule(&expression, rule, Direction::LeftToRight, None, None)
//!     .unwrap();
//! assert_eq!(rewritten.to_string(), "¬p ∧ ¬q");
//! ```

pub mod language;
pub mod report;
pub mod rewriting;
pub mod utils;

pub use language::{Expression, OwnedPath, ParseError, Path, parse};
pub use rewriting::{
    Application, CatalogError, Derivation, Direction, Rule, RuleCatalog, RuleCategory,
    RuleEngine, Substitution, TransformationStep, VariableKind,
};
