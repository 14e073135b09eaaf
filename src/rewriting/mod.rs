//! Equivalence rewriting of propositional expressions.
//!
//! Rules are equivalences between two patterns and can be used in either direction.
//! [`system::RuleEngine`] ties the pieces together.

pub mod application;
pub mod catalog;
pub mod derivation;
pub mod matching;
pub mod rule;
pub mod system;
pub mod variables;

pub use application::Application;
pub use catalog::{CatalogError, RuleCatalog};
pub use derivation::{Derivation, TransformationStep};
pub use matching::{Match, Substitution};
pub use rule::{Direction, Rule, RuleCategory};
pub use system::RuleEngine;
pub use variables::VariableKind;
