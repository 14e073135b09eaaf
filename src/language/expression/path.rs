use std::num::ParseIntError;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::Expression;

/// Owned position of a subexpression: child indices from the root. Negations have the
/// single child `0`, binary connectives have `0` (left) and `1` (right).
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnedPath(Vec<usize>);

impl OwnedPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn as_path(&self) -> Path<'_> {
        Path(&self.0)
    }

    /// Returns the child path of this path
    pub fn child(&self) -> Path<'_> {
        self.as_path().child()
    }

    /// Returns the first element on the path, or `None` if the path is empty
    pub fn head(&self) -> Option<usize> {
        self.0.first().copied()
    }

    /// Adds a new position at the end of the path
    pub fn push(&mut self, location: usize) {
        self.0.push(location)
    }

    /// Returns a new path one level deeper
    pub fn with(&self, location: usize) -> Self {
        let mut path = self.clone();
        path.push(location);
        path
    }
}

impl From<Vec<usize>> for OwnedPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl std::fmt::Display for OwnedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.iter().join(","))
    }
}

/// Accepts `1,0`, `[1,0]` and `[]`/empty for the root.
impl FromStr for OwnedPath {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s
            .strip_prefix('[')
            .and_then(|inner| inner.strip_suffix(']'))
            .unwrap_or(s);

        if s.trim().is_empty() {
            return Ok(Self::root());
        }

        s.split(',')
            .map(|index| index.trim().parse())
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// Path to a subexpression in an expression
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Path<'p>(&'p [usize]);

impl<'p> Path<'p> {
    pub fn new(indices: &'p [usize]) -> Self {
        Path(indices)
    }

    /// Returns the child path of this path
    pub fn child(&self) -> Self {
        Path(&self.0[1.min(self.0.len())..])
    }

    /// Returns the first element on the path, or `None` if the path is empty
    pub fn head(&self) -> Option<usize> {
        self.0.first().copied()
    }

    pub fn to_owned_path(&self) -> OwnedPath {
        OwnedPath(self.0.to_vec())
    }
}

impl<'p> From<&'p OwnedPath> for Path<'p> {
    fn from(path: &'p OwnedPath) -> Self {
        path.as_path()
    }
}

/// Pre-order walk over every subexpression, yielding each node with its path.
///
/// Order is root first, then the operand of a negation, or the whole left subtree
/// followed by the right subtree.
#[derive(Clone, Debug)]
pub struct SubexpressionIterator<'e> {
    pending: Vec<(OwnedPath, &'e Expression)>,
}

impl<'e> SubexpressionIterator<'e> {
    pub fn new(expression: &'e Expression) -> Self {
        Self {
            pending: vec![(OwnedPath::root(), expression)],
        }
    }
}

impl<'e> Iterator for SubexpressionIterator<'e> {
    type Item = (OwnedPath, &'e Expression);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, expression) = self.pending.pop()?;

        let children = expression.children();
        for (index, child) in children.into_iter().enumerate().rev() {
            self.pending.push((path.with(index), child));
        }

        Some((path, expression))
    }
}
