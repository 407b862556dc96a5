// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Core traits and types for CST nodes.
//!
//! # Node Identity
//!
//! [`NodeId`] provides stable identity for CST nodes. The parser assigns ids
//! sequentially as it builds nodes, so the same source always produces the same
//! ids. Rules that introduce a new construct mint a fresh id from the same
//! [`NodeIdGenerator`] sequence; rules that edit an existing construct keep its
//! id. Ids are compared by value and never reused within a tree.
//!
//! # Formatting
//!
//! Every node owns the whitespace and comments that precede its first token as
//! a [`Space`] prefix. Whitespace inside a node (before an operator, a dot, a
//! closing delimiter) lives in dedicated `Space` fields on that node, so that
//! printing an untouched subtree reproduces the original bytes exactly.

use memchr::memchr;
use std::fmt;

// ============================================================================
// Node Identity
// ============================================================================

/// A stable, unique identifier for a CST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId with the given value.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Generator for assigning sequential [`NodeId`]s.
#[derive(Debug, Default, Clone)]
pub struct NodeIdGenerator {
    next_id: u32,
}

impl NodeIdGenerator {
    /// Create a new generator starting from NodeId(0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator that continues an existing sequence.
    pub fn starting_at(next_id: u32) -> Self {
        Self { next_id }
    }

    /// Generate the next NodeId.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Get the current count of generated NodeIds.
    pub fn count(&self) -> u32 {
        self.next_id
    }
}

// ============================================================================
// Whitespace
// ============================================================================

/// Whitespace and comments preceding a token, stored verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Space(String);

impl Space {
    /// No whitespace at all.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// A single space character.
    pub fn single() -> Self {
        Self(" ".to_string())
    }

    /// A line break followed by `indent`.
    pub fn newline_with_indent(indent: &str) -> Self {
        let mut s = String::with_capacity(indent.len() + 1);
        s.push('\n');
        s.push_str(indent);
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if this whitespace contains a line break.
    pub fn contains_newline(&self) -> bool {
        memchr(b'\n', self.0.as_bytes()).is_some()
    }

    /// The indentation following the last line break, if there is one.
    ///
    /// Comment text after the last break is not indentation; only the leading
    /// run of spaces and tabs counts.
    pub fn indent(&self) -> Option<&str> {
        let last_line = &self.0[self.0.rfind('\n')? + 1..];
        let end = last_line
            .find(|c: char| c != ' ' && c != '\t')
            .unwrap_or(last_line.len());
        Some(&last_line[..end])
    }
}

impl From<&str> for Space {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Space {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Node traits
// ============================================================================

/// Identity and leading formatting shared by every CST node.
pub trait Formatted: Sized {
    fn id(&self) -> NodeId;
    fn prefix(&self) -> &Space;
    /// Copy of this node with a different prefix; identity is preserved.
    fn with_prefix(self, prefix: Space) -> Self;
}

/// Implements [`Formatted`] for structs with `id` and `prefix` fields.
macro_rules! impl_formatted {
    ($($node:ty),* $(,)?) => {
        $(
            impl $crate::nodes::traits::Formatted for $node {
                fn id(&self) -> $crate::nodes::traits::NodeId {
                    self.id
                }
                fn prefix(&self) -> &$crate::nodes::traits::Space {
                    &self.prefix
                }
                fn with_prefix(mut self, prefix: $crate::nodes::traits::Space) -> Self {
                    self.prefix = prefix;
                    self
                }
            }
        )*
    };
}
pub(crate) use impl_formatted;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_is_sequential() {
        let mut ids = NodeIdGenerator::new();
        assert_eq!(ids.next_id(), NodeId(0));
        assert_eq!(ids.next_id(), NodeId(1));
        assert_eq!(ids.count(), 2);

        let mut resumed = NodeIdGenerator::starting_at(ids.count());
        assert_eq!(resumed.next_id(), NodeId(2));
    }

    #[test]
    fn space_indent_after_last_newline() {
        assert_eq!(Space::from("\n    ").indent(), Some("    "));
        assert_eq!(Space::from("\n\n\t\t").indent(), Some("\t\t"));
        assert_eq!(Space::from("\n  // note").indent(), Some("  "));
        assert_eq!(Space::from(" ").indent(), None);
    }

    #[test]
    fn space_newline_detection() {
        assert!(Space::from(" /* a\n b */ ").contains_newline());
        assert!(!Space::single().contains_newline());
        assert_eq!(Space::newline_with_indent("  ").as_str(), "\n  ");
    }
}
