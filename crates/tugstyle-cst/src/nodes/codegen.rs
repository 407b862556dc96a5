// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Source generation from CST nodes.

use std::fmt;

use super::traits::Space;

/// Accumulates printed source text.
#[derive(Debug, Default)]
pub struct CodegenState {
    pub tokens: String,
}

impl CodegenState {
    pub fn add_token(&mut self, tok: &str) {
        self.tokens.push_str(tok);
    }

    pub fn add_space(&mut self, space: &Space) {
        self.tokens.push_str(space.as_str());
    }
}

impl fmt::Display for CodegenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens)
    }
}

/// Print a node back to source text.
pub trait Codegen {
    fn codegen(&self, state: &mut CodegenState);

    /// Print this node into a fresh string.
    fn to_source(&self) -> String {
        let mut state = CodegenState::default();
        self.codegen(&mut state);
        state.tokens
    }
}

impl<T: Codegen> Codegen for Box<T> {
    fn codegen(&self, state: &mut CodegenState) {
        (**self).codegen(state);
    }
}

impl<T: Codegen> Codegen for Option<T> {
    fn codegen(&self, state: &mut CodegenState) {
        if let Some(node) = self {
            node.codegen(state);
        }
    }
}

impl<T: Codegen> Codegen for Vec<T> {
    fn codegen(&self, state: &mut CodegenState) {
        for node in self {
            node.codegen(state);
        }
    }
}
