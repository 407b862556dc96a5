// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

pub(crate) mod codegen;
pub(crate) mod expression;
pub(crate) mod statement;
pub(crate) mod traits;

pub use codegen::{Codegen, CodegenState};
pub use expression::*;
pub use statement::*;
pub use traits::{Formatted, NodeId, NodeIdGenerator, Space};
