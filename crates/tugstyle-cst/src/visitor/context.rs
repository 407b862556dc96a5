// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Mutable state threaded through a rewrite: the id sequence, the formatter,
//! the change flag and the queue of scoped follow-ups.

use std::collections::VecDeque;

use super::cursor::Cursor;
use super::format::Formatter;
use super::traits::{Rule, Transform};
use crate::nodes::{NodeId, NodeIdGenerator};

/// A rule to run in a later pass, only on the node identified by `scope`.
#[derive(Debug)]
pub struct FollowUp {
    pub scope: NodeId,
    pub rule: Box<dyn Rule>,
}

#[derive(Debug)]
pub struct RewriteCtx {
    formatter: Formatter,
    ids: NodeIdGenerator,
    scope: Option<NodeId>,
    changed: bool,
    follow_ups: VecDeque<FollowUp>,
}

impl RewriteCtx {
    /// `next_id` is the first id not used by the tree being rewritten.
    pub fn new(formatter: Formatter, next_id: u32) -> Self {
        Self {
            formatter,
            ids: NodeIdGenerator::starting_at(next_id),
            scope: None,
            changed: false,
            follow_ups: VecDeque::new(),
        }
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// A fresh id for a node the rule introduces.
    pub fn next_id(&mut self) -> NodeId {
        self.ids.next_id()
    }

    pub fn id_count(&self) -> u32 {
        self.ids.count()
    }

    /// Queues `rule` to run after the current pass, limited to `scope`.
    pub fn and_then(&mut self, scope: NodeId, rule: Box<dyn Rule>) {
        tracing::trace!(%scope, rule = rule.name(), "queued follow-up");
        self.follow_ups.push_back(FollowUp { scope, rule });
    }

    /// The node the current pass is limited to, if any.
    pub fn scope(&self) -> Option<NodeId> {
        self.scope
    }

    pub(crate) fn begin_pass(&mut self, scope: Option<NodeId>) {
        self.scope = scope;
    }

    pub(crate) fn next_follow_up(&mut self) -> Option<FollowUp> {
        self.follow_ups.pop_front()
    }

    /// True if rule logic may run for the node at `cursor`.
    pub(crate) fn admits(&self, cursor: &Cursor<'_>) -> bool {
        match self.scope {
            Some(scope) => cursor.is_scope(scope),
            None => true,
        }
    }

    /// Unwraps a rule result, noting whether it changed anything.
    pub(crate) fn record<T>(&mut self, result: Transform<T>) -> T {
        if result.is_replace() {
            self.changed = true;
        }
        result.into_inner()
    }

    pub(crate) fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}
