// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains methods that help with network traversal.

use std::collections::HashSet;

use crate::elements::Node;
use crate::{Error, Network};

/// Traversal methods.
impl Network {
    /// Returns all the nodes reachable from the given node through lines and
    /// transformers, the given node included, in depth first order.
    pub fn reachable_nodes(&self, from: &str) -> Result<Vec<&Node>, Error> {
        let index = self
            .node_indices
            .get(from)
            .ok_or_else(|| Error::node_not_found(format!("Node with id {} not found.", from)))?;
        let mut visited = HashSet::from([*index]);
        let mut stack = vec![*index];
        let mut found = vec![];

        while let Some(index) = stack.pop() {
            found.push(&self.graph[index]);
            for neighbor in self.graph.neighbors(index) {
                if visited.insert(neighbor) {
                    stack.push(neighbor);
                }
            }
        }

        Ok(found)
    }

    /// Find a node, other than the given one, that satisfies the given
    /// predicate and is connected to the given node through closed switches
    /// only.
    pub fn find_through_closed_switches(
        &self,
        from: &str,
        mut pred: impl FnMut(&Node) -> bool,
    ) -> Result<Option<&Node>, Error> {
        let start = self.node(from)?;
        let mut visited = HashSet::from([start.id()]);
        let mut stack = vec![start];

        while let Some(node) = stack.pop() {
            if node.id() != from && pred(node) {
                return Ok(Some(node));
            }

            for switch_id in node.switches() {
                let switch = self.switch(switch_id)?;
                if switch.is_open() {
                    continue;
                }
                let Some(other) = switch.other_end(node.id()) else {
                    return Err(Error::internal(format!(
                        "Switch {} is registered on node {} but doesn't end there.",
                        switch_id,
                        node.id()
                    )));
                };
                if visited.insert(other) {
                    stack.push(self.node(other)?);
                }
            }
        }

        Ok(None)
    }
}
