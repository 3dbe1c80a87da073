// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Search for the largest connected component of a network.

use std::collections::HashSet;

use crate::elements::Node;
use crate::{Error, Network};

use super::NodeVisitor;

/// Finds the main connected component of the network: the largest group of
/// nodes connected to each other through lines and transformers.
///
/// Every node has to be visited.  Nodes already reached while expanding an
/// earlier node are not expanded again.  When two components have the same
/// size, the one found first is kept.
#[derive(Debug, Default)]
pub struct MainComponentAlgorithm<'a> {
    marked: HashSet<&'a str>,
    main: Vec<&'a Node>,
}

impl<'a> MainComponentAlgorithm<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the nodes of the largest component found so far, in discovery
    /// order.
    pub fn main_component(&self) -> &[&'a Node] {
        &self.main
    }

    pub fn into_main_component(self) -> Vec<&'a Node> {
        self.main
    }
}

impl<'a> NodeVisitor<'a> for MainComponentAlgorithm<'a> {
    fn visit(&mut self, network: &'a Network, node: &'a Node) -> Result<(), Error> {
        if self.marked.contains(node.id()) {
            return Ok(());
        }

        let group = network.reachable_nodes(node.id())?;
        self.marked.extend(group.iter().map(|n| n.id()));
        if group.len() > self.main.len() {
            self.main = group;
        }

        Ok(())
    }
}
