// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Counting of the shunts of each voltage level.

use std::collections::BTreeMap;

use crate::elements::Node;
use crate::{Error, Network};

use super::NodeVisitor;

/// Counts the shunts of the visited nodes, per voltage level.
#[derive(Debug, Default)]
pub struct ShuntCounterAlgorithm {
    counts: BTreeMap<String, usize>,
}

impl ShuntCounterAlgorithm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of shunts per voltage level id.  Every voltage
    /// level of a visited node has an entry, even without shunts.
    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    pub fn into_counts(self) -> BTreeMap<String, usize> {
        self.counts
    }
}

impl<'a> NodeVisitor<'a> for ShuntCounterAlgorithm {
    fn visit(&mut self, _network: &'a Network, node: &'a Node) -> Result<(), Error> {
        *self
            .counts
            .entry(node.voltage_level_id().to_string())
            .or_default() += node.shunts().len();
        Ok(())
    }
}
