// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Selection of the reference node of a network.

use crate::elements::Node;
use crate::{Error, Network};

use super::{NodeVisitor, VOLTAGE_EPSILON};

/// Selects the slack node among the visited nodes.
///
/// The node with the highest nominal voltage wins.  Between nodes with the
/// same nominal voltage, the one with the most neighbours wins, and after
/// that the first one seen is kept.
#[derive(Debug, Default)]
pub struct SlackNodeAlgorithm<'a> {
    slack: Option<(&'a Node, usize)>,
}

impl<'a> SlackNodeAlgorithm<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the selected node, or `None` if no node was visited.
    pub fn slack_node(&self) -> Option<&'a Node> {
        self.slack.map(|(node, _)| node)
    }
}

impl<'a> NodeVisitor<'a> for SlackNodeAlgorithm<'a> {
    fn visit(&mut self, network: &'a Network, node: &'a Node) -> Result<(), Error> {
        let neighbor_count = network.neighbor_count(node.id())?;

        let replace = match self.slack {
            None => true,
            Some((best, best_neighbor_count)) => {
                let diff = node.nominal_voltage() - best.nominal_voltage();
                if diff.abs() <= VOLTAGE_EPSILON {
                    neighbor_count > best_neighbor_count
                } else {
                    diff > 0.0
                }
            }
        };

        if replace {
            self.slack = Some((node, neighbor_count));
        }

        Ok(())
    }
}
