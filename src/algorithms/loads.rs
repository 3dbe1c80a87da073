// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Selection of the loads to define in the simulation.

use crate::elements::Node;
use crate::{Error, Network};

use super::{NodeVisitor, VOLTAGE_EPSILON};

/// A load to define in the simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadDefinition {
    pub id: String,
    pub node_id: String,
}

/// Collects the loads of the visited nodes whose nominal voltage reaches the
/// DSO voltage level.
#[derive(Debug)]
pub struct LoadDefinitionAlgorithm {
    dso_voltage_level: f64,
    loads: Vec<LoadDefinition>,
}

impl LoadDefinitionAlgorithm {
    /// Creates a new `LoadDefinitionAlgorithm`, keeping the loads of the
    /// nodes with a nominal voltage of at least `dso_voltage_level` kV.
    pub fn new(dso_voltage_level: f64) -> Self {
        Self {
            dso_voltage_level,
            loads: vec![],
        }
    }

    pub fn loads(&self) -> &[LoadDefinition] {
        &self.loads
    }

    pub fn into_loads(self) -> Vec<LoadDefinition> {
        self.loads
    }
}

impl<'a> NodeVisitor<'a> for LoadDefinitionAlgorithm {
    fn visit(&mut self, _network: &'a Network, node: &'a Node) -> Result<(), Error> {
        if node.nominal_voltage() < self.dso_voltage_level - VOLTAGE_EPSILON {
            for load in node.loads() {
                tracing::debug!(
                    "Load:{} ignored, node {} is below the DSO voltage level ({} < {}).",
                    load.id(),
                    node.id(),
                    node.nominal_voltage(),
                    self.dso_voltage_level
                );
            }
            return Ok(());
        }

        self.loads.extend(node.loads().iter().map(|load| LoadDefinition {
            id: load.id().to_string(),
            node_id: load.node_id().to_string(),
        }));

        Ok(())
    }
}
