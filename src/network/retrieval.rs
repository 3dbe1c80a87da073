// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for retrieving nodes and other elements from a [`Network`].

use crate::elements::{
    ConverterSide, HvdcLine, Line, Node, Switch, Transformer, VoltageLevel,
};
use crate::iterators::{Neighbors, Nodes};
use crate::{Error, Network};

/// Element retrieval.
impl Network {
    /// Returns the node with the given `node_id`, if it exists.
    pub fn node(&self, node_id: &str) -> Result<&Node, Error> {
        self.node_indices
            .get(node_id)
            .map(|i| &self.graph[*i])
            .ok_or_else(|| Error::node_not_found(format!("Node with id {} not found.", node_id)))
    }

    /// Returns an iterator over the nodes of the network, in the order they
    /// were given to [`try_new`][Network::try_new].
    pub fn nodes(&self) -> Nodes {
        Nodes {
            iter: self.graph.raw_nodes().iter(),
        }
    }

    /// Returns the number of nodes in the network.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns an iterator over the *neighbours* of the node with the given
    /// `node_id`, that is the nodes it shares a line or a transformer with.
    ///
    /// Returns an error if the given `node_id` does not exist.
    pub fn neighbors(&self, node_id: &str) -> Result<Neighbors, Error> {
        self.node_indices
            .get(node_id)
            .map(|&index| Neighbors {
                graph: &self.graph,
                iter: self.graph.neighbors(index),
            })
            .ok_or_else(|| Error::node_not_found(format!("Node with id {} not found.", node_id)))
    }

    /// Returns the number of neighbours of the node with the given `node_id`.
    pub fn neighbor_count(&self, node_id: &str) -> Result<usize, Error> {
        Ok(self.neighbors(node_id)?.count())
    }

    pub fn voltage_level(&self, voltage_level_id: &str) -> Result<&VoltageLevel, Error> {
        self.voltage_levels.get(voltage_level_id).ok_or_else(|| {
            Error::element_not_found(format!(
                "Voltage level with id {} not found.",
                voltage_level_id
            ))
        })
    }

    /// Returns an iterator over the voltage levels of the network, ordered
    /// by id.
    pub fn voltage_levels(&self) -> impl Iterator<Item = &VoltageLevel> {
        self.voltage_levels.values()
    }

    pub fn line(&self, line_id: &str) -> Result<&Line, Error> {
        self.lines.get(line_id).ok_or_else(|| {
            Error::element_not_found(format!("Line with id {} not found.", line_id))
        })
    }

    pub fn transformer(&self, transformer_id: &str) -> Result<&Transformer, Error> {
        self.transformers.get(transformer_id).ok_or_else(|| {
            Error::element_not_found(format!(
                "Transformer with id {} not found.",
                transformer_id
            ))
        })
    }

    pub fn switch(&self, switch_id: &str) -> Result<&Switch, Error> {
        self.switches.get(switch_id).ok_or_else(|| {
            Error::element_not_found(format!("Switch with id {} not found.", switch_id))
        })
    }

    pub fn hvdc_line(&self, hvdc_line_id: &str) -> Result<&HvdcLine, Error> {
        self.hvdc_lines.get(hvdc_line_id).ok_or_else(|| {
            Error::element_not_found(format!("HVDC line with id {} not found.", hvdc_line_id))
        })
    }

    /// Returns the HVDC line the converter with the given id belongs to, and
    /// the side of the line the converter is on.
    pub fn hvdc_line_of_converter(
        &self,
        converter_id: &str,
    ) -> Result<(&HvdcLine, ConverterSide), Error> {
        let (hvdc_line_id, side) = self.converters.get(converter_id).ok_or_else(|| {
            Error::element_not_found(format!("Converter with id {} not found.", converter_id))
        })?;
        Ok((self.hvdc_line(hvdc_line_id)?, *side))
    }

    /// Returns the number of generators regulating the bus with the given id.
    pub fn regulating_generator_count(&self, bus_id: &str) -> usize {
        self.regulating_generators
            .get(bus_id)
            .copied()
            .unwrap_or_default()
    }
}
