// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module is only compiled when running unit tests and contains features
//! that are shared by all tests of the crate.
//!
//! - the `NetworkBuilder`, which can declaratively build network topologies
//!   for use in tests.
//! - the `KnownLibraries` locator, which knows a fixed set of libraries.

use std::collections::BTreeSet;

use crate::algorithms::LibraryLocator;
use crate::elements::{Branch, HvdcLine, Line, Node, Shunt, Switch, Transformer};
use crate::{Error, Network};

/// A builder for creating network topologies easily, for use in tests.
pub(crate) struct NetworkBuilder {
    nodes: Vec<Node>,
    branches: Vec<Branch>,
    hvdc_lines: Vec<HvdcLine>,
    next_id: usize,
}

impl NetworkBuilder {
    /// Creates a new `NetworkBuilder`.
    pub(crate) fn new() -> Self {
        NetworkBuilder {
            nodes: Vec::new(),
            branches: Vec::new(),
            hvdc_lines: Vec::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}{}", self.next_id);
        self.next_id += 1;
        id
    }

    /// Adds a node to the network and returns its id.
    pub(crate) fn node(&mut self, voltage_level_id: &str, nominal_voltage: f64) -> String {
        let id = self.next_id("N");
        self.add_node(Node::new(id, voltage_level_id, nominal_voltage))
    }

    /// Adds a node with the given number of shunts to the network and
    /// returns its id.
    pub(crate) fn node_with_shunts(
        &mut self,
        voltage_level_id: &str,
        nominal_voltage: f64,
        num_shunts: usize,
    ) -> String {
        let id = self.next_id("N");
        let shunts = (0..num_shunts).map(|i| Shunt::new(format!("{id}.SH{i}")));
        self.add_node(Node::new(id.clone(), voltage_level_id, nominal_voltage).with_shunts(shunts))
    }

    /// Adds the given node to the network and returns its id.
    pub(crate) fn add_node(&mut self, node: Node) -> String {
        let id = node.id().to_string();
        self.nodes.push(node);
        id
    }

    /// Connects two nodes with a line.
    pub(crate) fn line(&mut self, from: &str, to: &str) -> &mut Self {
        let id = self.next_id("L");
        self.branches.push(Line::new(id, from, to).into());
        self
    }

    /// Connects two nodes with a transformer.
    pub(crate) fn transformer(&mut self, from: &str, to: &str) -> &mut Self {
        let id = self.next_id("T");
        self.branches.push(Transformer::new(id, from, to).into());
        self
    }

    /// Connects two nodes with a closed switch.
    pub(crate) fn closed_switch(&mut self, from: &str, to: &str) -> &mut Self {
        let id = self.next_id("S");
        self.branches.push(Switch::closed(id, from, to).into());
        self
    }

    /// Connects two nodes with an open switch.
    pub(crate) fn open_switch(&mut self, from: &str, to: &str) -> &mut Self {
        let id = self.next_id("S");
        self.branches.push(Switch::open(id, from, to).into());
        self
    }

    /// Adds an HVDC line to the network.
    pub(crate) fn hvdc_line(&mut self, hvdc_line: HvdcLine) -> &mut Self {
        self.hvdc_lines.push(hvdc_line);
        self
    }

    /// Adds the given number of nodes connected one after the other by
    /// lines, and returns their ids.
    pub(crate) fn line_chain(
        &mut self,
        voltage_level_id: &str,
        nominal_voltage: f64,
        num_nodes: usize,
    ) -> Vec<String> {
        let nodes = (0..num_nodes)
            .map(|_| self.node(voltage_level_id, nominal_voltage))
            .collect::<Vec<_>>();
        for pair in nodes.windows(2) {
            self.line(&pair[0], &pair[1]);
        }
        nodes
    }

    /// Builds and returns the network from the elements added to the builder.
    pub(crate) fn build(&self) -> Result<Network, Error> {
        Network::try_new(
            self.nodes.clone(),
            self.branches.clone(),
            self.hvdc_lines.clone(),
        )
    }
}

/// A library locator that knows a fixed set of libraries.
pub(crate) struct KnownLibraries(BTreeSet<String>);

impl KnownLibraries {
    pub(crate) fn new<'a>(libraries: impl IntoIterator<Item = &'a str>) -> Self {
        KnownLibraries(libraries.into_iter().map(String::from).collect())
    }
}

impl LibraryLocator for KnownLibraries {
    fn exists(&self, library: &str) -> bool {
        self.0.contains(library)
    }
}
