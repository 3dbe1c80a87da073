// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for creating [`Network`] instances from given nodes, branches and
//! HVDC lines.

use std::collections::{BTreeMap, HashMap, HashSet};

use petgraph::graph::UnGraph;

use crate::elements::{Branch, HvdcLine, Line, Node, Switch, Transformer, VoltageLevel};
use crate::Error;

use super::{Network, NodeIndexMap};

/// `Network` instantiation.
impl Network {
    /// Creates a new [`Network`] from the given nodes, branches and HVDC
    /// lines.
    ///
    /// Every branch is registered into each of its end nodes exactly once.
    ///
    /// Returns an error if an element references a node that doesn't exist,
    /// or if element ids are not unique.
    pub fn try_new<
        NodeIterator: IntoIterator<Item = Node>,
        BranchIterator: IntoIterator<Item = Branch>,
        HvdcIterator: IntoIterator<Item = HvdcLine>,
    >(
        nodes: NodeIterator,
        branches: BranchIterator,
        hvdc_lines: HvdcIterator,
    ) -> Result<Self, Error> {
        let (graph, indices, voltage_levels) = Self::create_graph(nodes)?;

        let mut network = Self {
            graph,
            node_indices: indices,
            voltage_levels,
            lines: HashMap::new(),
            transformers: HashMap::new(),
            switches: HashMap::new(),
            hvdc_lines: HashMap::new(),
            converters: HashMap::new(),
            regulating_generators: HashMap::new(),
        };

        for branch in branches {
            match branch {
                Branch::Line(line) => network.add_line(line)?,
                Branch::Transformer(transformer) => network.add_transformer(transformer)?,
                Branch::Switch(switch) => network.add_switch(switch)?,
            }
        }
        for hvdc_line in hvdc_lines {
            network.add_hvdc_line(hvdc_line)?;
        }
        network.count_regulating_generators()?;

        Ok(network)
    }

    #[allow(clippy::type_complexity)]
    fn create_graph(
        nodes: impl IntoIterator<Item = Node>,
    ) -> Result<(UnGraph<Node, ()>, NodeIndexMap, BTreeMap<String, VoltageLevel>), Error> {
        let mut graph = UnGraph::new_undirected();
        let mut indices = NodeIndexMap::new();
        let mut voltage_levels = BTreeMap::<String, VoltageLevel>::new();
        let mut equipment_ids = HashSet::new();

        for mut node in nodes {
            let nid = node.id().to_string();

            if indices.contains_key(&nid) {
                return Err(Error::invalid_graph(format!(
                    "Duplicate node ID found: {nid}"
                )));
            }

            let equipment = node
                .shunts()
                .iter()
                .map(|s| ("shunt", s.id()))
                .chain(node.generators().iter().map(|g| ("generator", g.id())))
                .chain(node.loads().iter().map(|l| ("load", l.id())));
            for (kind, id) in equipment {
                if !equipment_ids.insert((kind, id.to_string())) {
                    return Err(Error::invalid_element(format!(
                        "Duplicate {kind} ID found: {id}"
                    )));
                }
            }

            voltage_levels
                .entry(node.voltage_level_id().to_string())
                .or_insert_with(|| VoltageLevel::new(node.voltage_level_id()))
                .add_node(nid.clone());

            // edges are registered from the branches and HVDC lines only.
            node.lines.clear();
            node.transformers.clear();
            node.switches.clear();
            node.converters.clear();

            let idx = graph.add_node(node);
            indices.insert(nid, idx);
        }

        Ok((graph, indices, voltage_levels))
    }

    /// Checks that the given end nodes are distinct and exist.
    fn check_ends(&self, kind: &str, id: &str, ends: &[String]) -> Result<(), Error> {
        for (pos, nid) in ends.iter().enumerate() {
            if ends[..pos].contains(nid) {
                return Err(Error::invalid_edge(format!(
                    "{kind}:{id} Can't connect a node to itself."
                )));
            }
            if !self.node_indices.contains_key(nid) {
                return Err(Error::invalid_edge(format!(
                    "{kind}:{id} Can't find a node with ID {nid}"
                )));
            }
        }
        Ok(())
    }

    /// Adds the neighbour relation between all pairs of the given nodes.
    fn connect_neighbours(&mut self, ends: &[String]) {
        for (pos, a) in ends.iter().enumerate() {
            for b in &ends[pos + 1..] {
                let a_idx = self.node_indices[a];
                let b_idx = self.node_indices[b];
                self.graph.update_edge(a_idx, b_idx, ());
            }
        }
    }

    fn add_line(&mut self, line: Line) -> Result<(), Error> {
        let lid = line.id().to_string();
        if self.lines.contains_key(&lid) {
            return Err(Error::invalid_edge(format!("Duplicate line ID found: {lid}")));
        }
        self.check_ends("Line", &lid, line.nodes())?;

        for nid in line.nodes() {
            let idx = self.node_indices[nid];
            self.graph[idx].lines.push(lid.clone());
        }
        self.connect_neighbours(line.nodes());
        self.lines.insert(lid, line);

        Ok(())
    }

    fn add_transformer(&mut self, transformer: Transformer) -> Result<(), Error> {
        let tid = transformer.id().to_string();
        if self.transformers.contains_key(&tid) {
            return Err(Error::invalid_edge(format!(
                "Duplicate transformer ID found: {tid}"
            )));
        }
        let windings = transformer.nodes().len();
        if !(2..=3).contains(&windings) {
            return Err(Error::invalid_edge(format!(
                "Transformer:{tid} must have 2 or 3 windings, found {windings}."
            )));
        }
        self.check_ends("Transformer", &tid, transformer.nodes())?;

        for nid in transformer.nodes() {
            let idx = self.node_indices[nid];
            self.graph[idx].transformers.push(tid.clone());
        }
        self.connect_neighbours(transformer.nodes());
        self.transformers.insert(tid, transformer);

        Ok(())
    }

    fn add_switch(&mut self, switch: Switch) -> Result<(), Error> {
        let sid = switch.id().to_string();
        if self.switches.contains_key(&sid) {
            return Err(Error::invalid_edge(format!("Duplicate switch ID found: {sid}")));
        }
        self.check_ends("Switch", &sid, switch.nodes())?;

        for nid in switch.nodes() {
            let idx = self.node_indices[nid];
            self.graph[idx].switches.push(sid.clone());
        }
        self.switches.insert(sid, switch);

        Ok(())
    }

    fn add_hvdc_line(&mut self, hvdc_line: HvdcLine) -> Result<(), Error> {
        let hid = hvdc_line.id().to_string();
        if self.hvdc_lines.contains_key(&hid) {
            return Err(Error::invalid_edge(format!(
                "Duplicate HVDC line ID found: {hid}"
            )));
        }

        for (side, converter) in hvdc_line.converters() {
            let cid = converter.id();
            if self.converters.contains_key(cid) {
                return Err(Error::invalid_element(format!(
                    "Duplicate converter ID found: {cid}"
                )));
            }
            let Some(&idx) = self.node_indices.get(converter.bus_id()) else {
                return Err(Error::invalid_edge(format!(
                    "HvdcLine:{hid} Can't find a node with ID {}",
                    converter.bus_id()
                )));
            };
            self.graph[idx].converters.push(cid.to_string());
            self.converters
                .insert(cid.to_string(), (hid.clone(), side));
        }
        self.hvdc_lines.insert(hid, hvdc_line);

        Ok(())
    }

    fn count_regulating_generators(&mut self) -> Result<(), Error> {
        let mut counts = HashMap::new();
        for node in self.graph.node_weights() {
            for generator in node.generators() {
                let bus = generator.regulated_bus_id();
                if !self.node_indices.contains_key(bus) {
                    return Err(Error::invalid_element(format!(
                        "Generator:{} regulates bus {bus}, which can't be found.",
                        generator.id()
                    )));
                }
                *counts.entry(bus.to_string()).or_insert(0) += 1;
            }
        }
        self.regulating_generators = counts;

        Ok(())
    }
}
