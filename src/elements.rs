// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the network elements that make up a
//! [`Network`][crate::Network]: nodes and the equipment attached to them,
//! and the branches and HVDC lines connecting them.
//!
//! Elements reference each other by id only.  The network resolves those ids
//! to the elements it owns.

use std::cmp::Ordering;
use std::fmt::Display;

/// A grouping of nodes.  Voltage levels don't own their nodes, they are a
/// lookup key built from the voltage level ids of the nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct VoltageLevel {
    id: String,
    nodes: Vec<String>,
}

impl VoltageLevel {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nodes: vec![],
        }
    }

    pub(crate) fn add_node(&mut self, node_id: impl Into<String>) {
        self.nodes.push(node_id.into());
    }

    /// Returns the id of the voltage level.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the ids of the nodes contained in the voltage level.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }
}

/// A shunt that can be connected to a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shunt {
    id: String,
}

impl Shunt {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// A load connected to a node.
#[derive(Clone, Debug, PartialEq)]
pub struct Load {
    id: String,
    node_id: String,
}

impl Load {
    /// Creates a new load.  The node id is set by
    /// [`Node::with_load`].
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_id: String::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the id of the node the load is connected to.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }
}

/// A point of the reactive capability curve of a generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReactiveCurvePoint {
    pub p: f64,
    pub qmin: f64,
    pub qmax: f64,
}

impl ReactiveCurvePoint {
    pub fn new(p: f64, qmin: f64, qmax: f64) -> Self {
        Self { p, qmin, qmax }
    }
}

/// A generator connected to a node, regulating the voltage of a bus.
#[derive(Clone, Debug, PartialEq)]
pub struct Generator {
    id: String,
    node_id: String,
    regulated_bus_id: String,
    points: Vec<ReactiveCurvePoint>,
    pmin: f64,
    pmax: f64,
    qmin: f64,
    qmax: f64,
    target_p: f64,
}

impl Generator {
    /// Creates a new generator regulating the bus with the given id.
    ///
    /// The node id is set by [`Node::with_generator`], and all limits
    /// default to zero.
    pub fn new(id: impl Into<String>, regulated_bus_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_id: String::new(),
            regulated_bus_id: regulated_bus_id.into(),
            points: vec![],
            pmin: 0.0,
            pmax: 0.0,
            qmin: 0.0,
            qmax: 0.0,
            target_p: 0.0,
        }
    }

    pub fn with_points(mut self, points: impl IntoIterator<Item = ReactiveCurvePoint>) -> Self {
        self.points = points.into_iter().collect();
        self
    }

    pub fn with_p_limits(mut self, pmin: f64, pmax: f64) -> Self {
        self.pmin = pmin;
        self.pmax = pmax;
        self
    }

    pub fn with_q_limits(mut self, qmin: f64, qmax: f64) -> Self {
        self.qmin = qmin;
        self.qmax = qmax;
        self
    }

    pub fn with_target_p(mut self, target_p: f64) -> Self {
        self.target_p = target_p;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the id of the node the generator is connected to.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Returns the id of the bus whose voltage the generator regulates.
    pub fn regulated_bus_id(&self) -> &str {
        &self.regulated_bus_id
    }

    /// Returns the points of the reactive capability curve.
    pub fn points(&self) -> &[ReactiveCurvePoint] {
        &self.points
    }

    pub fn pmin(&self) -> f64 {
        self.pmin
    }

    pub fn pmax(&self) -> f64 {
        self.pmax
    }

    pub fn qmin(&self) -> f64 {
        self.qmin
    }

    pub fn qmax(&self) -> f64 {
        self.qmax
    }

    pub fn target_p(&self) -> f64 {
        self.target_p
    }

    /// Returns true if the generator regulates a bus other than its own.
    pub fn regulates_remotely(&self) -> bool {
        self.regulated_bus_id != self.node_id
    }
}

/// A node of the network, the electrical bus equipment is connected to.
///
/// Nodes are equal and ordered by their ids.
#[derive(Clone, Debug)]
pub struct Node {
    id: String,
    voltage_level_id: String,
    nominal_voltage: f64,
    shunts: Vec<Shunt>,
    loads: Vec<Load>,
    generators: Vec<Generator>,
    pub(crate) lines: Vec<String>,
    pub(crate) transformers: Vec<String>,
    pub(crate) switches: Vec<String>,
    pub(crate) converters: Vec<String>,
}

impl Node {
    pub fn new(
        id: impl Into<String>,
        voltage_level_id: impl Into<String>,
        nominal_voltage: f64,
    ) -> Self {
        Self {
            id: id.into(),
            voltage_level_id: voltage_level_id.into(),
            nominal_voltage,
            shunts: vec![],
            loads: vec![],
            generators: vec![],
            lines: vec![],
            transformers: vec![],
            switches: vec![],
            converters: vec![],
        }
    }

    pub fn with_shunts(mut self, shunts: impl IntoIterator<Item = Shunt>) -> Self {
        self.shunts.extend(shunts);
        self
    }

    /// Attaches the given generator to the node.
    pub fn with_generator(mut self, mut generator: Generator) -> Self {
        generator.node_id = self.id.clone();
        self.generators.push(generator);
        self
    }

    /// Attaches the given load to the node.
    pub fn with_load(mut self, mut load: Load) -> Self {
        load.node_id = self.id.clone();
        self.loads.push(load);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn voltage_level_id(&self) -> &str {
        &self.voltage_level_id
    }

    /// Returns the nominal voltage of the node, in kV.
    pub fn nominal_voltage(&self) -> f64 {
        self.nominal_voltage
    }

    pub fn shunts(&self) -> &[Shunt] {
        &self.shunts
    }

    pub fn loads(&self) -> &[Load] {
        &self.loads
    }

    pub fn generators(&self) -> &[Generator] {
        &self.generators
    }

    /// Returns the ids of the lines connected to the node.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Returns the ids of the transformers connected to the node.
    pub fn transformers(&self) -> &[String] {
        &self.transformers
    }

    /// Returns the ids of the switches connected to the node.
    pub fn switches(&self) -> &[String] {
        &self.switches
    }

    /// Returns the ids of the HVDC converters connected to the node.
    pub fn converters(&self) -> &[String] {
        &self.converters
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

/// A line between two nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    id: String,
    nodes: [String; 2],
    active_season: Option<String>,
}

impl Line {
    pub fn new(id: impl Into<String>, node1: impl Into<String>, node2: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nodes: [node1.into(), node2.into()],
            active_season: None,
        }
    }

    /// Sets the season the operational limits of the line are taken from.
    pub fn with_active_season(mut self, season: impl Into<String>) -> Self {
        self.active_season = Some(season.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn active_season(&self) -> Option<&str> {
        self.active_season.as_deref()
    }
}

/// A two or three windings transformer.
#[derive(Clone, Debug, PartialEq)]
pub struct Transformer {
    id: String,
    nodes: Vec<String>,
}

impl Transformer {
    /// Creates a two windings transformer.
    pub fn new(id: impl Into<String>, node1: impl Into<String>, node2: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nodes: vec![node1.into(), node2.into()],
        }
    }

    /// Creates a three windings transformer.
    pub fn three_windings(
        id: impl Into<String>,
        node1: impl Into<String>,
        node2: impl Into<String>,
        node3: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            nodes: vec![node1.into(), node2.into(), node3.into()],
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }
}

/// A switch between two nodes.
///
/// Switches are not part of the neighbour relation between nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Switch {
    id: String,
    nodes: [String; 2],
    open: bool,
}

impl Switch {
    pub fn closed(id: impl Into<String>, node1: impl Into<String>, node2: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nodes: [node1.into(), node2.into()],
            open: false,
        }
    }

    pub fn open(id: impl Into<String>, node1: impl Into<String>, node2: impl Into<String>) -> Self {
        Self {
            open: true,
            ..Self::closed(id, node1, node2)
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns the node at the other end of the switch, if `node_id` is one
    /// of its ends.
    pub(crate) fn other_end(&self, node_id: &str) -> Option<&str> {
        match &self.nodes {
            [a, b] if a == node_id => Some(b.as_str()),
            [a, b] if b == node_id => Some(a.as_str()),
            _ => None,
        }
    }
}

/// A branch between nodes of the network.
#[derive(Clone, Debug, PartialEq)]
pub enum Branch {
    Line(Line),
    Transformer(Transformer),
    Switch(Switch),
}

impl From<Line> for Branch {
    fn from(line: Line) -> Self {
        Branch::Line(line)
    }
}

impl From<Transformer> for Branch {
    fn from(transformer: Transformer) -> Self {
        Branch::Transformer(transformer)
    }
}

impl From<Switch> for Branch {
    fn from(switch: Switch) -> Self {
        Branch::Switch(switch)
    }
}

/// Represents the converter technology of an HVDC line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConverterType {
    Lcc,
    Vsc,
}

impl Display for ConverterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConverterType::Lcc => write!(f, "LCC"),
            ConverterType::Vsc => write!(f, "VSC"),
        }
    }
}

/// Which end of an HVDC line a converter is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConverterSide {
    First,
    Second,
}

/// An HVDC converter station.
#[derive(Clone, Debug, PartialEq)]
pub struct Converter {
    id: String,
    bus_id: String,
    voltage_regulation_on: Option<bool>,
}

impl Converter {
    pub fn new(id: impl Into<String>, bus_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            bus_id: bus_id.into(),
            voltage_regulation_on: None,
        }
    }

    /// Sets the voltage regulation flag.  Only meaningful for VSC
    /// converters.
    pub fn with_voltage_regulation(mut self, on: bool) -> Self {
        self.voltage_regulation_on = Some(on);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the id of the node the converter is connected to.
    pub fn bus_id(&self) -> &str {
        &self.bus_id
    }

    pub fn voltage_regulation_on(&self) -> Option<bool> {
        self.voltage_regulation_on
    }
}

/// An HVDC line between two converters.
#[derive(Clone, Debug, PartialEq)]
pub struct HvdcLine {
    id: String,
    converter_type: ConverterType,
    converter1: Converter,
    converter2: Converter,
}

impl HvdcLine {
    pub fn new(
        id: impl Into<String>,
        converter_type: ConverterType,
        converter1: Converter,
        converter2: Converter,
    ) -> Self {
        Self {
            id: id.into(),
            converter_type,
            converter1,
            converter2,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn converter_type(&self) -> ConverterType {
        self.converter_type
    }

    pub fn converter(&self, side: ConverterSide) -> &Converter {
        match side {
            ConverterSide::First => &self.converter1,
            ConverterSide::Second => &self.converter2,
        }
    }

    pub(crate) fn converters(&self) -> [(ConverterSide, &Converter); 2] {
        [
            (ConverterSide::First, &self.converter1),
            (ConverterSide::Second, &self.converter2),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_attaches_equipment() {
        let node = Node::new("N1", "VL1", 400.0)
            .with_generator(Generator::new("G1", "N1"))
            .with_generator(Generator::new("G2", "N2"))
            .with_load(Load::new("L1"));

        assert_eq!(node.generators()[0].node_id(), "N1");
        assert!(!node.generators()[0].regulates_remotely());
        assert!(node.generators()[1].regulates_remotely());
        assert_eq!(node.loads()[0].node_id(), "N1");
    }

    #[test]
    fn test_node_identity() {
        let a = Node::new("A", "VL1", 400.0);
        let a_again = Node::new("A", "VL2", 225.0);
        let b = Node::new("B", "VL1", 400.0);

        assert_eq!(a, a_again);
        assert!(a < b);
    }

    #[test]
    fn test_switch_other_end() {
        let switch = Switch::open("S1", "A", "B");
        assert!(switch.is_open());
        assert_eq!(switch.other_end("A"), Some("B"));
        assert_eq!(switch.other_end("B"), Some("A"));
        assert_eq!(switch.other_end("C"), None);
        assert!(!Switch::closed("S2", "A", "B").is_open());
    }

    #[test]
    fn test_line_active_season() {
        let line = Line::new("L1", "A", "B");
        assert_eq!(line.active_season(), None);
        assert_eq!(line.nodes(), ["A", "B"]);

        let line = line.with_active_season("WINTER");
        assert_eq!(line.active_season(), Some("WINTER"));
    }

    #[test]
    fn test_display() {
        assert_eq!(ConverterType::Lcc.to_string(), "LCC");
        assert_eq!(ConverterType::Vsc.to_string(), "VSC");
    }
}
