// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A graph representation of the nodes of a transmission network and the
//! branches and HVDC lines between them.

mod creation;
mod retrieval;

pub mod iterators;
mod traversal;

#[cfg(test)]
pub(crate) mod test_utils;

use crate::elements::{ConverterSide, HvdcLine, Line, Node, Switch, Transformer, VoltageLevel};
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{BTreeMap, HashMap};

/// `Node`s stored in an `UnGraph` instance can be addressed with `NodeIndex`es.
///
/// `NodeIndexMap` stores the corresponding `NodeIndex` for any node id, so
/// that nodes in the `UnGraph` can be retrieved from their ids.
pub(crate) type NodeIndexMap = HashMap<String, NodeIndex>;

/// Converters are stored inside their `HvdcLine`.
///
/// `ConverterMap` maps a converter id to the id of its HVDC line and the side
/// of the line it is on.
pub(crate) type ConverterMap = HashMap<String, (String, ConverterSide)>;

/// A transmission network.
///
/// The edges of the underlying graph are the neighbour relation between
/// nodes, derived from the lines and transformers.  The branches themselves
/// are stored separately and referenced by id from the nodes.
pub struct Network {
    graph: UnGraph<Node, ()>,
    node_indices: NodeIndexMap,
    voltage_levels: BTreeMap<String, VoltageLevel>,
    lines: HashMap<String, Line>,
    transformers: HashMap<String, Transformer>,
    switches: HashMap<String, Switch>,
    hvdc_lines: HashMap<String, HvdcLine>,
    converters: ConverterMap,
    regulating_generators: HashMap<String, usize>,
}
