// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The resolution of a network and an automaton configuration into the
//! definitions of a dynamic simulation.

use std::collections::{BTreeMap, BTreeSet};

use crate::algorithms::{
    traverse, BusGeneratorMap, DynamicModelAlgorithm, DynamicModelDefinitions,
    GeneratorDefinition, GeneratorDefinitionAlgorithm, HvdcLineAlgorithm, HvdcLineDefinition,
    LibraryLocator, LoadDefinition, LoadDefinitionAlgorithm, MainComponentAlgorithm,
    ShuntCounterAlgorithm, SlackNodeAlgorithm,
};
use crate::automaton::AutomatonConfig;
use crate::{Error, Network, ResolverConfig};

/// Everything the writers of the simulation input files need.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    /// Ids of the nodes of the main connected component.
    pub main_component: BTreeSet<String>,
    /// Id of the reference node, `None` when the network has no nodes.
    pub slack_node: Option<String>,
    pub generators: Vec<GeneratorDefinition>,
    pub buses_with_dynamic_model: BusGeneratorMap,
    pub loads: Vec<LoadDefinition>,
    pub hvdc_lines: BTreeMap<String, HvdcLineDefinition>,
    pub dynamic_models: DynamicModelDefinitions,
    /// Number of shunts per voltage level id.
    pub shunt_counts: BTreeMap<String, usize>,
}

/// Resolves the definitions of a dynamic simulation of `network`.
///
/// The main connected component is searched over all nodes first.  The
/// other algorithms are then run together over the nodes of the main
/// component, in the order they were discovered.
pub fn resolve(
    network: &Network,
    automatons: &AutomatonConfig,
    locator: &impl LibraryLocator,
    config: &ResolverConfig,
) -> Result<Resolution, Error> {
    let mut main_component = MainComponentAlgorithm::new();
    traverse(network, network.nodes(), &mut main_component)?;
    let main_component = main_component.into_main_component();
    tracing::debug!(
        "Main connected component has {} of {} nodes.",
        main_component.len(),
        network.node_count()
    );

    let mut algorithms = (
        SlackNodeAlgorithm::new(),
        GeneratorDefinitionAlgorithm::new(config.infinite_reactive_limits),
        LoadDefinitionAlgorithm::new(config.dso_voltage_level),
        HvdcLineAlgorithm::new(),
        DynamicModelAlgorithm::new(automatons, locator),
        ShuntCounterAlgorithm::new(),
    );
    traverse(network, main_component.iter().copied(), &mut algorithms)?;

    let (slack_node, generators, loads, hvdc_lines, dynamic_models, shunt_counter) = algorithms;
    let (generators, buses_with_dynamic_model) = generators.into_parts();

    Ok(Resolution {
        main_component: main_component
            .iter()
            .map(|node| node.id().to_string())
            .collect(),
        slack_node: slack_node.slack_node().map(|node| node.id().to_string()),
        generators,
        buses_with_dynamic_model,
        loads: loads.into_loads(),
        hvdc_lines: hvdc_lines.into_hvdc_lines(),
        dynamic_models: dynamic_models.into_definitions(),
        shunt_counts: shunt_counter.into_counts(),
    })
}
