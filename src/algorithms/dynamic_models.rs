// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Binding of the macro connectors of dynamic automatons to the elements of
//! a network.
//!
//! The associations of the automatons are indexed once when the algorithm is
//! created, by the voltage level, line or transformer they target.  Visiting
//! a node then materializes the connections to the node, its shunts, and the
//! lines and transformers it is an end of.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::mem;

use crate::automaton::{
    Association, AutomatonConfig, DynamicAutomaton, MultipleKind, SingleTarget,
};
use crate::elements::Node;
use crate::{Error, Network};

use super::{LibraryLocator, NodeVisitor};

/// The kind of network element a macro connector is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementType {
    Node,
    Line,
    Transformer,
    Shunt,
}

/// A macro connector bound to a network element.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MacroConnection {
    pub macro_connector_id: String,
    pub element_type: ElementType,
    pub connected_element_id: String,
}

/// A dynamic model to instantiate in the simulation, with the connections
/// of its macro connectors.
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicModelDefinition {
    pub id: String,
    pub lib: String,
    pub connections: BTreeSet<MacroConnection>,
}

/// The dynamic models with at least one connection, by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DynamicModelDefinitions {
    pub models: BTreeMap<String, DynamicModelDefinition>,
    /// Ids of the macro connectors bound to at least one element.
    pub used_macro_connectors: BTreeSet<String>,
    /// Ids of the macro connectors of the automatons whose library was found.
    pub declared_macro_connectors: BTreeSet<String>,
}

impl DynamicModelDefinitions {
    /// Returns the declared macro connectors that were never bound.
    pub fn unused_macro_connectors(&self) -> impl Iterator<Item = &str> {
        self.declared_macro_connectors
            .difference(&self.used_macro_connectors)
            .map(String::as_str)
    }

    fn insert(&mut self, automaton: &DynamicAutomaton, connection: MacroConnection) {
        self.used_macro_connectors
            .insert(connection.macro_connector_id.clone());
        self.models
            .entry(automaton.id.clone())
            .or_insert_with(|| DynamicModelDefinition {
                id: automaton.id.clone(),
                lib: automaton.lib.clone(),
                connections: BTreeSet::new(),
            })
            .connections
            .insert(connection);
    }
}

/// A macro connector waiting for its element to be visited.
#[derive(Clone, Copy, Debug)]
struct PendingConnection<'c> {
    automaton: &'c DynamicAutomaton,
    macro_connector_id: &'c str,
}

/// The bus connections of a voltage level.
#[derive(Debug, Default)]
struct PendingBuses<'c> {
    /// Bound to the first visited node of the voltage level only.
    first_node: Vec<PendingConnection<'c>>,
    every_node: Vec<PendingConnection<'c>>,
}

/// Builds the [`DynamicModelDefinitions`] of the automatons of an
/// [`AutomatonConfig`].
///
/// Automatons whose library can't be found are dropped, and macro connectors
/// naming an unknown association are skipped.  Both are logged as warnings.
#[derive(Debug)]
pub struct DynamicModelAlgorithm<'c> {
    buses: HashMap<&'c str, PendingBuses<'c>>,
    shunts: HashMap<&'c str, Vec<PendingConnection<'c>>>,
    lines: HashMap<&'c str, Vec<PendingConnection<'c>>>,
    transformers: HashMap<&'c str, Vec<PendingConnection<'c>>>,
    definitions: DynamicModelDefinitions,
}

impl<'c> DynamicModelAlgorithm<'c> {
    pub fn new(config: &'c AutomatonConfig, locator: &impl LibraryLocator) -> Self {
        let mut algorithm = Self {
            buses: HashMap::new(),
            shunts: HashMap::new(),
            lines: HashMap::new(),
            transformers: HashMap::new(),
            definitions: DynamicModelDefinitions::default(),
        };

        for automaton in config.automatons() {
            if !locator.exists(&automaton.lib) {
                tracing::warn!(
                    "Automaton:{} dropped, library {} not found.",
                    automaton.id,
                    automaton.lib
                );
                continue;
            }

            for macro_connect in &automaton.macro_connects {
                algorithm
                    .definitions
                    .declared_macro_connectors
                    .insert(macro_connect.macro_connector_id.clone());

                let Some(association) = config.association(&macro_connect.association_id) else {
                    tracing::warn!(
                        "Automaton:{} macro connector {} skipped, association {} not found.",
                        automaton.id,
                        macro_connect.macro_connector_id,
                        macro_connect.association_id
                    );
                    continue;
                };

                let pending = PendingConnection {
                    automaton,
                    macro_connector_id: &macro_connect.macro_connector_id,
                };
                algorithm.dispatch(association, pending);
            }
        }

        algorithm
    }

    fn dispatch(&mut self, association: Association<'c>, pending: PendingConnection<'c>) {
        match association {
            Association::Single(single) => match &single.target {
                SingleTarget::Bus { voltage_level_id } => self
                    .buses
                    .entry(voltage_level_id)
                    .or_default()
                    .first_node
                    .push(pending),
                SingleTarget::Line { line_id } => {
                    self.lines.entry(line_id).or_default().push(pending)
                }
                SingleTarget::Transformer { transformer_id } => self
                    .transformers
                    .entry(transformer_id)
                    .or_default()
                    .push(pending),
            },
            Association::Multiple(multiple) => match multiple.kind {
                MultipleKind::Buses => self
                    .buses
                    .entry(&multiple.voltage_level_id)
                    .or_default()
                    .every_node
                    .push(pending),
                MultipleKind::Shunts => self
                    .shunts
                    .entry(&multiple.voltage_level_id)
                    .or_default()
                    .push(pending),
            },
        }
    }

    /// Returns the definitions built from the nodes visited so far.
    pub fn definitions(&self) -> &DynamicModelDefinitions {
        &self.definitions
    }

    /// Returns the definitions, logging the macro connectors that were never
    /// bound to an element.
    pub fn into_definitions(self) -> DynamicModelDefinitions {
        for macro_connector_id in self.definitions.unused_macro_connectors() {
            tracing::warn!(
                "Macro connector {} isn't connected to any element.",
                macro_connector_id
            );
        }
        self.definitions
    }
}

fn materialize(
    definitions: &mut DynamicModelDefinitions,
    pending: &PendingConnection<'_>,
    element_type: ElementType,
    connected_element_id: &str,
) {
    definitions.insert(
        pending.automaton,
        MacroConnection {
            macro_connector_id: pending.macro_connector_id.to_string(),
            element_type,
            connected_element_id: connected_element_id.to_string(),
        },
    );
}

impl<'a, 'c> NodeVisitor<'a> for DynamicModelAlgorithm<'c> {
    fn visit(&mut self, _network: &'a Network, node: &'a Node) -> Result<(), Error> {
        let Self {
            buses,
            shunts,
            lines,
            transformers,
            definitions,
        } = self;

        if let Some(pending) = buses.get_mut(node.voltage_level_id()) {
            for connection in mem::take(&mut pending.first_node) {
                materialize(definitions, &connection, ElementType::Node, node.id());
            }
            for connection in &pending.every_node {
                materialize(definitions, connection, ElementType::Node, node.id());
            }
        }

        if let Some(pending) = shunts.get(node.voltage_level_id()) {
            for shunt in node.shunts() {
                for connection in pending {
                    materialize(definitions, connection, ElementType::Shunt, shunt.id());
                }
            }
        }

        for line_id in node.lines() {
            for connection in lines.get(line_id.as_str()).into_iter().flatten() {
                materialize(definitions, connection, ElementType::Line, line_id);
            }
        }

        for transformer_id in node.transformers() {
            for connection in transformers.get(transformer_id.as_str()).into_iter().flatten() {
                materialize(definitions, connection, ElementType::Transformer, transformer_id);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::traverse;
    use crate::automaton::{MacroConnect, MultipleAssociation, SingleAssociation};
    use crate::elements::{Branch, Line, Shunt, Transformer};
    use crate::network::test_utils::KnownLibraries;

    fn node(id: &str, voltage_level_id: &str, num_shunts: usize) -> Node {
        let shunts = (1..=num_shunts).map(|i| Shunt::new(format!("{id}.{i}")));
        Node::new(id, voltage_level_id, 400.0).with_shunts(shunts)
    }

    /// Nodes VL1 to VL6 are in voltage level "VL", and hold 15 shunts.  VL0
    /// is alone in "VLb".
    fn network() -> Result<Network, Error> {
        let nodes = vec![
            node("VL0", "VLb", 0),
            node("VL1", "VL", 1),
            node("VL2", "VL", 2),
            node("VL3", "VL", 3),
            node("VL4", "VL", 4),
            node("VL5", "VL", 5),
            node("VL6", "VL", 0),
        ];
        let branches: Vec<Branch> = vec![
            Line::new("0", "VL0", "VL1").into(),
            Line::new("1", "VL0", "VL2").into(),
            Line::new("2", "VL0", "VL3").into(),
            Line::new("3", "VL3", "VL4").into(),
            Line::new("4", "VL2", "VL4").into(),
            Line::new("5", "VL1", "VL4").into(),
            Line::new("6", "VL5", "VL6").into(),
            Transformer::new("TFO1", "VL2", "VL3").into(),
        ];
        Network::try_new(nodes, branches, [])
    }

    fn config() -> AutomatonConfig {
        AutomatonConfig::new(
            [
                DynamicAutomaton::new("MODELE_1_VL4", "libdummyLib")
                    .with_macro_connect(MacroConnect::new("ToUMeasurement", "BUS_VL"))
                    .with_macro_connect(MacroConnect::new("ToControlledShunts", "SHUNTS_VL"))
                    .with_macro_connect(MacroConnect::new("ToNothing", "UNKNOWN")),
                DynamicAutomaton::new("DM_SALON", "libdummyLib")
                    .with_macro_connect(MacroConnect::new("CLAToIMeasurement", "LINE_1"))
                    .with_macro_connect(MacroConnect::new("CLAToControlledLineState", "LINE_1"))
                    .with_macro_connect(MacroConnect::new("CLAToAutomatonActivated", "LINE_1")),
                DynamicAutomaton::new("DM_VL661", "libdummyLib")
                    .with_macro_connect(MacroConnect::new("PhaseShifterToIMeasurement", "TFO_1"))
                    .with_macro_connect(MacroConnect::new("PhaseShifterToTap", "TFO_1"))
                    .with_macro_connect(MacroConnect::new(
                        "PhaseShifterToAutomatonActivated",
                        "TFO_1",
                    )),
                DynamicAutomaton::new("DM_VLB", "libotherLib")
                    .with_macro_connect(MacroConnect::new("ToBuses", "BUSES_VLB")),
                DynamicAutomaton::new("DM_MISSING", "libmissingLib")
                    .with_macro_connect(MacroConnect::new("MissingToU", "BUS_VL")),
            ],
            [
                SingleAssociation::bus("BUS_VL", "VL"),
                SingleAssociation::line("LINE_1", "1"),
                SingleAssociation::transformer("TFO_1", "TFO1"),
            ],
            [
                MultipleAssociation::shunts("SHUNTS_VL", "VL"),
                MultipleAssociation::buses("BUSES_VLB", "VLb"),
            ],
        )
    }

    fn connections<'d>(
        definitions: &'d DynamicModelDefinitions,
        model_id: &str,
        macro_connector_id: &str,
    ) -> Vec<(ElementType, &'d str)> {
        definitions.models[model_id]
            .connections
            .iter()
            .filter(|c| c.macro_connector_id == macro_connector_id)
            .map(|c| (c.element_type, c.connected_element_id.as_str()))
            .collect()
    }

    fn resolve<'a>(
        network: &'a Network,
        config: &AutomatonConfig,
        nodes: impl IntoIterator<Item = &'a Node>,
    ) -> Result<DynamicModelDefinitions, Error> {
        let locator = KnownLibraries::new(["libdummyLib", "libotherLib"]);
        let mut algorithm = DynamicModelAlgorithm::new(config, &locator);
        traverse(network, nodes, &mut algorithm)?;
        Ok(algorithm.into_definitions())
    }

    #[test]
    fn test_connections() -> Result<(), Error> {
        let network = network()?;
        let config = config();
        let definitions = resolve(&network, &config, network.nodes())?;

        assert!(definitions
            .models
            .keys()
            .eq(["DM_SALON", "DM_VL661", "DM_VLB", "MODELE_1_VL4"]));

        // bus
        let model = &definitions.models["MODELE_1_VL4"];
        assert_eq!(model.lib, "libdummyLib");
        assert_eq!(model.connections.len(), 16);
        assert_eq!(
            connections(&definitions, "MODELE_1_VL4", "ToUMeasurement"),
            [(ElementType::Node, "VL1")]
        );
        assert_eq!(
            connections(&definitions, "MODELE_1_VL4", "ToControlledShunts").len(),
            15
        );
        assert_eq!(
            connections(&definitions, "DM_VLB", "ToBuses"),
            [(ElementType::Node, "VL0")]
        );
        assert_eq!(definitions.models["DM_VLB"].lib, "libotherLib");

        // line, seen from both of its ends.
        let model = &definitions.models["DM_SALON"];
        assert_eq!(model.connections.len(), 3);
        assert!(model
            .connections
            .iter()
            .all(|c| c.element_type == ElementType::Line && c.connected_element_id == "1"));

        // transformer
        let model = &definitions.models["DM_VL661"];
        assert_eq!(model.connections.len(), 3);
        assert_eq!(
            connections(&definitions, "DM_VL661", "PhaseShifterToIMeasurement"),
            [(ElementType::Transformer, "TFO1")]
        );

        assert!(definitions.used_macro_connectors.iter().eq([
            "CLAToAutomatonActivated",
            "CLAToControlledLineState",
            "CLAToIMeasurement",
            "PhaseShifterToAutomatonActivated",
            "PhaseShifterToIMeasurement",
            "PhaseShifterToTap",
            "ToBuses",
            "ToControlledShunts",
            "ToUMeasurement",
        ]));
        assert!(definitions.unused_macro_connectors().eq(["ToNothing"]));

        Ok(())
    }

    #[test]
    fn test_missing_library_drops_automaton() -> Result<(), Error> {
        let network = network()?;
        let config = config();
        let definitions = resolve(&network, &config, network.nodes())?;

        assert!(!definitions.models.contains_key("DM_MISSING"));
        assert!(!definitions.declared_macro_connectors.contains("MissingToU"));
        assert!(!definitions.used_macro_connectors.contains("MissingToU"));

        Ok(())
    }

    #[test]
    fn test_shunts_of_one_voltage_level() -> Result<(), Error> {
        let nodes = vec![
            node("N1", "VL4", 2),
            node("N2", "VL4", 3),
            node("N3", "VL5", 4),
        ];
        let network = Network::try_new(nodes, Vec::<Branch>::new(), [])?;
        let config = AutomatonConfig::new(
            [DynamicAutomaton::new("DM", "libdummyLib")
                .with_macro_connect(MacroConnect::new("ToShunts", "SHUNTS_VL4"))],
            [],
            [MultipleAssociation::shunts("SHUNTS_VL4", "VL4")],
        );

        let definitions = resolve(&network, &config, network.nodes())?;
        let shunts = connections(&definitions, "DM", "ToShunts");
        assert_eq!(shunts.len(), 5);
        assert!(shunts.iter().all(|(t, _)| *t == ElementType::Shunt));
        assert_eq!(
            shunts.iter().map(|(_, id)| *id).collect::<BTreeSet<_>>().len(),
            5
        );

        Ok(())
    }

    #[test]
    fn test_reruns_are_identical() -> Result<(), Error> {
        let network = network()?;
        let config = config();

        let first = resolve(&network, &config, network.nodes())?;
        let second = resolve(&network, &config, network.nodes())?;
        assert_eq!(first, second);

        // only the bus bound to the first visited node depends on the order.
        let nodes = network.nodes().collect::<Vec<_>>();
        let reversed = resolve(&network, &config, nodes.into_iter().rev())?;
        assert_eq!(
            connections(&reversed, "MODELE_1_VL4", "ToUMeasurement"),
            [(ElementType::Node, "VL6")]
        );
        for (id, model) in &first.models {
            let other = &reversed.models[id];
            let without_bus = |m: &DynamicModelDefinition| {
                m.connections
                    .iter()
                    .filter(|c| c.macro_connector_id != "ToUMeasurement")
                    .cloned()
                    .collect::<Vec<_>>()
            };
            assert_eq!(without_bus(model), without_bus(other));
        }
        assert_eq!(first.used_macro_connectors, reversed.used_macro_connectors);

        Ok(())
    }

    #[test]
    fn test_unvisited_elements_are_not_connected() -> Result<(), Error> {
        let network = network()?;
        let config = config();

        let definitions = resolve(&network, &config, [network.node("VL5")?])?;
        assert!(definitions.models.keys().eq(["MODELE_1_VL4"]));
        assert_eq!(
            connections(&definitions, "MODELE_1_VL4", "ToUMeasurement"),
            [(ElementType::Node, "VL5")]
        );
        assert_eq!(
            connections(&definitions, "MODELE_1_VL4", "ToControlledShunts").len(),
            5
        );

        Ok(())
    }
}
