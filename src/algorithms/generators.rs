// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Resolution of the control model of each generator.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Display;

use crate::elements::{Generator, Node, ReactiveCurvePoint};
use crate::{Error, Network};

use super::NodeVisitor;

/// How a generator takes part in the voltage regulation of its bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Regulation {
    /// The generator regulates the voltage of its own node.
    Local,
    /// The generator regulates the voltage of another node.
    Remote,
    /// The regulated bus is shared with other generators, and the reactive
    /// power is split between them.
    Proportional,
}

/// The generator model to instantiate in the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelType {
    SignalN,
    DiagramPqSignalN,
    RemoteSignalN,
    RemoteDiagramPqSignalN,
    PropSignalN,
    PropDiagramPqSignalN,
}

impl ModelType {
    pub fn new(regulation: Regulation, use_diagram: bool) -> Self {
        match (regulation, use_diagram) {
            (Regulation::Local, false) => ModelType::SignalN,
            (Regulation::Local, true) => ModelType::DiagramPqSignalN,
            (Regulation::Remote, false) => ModelType::RemoteSignalN,
            (Regulation::Remote, true) => ModelType::RemoteDiagramPqSignalN,
            (Regulation::Proportional, false) => ModelType::PropSignalN,
            (Regulation::Proportional, true) => ModelType::PropDiagramPqSignalN,
        }
    }

    /// Returns true if the model uses the reactive capability diagram of the
    /// generator.
    pub fn uses_diagram(&self) -> bool {
        matches!(
            self,
            ModelType::DiagramPqSignalN
                | ModelType::RemoteDiagramPqSignalN
                | ModelType::PropDiagramPqSignalN
        )
    }

    pub fn regulation(&self) -> Regulation {
        match self {
            ModelType::SignalN | ModelType::DiagramPqSignalN => Regulation::Local,
            ModelType::RemoteSignalN | ModelType::RemoteDiagramPqSignalN => Regulation::Remote,
            ModelType::PropSignalN | ModelType::PropDiagramPqSignalN => Regulation::Proportional,
        }
    }
}

/// Formats the name of the model in the simulation engine's libraries.
impl Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelType::SignalN => write!(f, "GeneratorPVSignalN"),
            ModelType::DiagramPqSignalN => write!(f, "GeneratorPVDiagramPQSignalN"),
            ModelType::RemoteSignalN => write!(f, "GeneratorPVRemoteSignalN"),
            ModelType::RemoteDiagramPqSignalN => write!(f, "GeneratorPVRemoteDiagramPQSignalN"),
            ModelType::PropSignalN => write!(f, "GeneratorPQPropSignalN"),
            ModelType::PropDiagramPqSignalN => write!(f, "GeneratorPQPropDiagramPQSignalN"),
        }
    }
}

/// The resolved definition of a generator.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorDefinition {
    pub id: String,
    pub model: ModelType,
    pub node_id: String,
    pub points: Vec<ReactiveCurvePoint>,
    pub qmin: f64,
    pub qmax: f64,
    pub pmin: f64,
    pub pmax: f64,
    pub target_p: f64,
    pub regulated_bus_id: String,
    /// Whether the node of the generator is connected to the node of
    /// another generator through closed switches.
    pub coupled_by_switches: bool,
}

/// Maps the id of a bus regulated by several generators to the id of the
/// first of those generators that was resolved.
pub type BusGeneratorMap = BTreeMap<String, String>;

/// Resolves the model of every generator of the visited nodes.
///
/// Generators are never dropped: data that doesn't support a diagram model
/// falls back to the signal only model of the same regulation.
#[derive(Debug, Default)]
pub struct GeneratorDefinitionAlgorithm {
    infinite_reactive_limits: bool,
    generators: Vec<GeneratorDefinition>,
    buses_with_dynamic_model: BusGeneratorMap,
}

impl GeneratorDefinitionAlgorithm {
    /// Creates a new `GeneratorDefinitionAlgorithm`.  When
    /// `infinite_reactive_limits` is set, no diagram model is ever selected.
    pub fn new(infinite_reactive_limits: bool) -> Self {
        Self {
            infinite_reactive_limits,
            ..Default::default()
        }
    }

    /// Returns the generator definitions, in the order they were resolved.
    pub fn generators(&self) -> &[GeneratorDefinition] {
        &self.generators
    }

    /// Returns the buses that need a dynamic model to share their reactive
    /// power between generators.
    pub fn buses_with_dynamic_model(&self) -> &BusGeneratorMap {
        &self.buses_with_dynamic_model
    }

    pub fn into_parts(self) -> (Vec<GeneratorDefinition>, BusGeneratorMap) {
        (self.generators, self.buses_with_dynamic_model)
    }

    /// Checks if the reactive capability diagram of the generator is usable.
    ///
    /// Without curve points, the diagram is the rectangle given by the P and
    /// Q limits.  With curve points, there must be at least two of them, with
    /// strictly increasing active power and a non degenerate reactive range.
    pub fn is_diagram_valid(generator: &Generator) -> bool {
        let points = generator.points();
        if points.is_empty() {
            let valid = is_below(generator.pmin(), generator.pmax())
                && is_below(generator.qmin(), generator.qmax());
            if valid {
                return true;
            }
            if !Self::has_limits(generator) {
                tracing::debug!("Generator:{} has no diagram data.", generator.id());
            } else {
                tracing::warn!(
                    "Generator:{} has an invalid diagram: pmin={}, pmax={}, qmin={}, qmax={}.",
                    generator.id(),
                    generator.pmin(),
                    generator.pmax(),
                    generator.qmin(),
                    generator.qmax()
                );
            }
            return false;
        }

        if points.len() < 2 {
            tracing::warn!(
                "Generator:{} has an invalid diagram: a single point is given.",
                generator.id()
            );
            return false;
        }

        if let Some(point) = points.iter().find(|p| !is_below(p.qmin, p.qmax)) {
            tracing::warn!(
                "Generator:{} has an invalid diagram: qmin={} isn't below qmax={} at p={}.",
                generator.id(),
                point.qmin,
                point.qmax,
                point.p
            );
            return false;
        }

        if let Some(pair) = points.windows(2).find(|pair| !is_below(pair[0].p, pair[1].p)) {
            tracing::warn!(
                "Generator:{} has an invalid diagram: p={} is followed by p={}.",
                generator.id(),
                pair[0].p,
                pair[1].p
            );
            return false;
        }

        true
    }

    /// Returns true if any of the P and Q limits of the generator is set.
    fn has_limits(generator: &Generator) -> bool {
        [
            generator.pmin(),
            generator.pmax(),
            generator.qmin(),
            generator.qmax(),
        ]
        .iter()
        .any(|limit| *limit != 0.0)
    }

    fn regulation(network: &Network, generator: &Generator) -> Regulation {
        if network.regulating_generator_count(generator.regulated_bus_id()) > 1 {
            Regulation::Proportional
        } else if generator.regulates_remotely() {
            Regulation::Remote
        } else {
            Regulation::Local
        }
    }
}

/// Returns true if `a` is strictly below `b`.  NaN is never below anything.
fn is_below(a: f64, b: f64) -> bool {
    a.partial_cmp(&b) == Some(Ordering::Less)
}

impl<'a> NodeVisitor<'a> for GeneratorDefinitionAlgorithm {
    fn visit(&mut self, network: &'a Network, node: &'a Node) -> Result<(), Error> {
        if node.generators().is_empty() {
            return Ok(());
        }

        let coupled_by_switches = network
            .find_through_closed_switches(node.id(), |other| !other.generators().is_empty())?
            .is_some();

        for generator in node.generators() {
            let regulation = Self::regulation(network, generator);
            let use_diagram = !self.infinite_reactive_limits && Self::is_diagram_valid(generator);

            if regulation == Regulation::Proportional {
                self.buses_with_dynamic_model
                    .entry(generator.regulated_bus_id().to_string())
                    .or_insert_with(|| generator.id().to_string());
            }

            self.generators.push(GeneratorDefinition {
                id: generator.id().to_string(),
                model: ModelType::new(regulation, use_diagram),
                node_id: node.id().to_string(),
                points: generator.points().to_vec(),
                qmin: generator.qmin(),
                qmax: generator.qmax(),
                pmin: generator.pmin(),
                pmax: generator.pmax(),
                target_p: generator.target_p(),
                regulated_bus_id: generator.regulated_bus_id().to_string(),
                coupled_by_switches,
            });
        }

        Ok(())
    }
}
