// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Algorithms that walk the nodes of a [`Network`] to build the definitions
//! needed for a dynamic simulation.
//!
//! Every algorithm is a [`NodeVisitor`]: it is given the nodes one at a time
//! and accumulates its result, which is read once the traversal is done.
//! Algorithms are composed by grouping them in a tuple, so that a single
//! [`traverse`] runs all of them.

mod dynamic_models;
mod generators;
mod hvdc_lines;
mod library;
mod loads;
mod main_component;
mod shunt_counter;
mod slack_node;

pub use dynamic_models::{
    DynamicModelAlgorithm, DynamicModelDefinition, DynamicModelDefinitions, ElementType,
    MacroConnection,
};
pub use generators::{
    BusGeneratorMap, GeneratorDefinition, GeneratorDefinitionAlgorithm, ModelType, Regulation,
};
pub use hvdc_lines::{HvdcLineAlgorithm, HvdcLineDefinition, HvdcPosition};
pub use library::{FsLibraryLocator, LibraryLocator};
pub use loads::{LoadDefinition, LoadDefinitionAlgorithm};
pub use main_component::MainComponentAlgorithm;
pub use shunt_counter::ShuntCounterAlgorithm;
pub use slack_node::SlackNodeAlgorithm;

use crate::elements::Node;
use crate::{Error, Network};

/// Tolerance used when comparing nominal voltages, in kV.
pub(crate) const VOLTAGE_EPSILON: f64 = 1e-6;

/// An algorithm to perform on each node of a network.
///
/// `'a` is the lifetime of the network, so that visitors can keep references
/// to the nodes they are given.
pub trait NodeVisitor<'a> {
    /// Performs the elementary step of the algorithm on the given node.
    ///
    /// Errors are only returned when the network doesn't hold its own
    /// invariants, data issues are logged and worked around.
    fn visit(&mut self, network: &'a Network, node: &'a Node) -> Result<(), Error>;
}

impl<'a, V> NodeVisitor<'a> for &mut V
where
    V: NodeVisitor<'a> + ?Sized,
{
    fn visit(&mut self, network: &'a Network, node: &'a Node) -> Result<(), Error> {
        (**self).visit(network, node)
    }
}

/// Implements `NodeVisitor` for tuples of visitors.  Members are run in
/// order on each node.
macro_rules! impl_node_visitor_for_tuples {
    ($(
        ($($visitor:ident),+)
    ),*) => {
        $(
            impl<'a, $($visitor),+> NodeVisitor<'a> for ($($visitor,)+)
            where
                $($visitor: NodeVisitor<'a>,)+
            {
                #[allow(non_snake_case)]
                fn visit(&mut self, network: &'a Network, node: &'a Node) -> Result<(), Error> {
                    let ($($visitor,)+) = self;
                    $(
                        $visitor.visit(network, node)?;
                    )+
                    Ok(())
                }
            }
        )*
    };
}

impl_node_visitor_for_tuples!(
    (A),
    (A, B),
    (A, B, C),
    (A, B, C, D),
    (A, B, C, D, E),
    (A, B, C, D, E, F),
    (A, B, C, D, E, F, G),
    (A, B, C, D, E, F, G, H)
);

/// Runs the given visitor on every node of `nodes`, in order.
///
/// The first error stops the traversal.
pub fn traverse<'a, V>(
    network: &'a Network,
    nodes: impl IntoIterator<Item = &'a Node>,
    visitor: &mut V,
) -> Result<(), Error>
where
    V: NodeVisitor<'a> + ?Sized,
{
    for node in nodes {
        visitor.visit(network, node)?;
    }
    Ok(())
}
