// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

/*!
# Dynamic Setup Graph

This is a library for preparing the dynamic simulation of a transmission
network.  From the topology of the network and the configuration of the
dynamic automatons to attach to it, it derives the definitions that the
writers of the simulation input files need: the generator models, the loads,
the HVDC lines, the dynamic models and their connections, the main connected
component and the slack node.

## The `Network`

The main struct is [`Network`], instances of which can be created by passing
the nodes, the branches and the HVDC lines of the network to the
[`try_new`][Network::try_new] method.  Elements reference each other by id,
and the method checks that:

- Element ids of each kind are unique.
- All branches and converters reference existing nodes.
- All generators regulate existing buses.

If any of the checks fail, the method will return an [`Error`], and a
[`Network`] instance otherwise.

## Algorithms

Each of the [`algorithms`] is a [`NodeVisitor`][algorithms::NodeVisitor]
that is given the nodes of the network one at a time.  Algorithms can be
grouped in tuples and run together with a single
[`traverse`][algorithms::traverse].

The [`resolve`] function runs all of them: it searches for the main
connected component first, and runs the other algorithms over its nodes.
Data issues, like an invalid reactive capability diagram or a missing
automaton library, are logged as warnings with `tracing` and worked around.
*/

pub mod algorithms;

mod automaton;
pub use automaton::{
    AutomatonConfig, DynamicAutomaton, MacroConnect, MultipleAssociation, MultipleKind,
    SingleAssociation, SingleTarget,
};

mod config;
pub use config::ResolverConfig;

mod elements;
pub use elements::{
    Branch, Converter, ConverterSide, ConverterType, Generator, HvdcLine, Line, Load, Node,
    ReactiveCurvePoint, Shunt, Switch, Transformer, VoltageLevel,
};

mod error;
pub use error::Error;

mod network;
pub use network::{iterators, Network};

mod resolution;
pub use resolution::{resolve, Resolution};
