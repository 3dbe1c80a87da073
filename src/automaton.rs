// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The configuration of the dynamic automatons to attach to a network.
//!
//! An automaton is backed by a simulation library and exposes macro
//! connectors.  Each macro connector names an association, which selects the
//! network elements the connector must be bound to:
//!
//! - a [`SingleAssociation`] targets one element: the bus of a voltage
//!   level, a line or a transformer.
//! - a [`MultipleAssociation`] targets every bus, or every shunt, of a
//!   voltage level.

use std::collections::BTreeMap;

/// A macro connector of an automaton, and the id of the association that
/// selects what it gets connected to.
#[derive(Clone, Debug, PartialEq)]
pub struct MacroConnect {
    pub macro_connector_id: String,
    pub association_id: String,
}

impl MacroConnect {
    pub fn new(macro_connector_id: impl Into<String>, association_id: impl Into<String>) -> Self {
        Self {
            macro_connector_id: macro_connector_id.into(),
            association_id: association_id.into(),
        }
    }
}

/// A dynamic automaton template.
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicAutomaton {
    pub id: String,
    /// Name of the library implementing the automaton.
    pub lib: String,
    pub macro_connects: Vec<MacroConnect>,
}

impl DynamicAutomaton {
    pub fn new(id: impl Into<String>, lib: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            lib: lib.into(),
            macro_connects: vec![],
        }
    }

    pub fn with_macro_connect(mut self, macro_connect: MacroConnect) -> Self {
        self.macro_connects.push(macro_connect);
        self
    }
}

/// The element targeted by a [`SingleAssociation`].
#[derive(Clone, Debug, PartialEq)]
pub enum SingleTarget {
    /// The bus of the voltage level with the given id.  Only the first node
    /// of the voltage level that gets resolved is connected.
    Bus { voltage_level_id: String },
    Line { line_id: String },
    Transformer { transformer_id: String },
}

/// An association to a single network element.
#[derive(Clone, Debug, PartialEq)]
pub struct SingleAssociation {
    pub id: String,
    pub target: SingleTarget,
}

impl SingleAssociation {
    pub fn bus(id: impl Into<String>, voltage_level_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            target: SingleTarget::Bus {
                voltage_level_id: voltage_level_id.into(),
            },
        }
    }

    pub fn line(id: impl Into<String>, line_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            target: SingleTarget::Line {
                line_id: line_id.into(),
            },
        }
    }

    pub fn transformer(id: impl Into<String>, transformer_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            target: SingleTarget::Transformer {
                transformer_id: transformer_id.into(),
            },
        }
    }
}

/// The kind of elements selected by a [`MultipleAssociation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MultipleKind {
    Buses,
    Shunts,
}

/// An association to all the elements of a kind in a voltage level.
#[derive(Clone, Debug, PartialEq)]
pub struct MultipleAssociation {
    pub id: String,
    pub voltage_level_id: String,
    pub kind: MultipleKind,
}

impl MultipleAssociation {
    pub fn buses(id: impl Into<String>, voltage_level_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            voltage_level_id: voltage_level_id.into(),
            kind: MultipleKind::Buses,
        }
    }

    pub fn shunts(id: impl Into<String>, voltage_level_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            voltage_level_id: voltage_level_id.into(),
            kind: MultipleKind::Shunts,
        }
    }
}

/// Either kind of association.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Association<'a> {
    Single(&'a SingleAssociation),
    Multiple(&'a MultipleAssociation),
}

/// The automatons and associations, indexed by id.
#[derive(Clone, Debug, Default)]
pub struct AutomatonConfig {
    automatons: BTreeMap<String, DynamicAutomaton>,
    single_associations: BTreeMap<String, SingleAssociation>,
    multiple_associations: BTreeMap<String, MultipleAssociation>,
}

impl AutomatonConfig {
    /// Creates a new [`AutomatonConfig`].
    ///
    /// When ids are duplicated, the first definition is kept and the others
    /// are logged and ignored.
    pub fn new(
        automatons: impl IntoIterator<Item = DynamicAutomaton>,
        single_associations: impl IntoIterator<Item = SingleAssociation>,
        multiple_associations: impl IntoIterator<Item = MultipleAssociation>,
    ) -> Self {
        Self {
            automatons: index_by_id("automaton", automatons, |a| &a.id),
            single_associations: index_by_id("association", single_associations, |a| &a.id),
            multiple_associations: index_by_id("association", multiple_associations, |a| &a.id),
        }
    }

    /// Returns the automatons, ordered by id.
    pub fn automatons(&self) -> impl Iterator<Item = &DynamicAutomaton> {
        self.automatons.values()
    }

    pub fn automaton(&self, id: &str) -> Option<&DynamicAutomaton> {
        self.automatons.get(id)
    }

    /// Returns the association with the given id.  Single associations take
    /// precedence over multiple associations with the same id.
    pub(crate) fn association(&self, id: &str) -> Option<Association<'_>> {
        self.single_associations
            .get(id)
            .map(Association::Single)
            .or_else(|| self.multiple_associations.get(id).map(Association::Multiple))
    }
}

fn index_by_id<T>(
    what: &str,
    items: impl IntoIterator<Item = T>,
    id: impl Fn(&T) -> &String,
) -> BTreeMap<String, T> {
    let mut map = BTreeMap::new();
    for item in items {
        let key = id(&item).clone();
        if map.contains_key(&key) {
            tracing::warn!("Duplicate {} id {} ignored.", what, key);
            continue;
        }
        map.insert(key, item);
    }
    map
}
