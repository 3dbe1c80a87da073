// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the configuration options for a resolution run.

/// Configuration options for [`resolve`][crate::resolve].
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Whether the generators are simulated with infinite reactive limits.
    /// When this is `true`, diagram based generator models are never used,
    /// whatever the reactive capability data of the generators.
    pub infinite_reactive_limits: bool,

    /// Minimum nominal voltage (kV) of a node for its loads to be part of
    /// the load definitions.  Loads on nodes below this level are left to
    /// the default behaviour of the simulation engine.
    pub dso_voltage_level: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            infinite_reactive_limits: false,
            dso_voltage_level: 45.0,
        }
    }
}
