// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Classification of the HVDC lines against the main connected component.

use std::collections::BTreeMap;

use crate::elements::{Converter, ConverterSide, ConverterType, HvdcLine, Node};
use crate::{Error, Network};

use super::NodeVisitor;

/// Which converters of an HVDC line are in the main connected component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HvdcPosition {
    FirstInMainComponent,
    SecondInMainComponent,
    BothInMainComponent,
}

impl HvdcPosition {
    fn of_side(side: ConverterSide) -> Self {
        match side {
            ConverterSide::First => HvdcPosition::FirstInMainComponent,
            ConverterSide::Second => HvdcPosition::SecondInMainComponent,
        }
    }

    /// Returns the position after the converter on `side` is found in the
    /// main component.
    fn with_side(self, side: ConverterSide) -> Self {
        if self == Self::of_side(side) {
            self
        } else {
            HvdcPosition::BothInMainComponent
        }
    }
}

/// An HVDC line with at least one converter in the main component.
#[derive(Clone, Debug, PartialEq)]
pub struct HvdcLineDefinition {
    pub id: String,
    pub converter_type: ConverterType,
    pub converter1: Converter,
    pub converter2: Converter,
    pub position: HvdcPosition,
}

impl HvdcLineDefinition {
    fn new(hvdc_line: &HvdcLine, side: ConverterSide) -> Self {
        Self {
            id: hvdc_line.id().to_string(),
            converter_type: hvdc_line.converter_type(),
            converter1: hvdc_line.converter(ConverterSide::First).clone(),
            converter2: hvdc_line.converter(ConverterSide::Second).clone(),
            position: HvdcPosition::of_side(side),
        }
    }
}

/// Collects the HVDC lines of the visited nodes.
///
/// Must only be given nodes of the main connected component: the position of
/// a line is derived from which of its converters have been visited.
#[derive(Debug, Default)]
pub struct HvdcLineAlgorithm {
    hvdc_lines: BTreeMap<String, HvdcLineDefinition>,
}

impl HvdcLineAlgorithm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the HVDC line definitions, by id.
    pub fn hvdc_lines(&self) -> &BTreeMap<String, HvdcLineDefinition> {
        &self.hvdc_lines
    }

    pub fn into_hvdc_lines(self) -> BTreeMap<String, HvdcLineDefinition> {
        self.hvdc_lines
    }
}

impl<'a> NodeVisitor<'a> for HvdcLineAlgorithm {
    fn visit(&mut self, network: &'a Network, node: &'a Node) -> Result<(), Error> {
        for converter_id in node.converters() {
            let (hvdc_line, side) = network.hvdc_line_of_converter(converter_id)?;
            self.hvdc_lines
                .entry(hvdc_line.id().to_string())
                .and_modify(|definition| definition.position = definition.position.with_side(side))
                .or_insert_with(|| HvdcLineDefinition::new(hvdc_line, side));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::traverse;
    use crate::network::test_utils::NetworkBuilder;

    fn network(builder: &mut NetworkBuilder) -> Result<(Network, Vec<String>), Error> {
        let nodes = builder.line_chain("VL1", 400.0, 3);
        let outside = builder.node("VL2", 400.0);
        builder
            .hvdc_line(HvdcLine::new(
                "BOTH",
                ConverterType::Vsc,
                Converter::new("B1", &nodes[0]).with_voltage_regulation(true),
                Converter::new("B2", &nodes[2]).with_voltage_regulation(false),
            ))
            .hvdc_line(HvdcLine::new(
                "FIRST",
                ConverterType::Lcc,
                Converter::new("F1", &nodes[1]),
                Converter::new("F2", &outside),
            ))
            .hvdc_line(HvdcLine::new(
                "SECOND",
                ConverterType::Lcc,
                Converter::new("S1", &outside),
                Converter::new("S2", &nodes[2]),
            ));
        Ok((builder.build()?, nodes))
    }

    fn positions(algorithm: &HvdcLineAlgorithm) -> Vec<(&str, HvdcPosition)> {
        algorithm
            .hvdc_lines()
            .values()
            .map(|d| (d.id.as_str(), d.position))
            .collect()
    }

    #[test]
    fn test_positions() -> Result<(), Error> {
        let mut builder = NetworkBuilder::new();
        let (network, main) = network(&mut builder)?;
        let main = main
            .iter()
            .map(|id| network.node(id))
            .collect::<Result<Vec<_>, _>>()?;

        let mut forward = HvdcLineAlgorithm::new();
        traverse(&network, main.iter().copied(), &mut forward)?;
        let mut backward = HvdcLineAlgorithm::new();
        traverse(&network, main.iter().rev().copied(), &mut backward)?;

        let expected = [
            ("BOTH", HvdcPosition::BothInMainComponent),
            ("FIRST", HvdcPosition::FirstInMainComponent),
            ("SECOND", HvdcPosition::SecondInMainComponent),
        ];
        assert_eq!(positions(&forward), expected);
        assert_eq!(positions(&backward), expected);
        assert_eq!(forward.hvdc_lines(), backward.hvdc_lines());

        let both = &forward.hvdc_lines()["BOTH"];
        assert_eq!(both.converter_type, ConverterType::Vsc);
        assert_eq!(both.converter1.voltage_regulation_on(), Some(true));
        assert_eq!(both.converter2.bus_id(), main[2].id());

        Ok(())
    }

    #[test]
    fn test_unvisited_lines_are_absent() -> Result<(), Error> {
        let mut builder = NetworkBuilder::new();
        let (network, main) = network(&mut builder)?;

        let mut algorithm = HvdcLineAlgorithm::new();
        traverse(&network, [network.node(&main[0])?], &mut algorithm)?;

        assert_eq!(
            positions(&algorithm),
            [("BOTH", HvdcPosition::FirstInMainComponent)]
        );

        Ok(())
    }
}
