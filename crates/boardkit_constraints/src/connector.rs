//! Board connectors: labelled pin headers mapped onto physical pins.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::ConstraintError;

/// A named, numbered connector mapping its pin labels to physical pins.
///
/// Resources address connector pins with tokens of the form
/// `<name>_<number>:<label>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connector {
    name: String,
    number: u32,
    pins: BTreeMap<String, String>,
}

impl Connector {
    /// Creates a connector from explicit `(label, physical pin)` pairs.
    pub fn new<I, L, P>(
        name: impl Into<String>,
        number: u32,
        pins: I,
    ) -> Result<Self, ConstraintError>
    where
        I: IntoIterator<Item = (L, P)>,
        L: Into<String>,
        P: Into<String>,
    {
        let name = name.into();
        let mut map = BTreeMap::new();
        for (label, pin) in pins {
            let (label, pin) = (label.into(), pin.into());
            if map.insert(label.clone(), pin).is_some() {
                return Err(ConstraintError::Format {
                    token: format!("{name}_{number}:{label}"),
                    reason: "connector label declared twice".to_string(),
                });
            }
        }
        Ok(Self {
            name,
            number,
            pins: map,
        })
    }

    /// Creates a connector from a whitespace-separated pin list.
    ///
    /// Positions are labelled `1`, `2`, ... in order; a `-` marks a position
    /// with no FPGA pin (power, ground) and produces no label.
    pub fn from_list(
        name: impl Into<String>,
        number: u32,
        list: &str,
    ) -> Result<Self, ConstraintError> {
        let pins = list
            .split_whitespace()
            .enumerate()
            .filter(|(_, pin)| *pin != "-")
            .map(|(i, pin)| ((i + 1).to_string(), pin));
        Self::new(name, number, pins)
    }

    /// Returns the connector name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the connector number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Returns the physical pin behind `label`.
    pub fn resolve(&self, label: &str) -> Option<&str> {
        self.pins.get(label).map(String::as_str)
    }

    /// Iterates over `(label, physical pin)` pairs.
    pub fn pins(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pins.iter().map(|(l, p)| (l.as_str(), p.as_str()))
    }
}
