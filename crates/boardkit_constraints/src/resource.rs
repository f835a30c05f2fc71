//! Resources: named, indexed I/O capabilities of a board.

use boardkit_common::Frequency;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::attrs::AttributeSet;
use crate::error::ConstraintError;
use crate::pin::PinExpression;

/// The identity of a resource: its kind and its index among resources of that kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResourceId {
    /// Resource kind, e.g. `"led"` or `"clk50"`.
    pub kind: String,
    /// Index within the kind, starting at 0.
    pub index: u32,
}

impl ResourceId {
    /// Creates a resource id.
    pub fn new(kind: impl Into<String>, index: u32) -> Self {
        Self {
            kind: kind.into(),
            index,
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.index)
    }
}

/// Parses `kind` (index 0) or `kind#index`.
impl FromStr for ResourceId {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = |reason: &str| ConstraintError::Format {
            token: s.to_string(),
            reason: reason.to_string(),
        };
        let (kind, index) = match s.split_once('#') {
            Some((kind, index)) => (
                kind,
                index
                    .parse()
                    .map_err(|_| bad("resource index must be a non-negative integer"))?,
            ),
            None => (s, 0),
        };
        if kind.is_empty() {
            return Err(bad("resource kind is empty"));
        }
        Ok(Self::new(kind, index))
    }
}

/// A clock constraint attached to a resource's primary pin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Clock {
    /// The oscillator frequency.
    pub frequency: Frequency,
}

impl Clock {
    /// Creates a clock constraint.
    pub fn new(frequency: Frequency) -> Self {
        Self { frequency }
    }

    /// Creates a clock constraint from a rate in Hertz.
    pub fn hz(hz: f64) -> Result<Self, ConstraintError> {
        Ok(Self::new(Frequency::from_hz(hz)?))
    }
}

/// A named sub-part of a composite resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subsignal {
    /// Subsignal name, unique within its resource.
    pub name: String,
    /// The subsignal's pins.
    pub pins: PinExpression,
    /// Attributes overriding the resource's attributes for this subsignal.
    pub attrs: AttributeSet,
}

impl Subsignal {
    /// Creates a subsignal without attributes of its own.
    pub fn new(name: impl Into<String>, pins: PinExpression) -> Self {
        Self {
            name: name.into(),
            pins,
            attrs: AttributeSet::new(),
        }
    }

    /// Returns the subsignal with `attrs` overlaid on its own attributes.
    pub fn attrs(mut self, attrs: AttributeSet) -> Self {
        self.attrs.extend_from(&attrs);
        self
    }
}

/// What a resource is made of.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceBody {
    /// A leaf resource with one pin expression.
    Pins(PinExpression),
    /// A composite resource with ordered, named subsignals.
    Subsignals(Vec<Subsignal>),
}

/// A named, indexed, physically placed I/O capability of the board.
///
/// Built with [`Resource::builder`]; immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    id: ResourceId,
    body: ResourceBody,
    attrs: AttributeSet,
    clock: Option<Clock>,
}

impl Resource {
    /// Starts building the resource `kind#index`.
    pub fn builder(kind: impl Into<String>, index: u32) -> ResourceBuilder {
        ResourceBuilder {
            id: ResourceId::new(kind, index),
            pins: None,
            subsignals: Vec::new(),
            attrs: AttributeSet::new(),
            clock: None,
        }
    }

    /// Returns the resource identity.
    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    /// Returns the resource kind.
    pub fn kind(&self) -> &str {
        &self.id.kind
    }

    /// Returns the resource index.
    pub fn index(&self) -> u32 {
        self.id.index
    }

    /// Returns the body.
    pub fn body(&self) -> &ResourceBody {
        &self.body
    }

    /// Returns the resource-level attributes.
    pub fn attrs(&self) -> &AttributeSet {
        &self.attrs
    }

    /// Returns the clock constraint, if any.
    pub fn clock(&self) -> Option<Clock> {
        self.clock
    }

    /// Iterates over every pin expression of the resource, in declaration order.
    pub fn pin_expressions(&self) -> Box<dyn Iterator<Item = &PinExpression> + '_> {
        match &self.body {
            ResourceBody::Pins(pins) => Box::new(std::iter::once(pins)),
            ResourceBody::Subsignals(subs) => Box::new(subs.iter().map(|s| &s.pins)),
        }
    }

    /// Returns every pin token of the resource, in declaration order.
    pub fn pin_tokens(&self) -> Vec<&str> {
        self.pin_expressions().flat_map(|p| p.tokens()).collect()
    }

    /// Returns the subsignal called `name`, if this is a composite resource.
    pub fn subsignal(&self, name: &str) -> Option<&Subsignal> {
        match &self.body {
            ResourceBody::Pins(_) => None,
            ResourceBody::Subsignals(subs) => subs.iter().find(|s| s.name == name),
        }
    }
}

/// Builder for a [`Resource`].
#[derive(Debug, Clone)]
pub struct ResourceBuilder {
    id: ResourceId,
    pins: Option<PinExpression>,
    subsignals: Vec<Subsignal>,
    attrs: AttributeSet,
    clock: Option<Clock>,
}

impl ResourceBuilder {
    /// Gives the resource a single pin expression, making it a leaf.
    pub fn pins(mut self, pins: PinExpression) -> Self {
        self.pins = Some(pins);
        self
    }

    /// Appends a subsignal, making the resource composite.
    pub fn subsignal(mut self, subsignal: Subsignal) -> Self {
        self.subsignals.push(subsignal);
        self
    }

    /// Overlays `attrs` onto the resource-level attributes.
    pub fn attrs(mut self, attrs: AttributeSet) -> Self {
        self.attrs.extend_from(&attrs);
        self
    }

    /// Attaches a clock constraint to the primary pin.
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Checks the body shape and produces the resource.
    ///
    /// Exactly one of pins or subsignals must have been supplied, subsignal
    /// names must be unique, and a clock may only be attached to a leaf.
    pub fn build(self) -> Result<Resource, ConstraintError> {
        let malformed = |reason: &str| ConstraintError::MalformedResource {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        let body = match (self.pins, self.subsignals.is_empty()) {
            (Some(_), false) => return Err(malformed("has both pins and subsignals")),
            (None, true) => return Err(malformed("has neither pins nor subsignals")),
            (Some(pins), true) => ResourceBody::Pins(pins),
            (None, false) => {
                for (i, sub) in self.subsignals.iter().enumerate() {
                    if self.subsignals[..i].iter().any(|s| s.name == sub.name) {
                        return Err(malformed(&format!(
                            "subsignal '{}' declared twice",
                            sub.name
                        )));
                    }
                }
                if self.clock.is_some() {
                    return Err(malformed("a clock can only be attached to a leaf resource"));
                }
                ResourceBody::Subsignals(self.subsignals)
            }
        };

        Ok(Resource {
            id: self.id,
            body,
            attrs: self.attrs,
            clock: self.clock,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::{diff_pair, pins, Direction};

    #[test]
    fn leaf_with_clock() {
        let r = Resource::builder("clk125", 0)
            .pins(diff_pair("U12", "V12", Direction::In).unwrap())
            .clock(Clock::hz(125e6).unwrap())
            .attrs(AttributeSet::io_standard("LVDS"))
            .build()
            .unwrap();
        assert_eq!(r.id(), &ResourceId::new("clk125", 0));
        assert_eq!(r.clock().unwrap().frequency.mhz(), 125.0);
        assert_eq!(r.pin_tokens(), vec!["U12", "V12"]);
        assert_eq!(r.attrs().get("io_standard"), Some("LVDS"));
    }

    #[test]
    fn composite_keeps_subsignal_order() {
        let r = Resource::builder("uart", 0)
            .subsignal(Subsignal::new("rx", pins("L9", Direction::In).unwrap()))
            .subsignal(Subsignal::new("tx", pins("M9", Direction::Out).unwrap()))
            .build()
            .unwrap();
        assert_eq!(r.pin_tokens(), vec!["L9", "M9"]);
        assert_eq!(r.subsignal("tx").unwrap().pins.dir(), Direction::Out);
        assert!(r.subsignal("rts").is_none());
    }

    #[test]
    fn both_pins_and_subsignals_is_malformed() {
        let err = Resource::builder("x", 0)
            .pins(pins("A1", Direction::In).unwrap())
            .subsignal(Subsignal::new("y", pins("A2", Direction::In).unwrap()))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConstraintError::MalformedResource { .. }));
    }

    #[test]
    fn empty_body_is_malformed() {
        let err = Resource::builder("x", 0).build().unwrap_err();
        assert!(matches!(err, ConstraintError::MalformedResource { .. }));
    }

    #[test]
    fn duplicate_subsignal_is_malformed() {
        let err = Resource::builder("x", 0)
            .subsignal(Subsignal::new("a", pins("A1", Direction::In).unwrap()))
            .subsignal(Subsignal::new("a", pins("A2", Direction::In).unwrap()))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("declared twice"));
    }

    #[test]
    fn clock_on_composite_is_malformed() {
        let err = Resource::builder("x", 0)
            .subsignal(Subsignal::new("a", pins("A1", Direction::In).unwrap()))
            .clock(Clock::hz(1e6).unwrap())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConstraintError::MalformedResource { .. }));
    }

    #[test]
    fn non_positive_clock_rejected() {
        assert!(matches!(
            Clock::hz(0.0).unwrap_err(),
            ConstraintError::Frequency(_)
        ));
    }

    #[test]
    fn resource_id_parse() {
        assert_eq!("clk50".parse::<ResourceId>().unwrap(), ResourceId::new("clk50", 0));
        assert_eq!("clk50#3".parse::<ResourceId>().unwrap(), ResourceId::new("clk50", 3));
        assert!("clk50#x".parse::<ResourceId>().is_err());
        assert!("#1".parse::<ResourceId>().is_err());
        assert_eq!(ResourceId::new("led", 2).to_string(), "led#2");
    }
}
