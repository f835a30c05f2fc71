//! Positional composite generators: LED arrays, buttons, switches, segment displays.
//!
//! A generator splits a flat, ordered pin list into units of a fixed arity and
//! builds one resource per unit, indexed from 0 in list order.

use log::debug;

use crate::attrs::AttributeSet;
use crate::error::ConstraintError;
use crate::pin::{Direction, PinExpression};
use crate::registry::RegistryBuilder;
use crate::resource::{Resource, ResourceId, Subsignal};

/// Segment names of a seven-segment digit, in pin order.
pub const SEGMENTS: [&str; 7] = ["a", "b", "c", "d", "e", "f", "g"];

/// How the pins of one unit become a resource body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitLayout {
    /// The unit's pins form a single pin expression (one pin or a bus).
    Pins,
    /// Each pin of the unit becomes a subsignal with the given name.
    Named(&'static [&'static str]),
}

/// Expands a pin list into same-kind resources.
#[derive(Debug, Clone)]
pub struct RepeatedResources {
    kind: String,
    arity: usize,
    dir: Direction,
    invert: bool,
    attrs: AttributeSet,
    layout: UnitLayout,
}

impl RepeatedResources {
    /// Units of `arity` pins forming one pin expression each.
    pub fn new(kind: impl Into<String>, arity: usize, dir: Direction) -> Self {
        Self {
            kind: kind.into(),
            arity,
            dir,
            invert: false,
            attrs: AttributeSet::new(),
            layout: UnitLayout::Pins,
        }
    }

    /// Units with one named subsignal per pin; the arity is the number of names.
    pub fn named(kind: impl Into<String>, names: &'static [&'static str], dir: Direction) -> Self {
        Self {
            layout: UnitLayout::Named(names),
            ..Self::new(kind, names.len(), dir)
        }
    }

    /// One output pin per LED.
    pub fn leds() -> Self {
        Self::new("led", 1, Direction::Out)
    }

    /// One input pin per push button.
    pub fn buttons() -> Self {
        Self::new("button", 1, Direction::In)
    }

    /// One input pin per slide switch.
    pub fn switches() -> Self {
        Self::new("switch", 1, Direction::In)
    }

    /// Seven output pins (segments a..g) per digit.
    pub fn display_7seg() -> Self {
        Self::named("display_7seg", &SEGMENTS, Direction::Out)
    }

    /// Marks every generated pin as active-low.
    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Attributes shared by every generated resource.
    pub fn attrs(mut self, attrs: AttributeSet) -> Self {
        self.attrs.extend_from(&attrs);
        self
    }

    /// Returns the number of pins per generated resource.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Builds the resources for `tokens` without registering them.
    pub fn expand<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<Resource>, ConstraintError> {
        if self.arity == 0 || tokens.len() % self.arity != 0 {
            return Err(ConstraintError::ArityMismatch {
                kind: self.kind.clone(),
                count: tokens.len(),
                arity: self.arity,
            });
        }

        tokens
            .chunks(self.arity)
            .enumerate()
            .map(|(index, unit)| self.unit(index as u32, unit))
            .collect()
    }

    fn unit<S: AsRef<str>>(&self, index: u32, unit: &[S]) -> Result<Resource, ConstraintError> {
        let builder = Resource::builder(self.kind.as_str(), index).attrs(self.attrs.clone());
        let builder = match self.layout {
            UnitLayout::Pins => builder.pins(PinExpression::from_tokens(
                unit.iter().map(AsRef::<str>::as_ref),
                self.dir,
                self.invert,
            )?),
            UnitLayout::Named(names) => {
                names
                    .iter()
                    .zip(unit)
                    .try_fold(builder, |builder, (name, token)| {
                        let token: &str = token.as_ref();
                        let pins = PinExpression::from_tokens([token], self.dir, self.invert)?;
                        Ok::<_, ConstraintError>(builder.subsignal(Subsignal::new(*name, pins)))
                    })?
            }
        };
        builder.build()
    }

    /// Expands a whitespace-separated pin list and registers the result, all or nothing.
    pub fn register(
        &self,
        registry: &mut RegistryBuilder,
        pins: &str,
    ) -> Result<Vec<ResourceId>, ConstraintError> {
        let tokens: Vec<&str> = pins.split_whitespace().collect();
        let resources = self.expand(&tokens[..])?;
        debug!(
            "expanding {} pins into {} {} resources",
            tokens.len(),
            resources.len(),
            self.kind
        );
        registry.add_all(resources)
    }
}

/// Registers one `led` resource per pin.
pub fn led_resources(
    registry: &mut RegistryBuilder,
    pins: &str,
    attrs: AttributeSet,
    invert: bool,
) -> Result<Vec<ResourceId>, ConstraintError> {
    RepeatedResources::leds()
        .attrs(attrs)
        .invert(invert)
        .register(registry, pins)
}

/// Registers one `button` resource per pin.
pub fn button_resources(
    registry: &mut RegistryBuilder,
    pins: &str,
    attrs: AttributeSet,
    invert: bool,
) -> Result<Vec<ResourceId>, ConstraintError> {
    RepeatedResources::buttons()
        .attrs(attrs)
        .invert(invert)
        .register(registry, pins)
}

/// Registers one `switch` resource per pin.
pub fn switch_resources(
    registry: &mut RegistryBuilder,
    pins: &str,
    attrs: AttributeSet,
    invert: bool,
) -> Result<Vec<ResourceId>, ConstraintError> {
    RepeatedResources::switches()
        .attrs(attrs)
        .invert(invert)
        .register(registry, pins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::PinShape;

    #[test]
    fn led_resources_sequential_indices() {
        let mut reg = RegistryBuilder::new();
        let attrs = AttributeSet::io_standard("2.5 V");
        let ids = led_resources(&mut reg, "A1 A2 A3", attrs.clone(), false).unwrap();
        assert_eq!(
            ids,
            vec![
                ResourceId::new("led", 0),
                ResourceId::new("led", 1),
                ResourceId::new("led", 2)
            ]
        );
        for (i, pin) in ["A1", "A2", "A3"].iter().enumerate() {
            let r = reg.get(&ResourceId::new("led", i as u32)).unwrap();
            assert_eq!(r.pin_tokens(), vec![*pin]);
            assert_eq!(r.attrs(), &attrs);
            assert_eq!(r.pin_expressions().next().unwrap().dir(), Direction::Out);
        }
    }

    #[test]
    fn buttons_inverted() {
        let mut reg = RegistryBuilder::new();
        button_resources(&mut reg, "P11 P12", AttributeSet::new(), true).unwrap();
        let r = reg.get(&ResourceId::new("button", 1)).unwrap();
        let pins = r.pin_expressions().next().unwrap();
        assert!(pins.invert());
        assert_eq!(pins.dir(), Direction::In);
    }

    #[test]
    fn units_concatenate_to_input() {
        let tokens: Vec<String> = (1..=12).map(|i| format!("A{i}")).collect();
        for arity in [1, 2, 3, 4, 6, 12] {
            let resources = RepeatedResources::new("grp", arity, Direction::Out)
                .expand(&tokens[..])
                .unwrap();
            assert_eq!(resources.len(), tokens.len() / arity);
            let concat: Vec<&str> = resources.iter().flat_map(|r| r.pin_tokens()).collect();
            assert_eq!(concat, tokens.iter().map(String::as_str).collect::<Vec<_>>());
            for (i, r) in resources.iter().enumerate() {
                assert_eq!(r.index(), i as u32);
            }
        }
    }

    #[test]
    fn multi_pin_units_are_buses() {
        let resources = RepeatedResources::new("pair", 2, Direction::Out)
            .expand(&["A1", "A2", "A3", "A4"])
            .unwrap();
        match resources[1].body() {
            crate::resource::ResourceBody::Pins(p) => {
                assert_eq!(p.shape(), &PinShape::Bus(vec!["A3".into(), "A4".into()]))
            }
            other => panic!("expected pins, got {other:?}"),
        }
    }

    #[test]
    fn arity_mismatch_registers_nothing() {
        let tokens: Vec<String> = (1..=10).map(|i| format!("B{i}")).collect();
        for arity in [3, 4, 7] {
            let mut reg = RegistryBuilder::new();
            let err = RepeatedResources::new("grp", arity, Direction::Out)
                .register(&mut reg, &tokens.join(" "))
                .unwrap_err();
            assert!(matches!(err, ConstraintError::ArityMismatch { count: 10, .. }));
            assert!(reg.is_empty());
        }
    }

    #[test]
    fn zero_arity_rejected() {
        let err = RepeatedResources::new("grp", 0, Direction::Out)
            .expand(&["A1"])
            .unwrap_err();
        assert!(matches!(err, ConstraintError::ArityMismatch { arity: 0, .. }));
    }

    #[test]
    fn display_7seg_groups() {
        let mut reg = RegistryBuilder::new();
        let ids = RepeatedResources::display_7seg()
            .invert(true)
            .register(
                &mut reg,
                "V19 V18 V17 W18 Y20 Y19 Y18 AA18 AD26 AB19 AE26 AE25 AC19 AF24",
            )
            .unwrap();
        assert_eq!(ids.len(), 2);
        let hex1 = reg.get(&ResourceId::new("display_7seg", 1)).unwrap();
        let g = hex1.subsignal("g").unwrap();
        assert_eq!(g.pins.tokens(), vec!["AF24"]);
        assert!(g.pins.invert());
    }

    #[test]
    fn display_7seg_partial_group_rejected() {
        let mut reg = RegistryBuilder::new();
        let err = RepeatedResources::display_7seg()
            .register(&mut reg, "V19 V18 V17")
            .unwrap_err();
        assert!(matches!(err, ConstraintError::ArityMismatch { arity: 7, .. }));
    }

    #[test]
    fn failed_batch_leaves_earlier_resources() {
        let mut reg = RegistryBuilder::new();
        led_resources(&mut reg, "A1", AttributeSet::new(), false).unwrap();
        let err = led_resources(&mut reg, "A2 A3", AttributeSet::new(), false).unwrap_err();
        assert!(matches!(err, ConstraintError::DuplicateResource(_)));
        assert_eq!(reg.len(), 1);
    }
}
