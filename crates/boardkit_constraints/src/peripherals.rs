//! Named-field composite generators: SD card slot, SRAM, UART, 7-segment digit.
//!
//! Each peripheral is described by a struct of optional pin lists, one field
//! per signal. The struct's `REQUIRED` set lists the fields that must be
//! present; a missing one fails with [`ConstraintError::MissingField`] and
//! nothing is registered.

use crate::attrs::AttributeSet;
use crate::error::ConstraintError;
use crate::generators::SEGMENTS;
use crate::pin::{Direction, PinExpression};
use crate::registry::RegistryBuilder;
use crate::resource::{Resource, ResourceId, Subsignal};

fn required<'a>(
    id: &ResourceId,
    field: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, ConstraintError> {
    value.ok_or_else(|| ConstraintError::MissingField {
        id: id.clone(),
        field,
    })
}

fn first_missing<'a>(
    required: &[&'static str],
    field: impl Fn(&str) -> Option<&'a str>,
) -> Option<&'static str> {
    required.iter().copied().find(|name| field(name).is_none())
}

fn subsignal(
    name: &str,
    list: &str,
    dir: Direction,
    invert: bool,
) -> Result<Subsignal, ConstraintError> {
    Ok(Subsignal::new(
        name,
        PinExpression::from_tokens(list.split_whitespace(), dir, invert)?,
    ))
}

fn register(
    registry: &mut RegistryBuilder,
    resource: Resource,
) -> Result<ResourceId, ConstraintError> {
    registry.add(resource).map(|r| r.id().clone())
}

/// Pins of an SD card slot.
///
/// `dat1`..`dat3` are all-or-none: with all of them the slot is generated as
/// `sd_card_4bit`, without any of them as `sd_card_1bit`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SdCardPins<'a> {
    /// Clock.
    pub clk: Option<&'a str>,
    /// Command line.
    pub cmd: Option<&'a str>,
    /// Data line 0.
    pub dat0: Option<&'a str>,
    /// Data line 1.
    pub dat1: Option<&'a str>,
    /// Data line 2.
    pub dat2: Option<&'a str>,
    /// Data line 3.
    pub dat3: Option<&'a str>,
    /// Card detect.
    pub cd: Option<&'a str>,
    /// Write protect.
    pub wp: Option<&'a str>,
}

impl<'a> SdCardPins<'a> {
    /// Fields that must always be present.
    pub const REQUIRED: &'static [&'static str] = &["clk", "cmd", "dat0"];

    const WIDE_DATA: &'static [&'static str] = &["dat1", "dat2", "dat3"];

    fn field(&self, name: &str) -> Option<&'a str> {
        match name {
            "clk" => self.clk,
            "cmd" => self.cmd,
            "dat0" => self.dat0,
            "dat1" => self.dat1,
            "dat2" => self.dat2,
            "dat3" => self.dat3,
            "cd" => self.cd,
            "wp" => self.wp,
            _ => None,
        }
    }

    fn is_4bit(&self) -> bool {
        Self::WIDE_DATA.iter().any(|name| self.field(name).is_some())
    }

    /// Builds the slot resource with the given index.
    pub fn resource(&self, index: u32, attrs: AttributeSet) -> Result<Resource, ConstraintError> {
        let wide = self.is_4bit();
        let kind = if wide { "sd_card_4bit" } else { "sd_card_1bit" };
        let id = ResourceId::new(kind, index);

        let mut needed = Self::REQUIRED.to_vec();
        if wide {
            needed.extend_from_slice(Self::WIDE_DATA);
        }
        if let Some(field) = first_missing(&needed, |name| self.field(name)) {
            return Err(ConstraintError::MissingField { id, field });
        }

        let mut data = vec![required(&id, "dat0", self.dat0)?];
        if wide {
            data.push(required(&id, "dat1", self.dat1)?);
            data.push(required(&id, "dat2", self.dat2)?);
            data.push(required(&id, "dat3", self.dat3)?);
        }

        let mut builder = Resource::builder(kind, index)
            .subsignal(subsignal("clk", required(&id, "clk", self.clk)?, Direction::Out, false)?)
            .subsignal(subsignal("cmd", required(&id, "cmd", self.cmd)?, Direction::InOut, false)?)
            .subsignal(subsignal("dat", &data.join(" "), Direction::InOut, false)?);
        if let Some(cd) = self.cd {
            builder = builder.subsignal(subsignal("cd", cd, Direction::In, false)?);
        }
        if let Some(wp) = self.wp {
            builder = builder.subsignal(subsignal("wp", wp, Direction::In, false)?);
        }
        builder.attrs(attrs).build()
    }

    /// Builds and registers the slot resource.
    pub fn register(
        &self,
        registry: &mut RegistryBuilder,
        index: u32,
        attrs: AttributeSet,
    ) -> Result<ResourceId, ConstraintError> {
        register(registry, self.resource(index, attrs)?)
    }
}

/// Pins of an asynchronous SRAM.
///
/// The control strobes `cs`, `oe`, `we` and `dm` are active-low.
#[derive(Debug, Clone, Copy, Default)]
pub struct SramPins<'a> {
    /// Chip select.
    pub cs: Option<&'a str>,
    /// Output enable.
    pub oe: Option<&'a str>,
    /// Write enable.
    pub we: Option<&'a str>,
    /// Address bus.
    pub a: Option<&'a str>,
    /// Data bus.
    pub d: Option<&'a str>,
    /// Byte data masks.
    pub dm: Option<&'a str>,
}

impl<'a> SramPins<'a> {
    /// Fields that must always be present.
    pub const REQUIRED: &'static [&'static str] = &["cs", "we", "a", "d"];

    fn field(&self, name: &str) -> Option<&'a str> {
        match name {
            "cs" => self.cs,
            "oe" => self.oe,
            "we" => self.we,
            "a" => self.a,
            "d" => self.d,
            "dm" => self.dm,
            _ => None,
        }
    }

    /// Builds the `sram` resource with the given index.
    pub fn resource(&self, index: u32, attrs: AttributeSet) -> Result<Resource, ConstraintError> {
        let id = ResourceId::new("sram", index);
        if let Some(field) = first_missing(Self::REQUIRED, |name| self.field(name)) {
            return Err(ConstraintError::MissingField { id, field });
        }

        let mut builder = Resource::builder("sram", index)
            .subsignal(subsignal("cs", required(&id, "cs", self.cs)?, Direction::Out, true)?);
        if let Some(oe) = self.oe {
            builder = builder.subsignal(subsignal("oe", oe, Direction::Out, true)?);
        }
        builder = builder
            .subsignal(subsignal("we", required(&id, "we", self.we)?, Direction::Out, true)?)
            .subsignal(subsignal("a", required(&id, "a", self.a)?, Direction::Out, false)?)
            .subsignal(subsignal("d", required(&id, "d", self.d)?, Direction::InOut, false)?);
        if let Some(dm) = self.dm {
            builder = builder.subsignal(subsignal("dm", dm, Direction::Out, true)?);
        }
        builder.attrs(attrs).build()
    }

    /// Builds and registers the `sram` resource.
    pub fn register(
        &self,
        registry: &mut RegistryBuilder,
        index: u32,
        attrs: AttributeSet,
    ) -> Result<ResourceId, ConstraintError> {
        register(registry, self.resource(index, attrs)?)
    }
}

/// Which end of the serial link the board is.
///
/// Decides the direction of the modem-control lines; `rx` and `tx` are always
/// named from the FPGA's point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UartRole {
    /// Data terminal equipment: drives `rts` and `dtr`.
    #[default]
    Dte,
    /// Data communication equipment: drives `cts`, `dsr`, `dcd` and `ri`.
    Dce,
}

/// Pins of a UART with optional modem-control lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct UartPins<'a> {
    /// Receive data.
    pub rx: Option<&'a str>,
    /// Transmit data.
    pub tx: Option<&'a str>,
    /// Request to send.
    pub rts: Option<&'a str>,
    /// Clear to send.
    pub cts: Option<&'a str>,
    /// Data terminal ready.
    pub dtr: Option<&'a str>,
    /// Data set ready.
    pub dsr: Option<&'a str>,
    /// Data carrier detect.
    pub dcd: Option<&'a str>,
    /// Ring indicator.
    pub ri: Option<&'a str>,
    /// Link role.
    pub role: UartRole,
}

impl<'a> UartPins<'a> {
    /// Fields that must always be present.
    pub const REQUIRED: &'static [&'static str] = &["rx", "tx"];

    fn field(&self, name: &str) -> Option<&'a str> {
        match name {
            "rx" => self.rx,
            "tx" => self.tx,
            "rts" => self.rts,
            "cts" => self.cts,
            "dtr" => self.dtr,
            "dsr" => self.dsr,
            "dcd" => self.dcd,
            "ri" => self.ri,
            _ => None,
        }
    }

    /// Builds the `uart` resource with the given index.
    pub fn resource(&self, index: u32, attrs: AttributeSet) -> Result<Resource, ConstraintError> {
        let id = ResourceId::new("uart", index);
        if let Some(field) = first_missing(Self::REQUIRED, |name| self.field(name)) {
            return Err(ConstraintError::MissingField { id, field });
        }

        let (drives, senses) = match self.role {
            UartRole::Dte => (Direction::Out, Direction::In),
            UartRole::Dce => (Direction::In, Direction::Out),
        };
        let modem = [
            ("rts", drives),
            ("cts", senses),
            ("dtr", drives),
            ("dsr", senses),
            ("dcd", senses),
            ("ri", senses),
        ];

        let mut builder = Resource::builder("uart", index)
            .subsignal(subsignal("rx", required(&id, "rx", self.rx)?, Direction::In, false)?)
            .subsignal(subsignal("tx", required(&id, "tx", self.tx)?, Direction::Out, false)?);
        for (name, dir) in modem {
            if let Some(list) = self.field(name) {
                builder = builder.subsignal(subsignal(name, list, dir, false)?);
            }
        }
        builder.attrs(attrs).build()
    }

    /// Builds and registers the `uart` resource.
    pub fn register(
        &self,
        registry: &mut RegistryBuilder,
        index: u32,
        attrs: AttributeSet,
    ) -> Result<ResourceId, ConstraintError> {
        register(registry, self.resource(index, attrs)?)
    }
}

/// Pins of one seven-segment digit.
#[derive(Debug, Clone, Copy, Default)]
pub struct Display7SegPins<'a> {
    /// Segment a.
    pub a: Option<&'a str>,
    /// Segment b.
    pub b: Option<&'a str>,
    /// Segment c.
    pub c: Option<&'a str>,
    /// Segment d.
    pub d: Option<&'a str>,
    /// Segment e.
    pub e: Option<&'a str>,
    /// Segment f.
    pub f: Option<&'a str>,
    /// Segment g.
    pub g: Option<&'a str>,
    /// Decimal point.
    pub dp: Option<&'a str>,
    /// Segments are lit by driving the pin low.
    pub invert: bool,
}

impl<'a> Display7SegPins<'a> {
    /// Fields that must always be present.
    pub const REQUIRED: &'static [&'static str] = &SEGMENTS;

    fn field(&self, name: &str) -> Option<&'a str> {
        match name {
            "a" => self.a,
            "b" => self.b,
            "c" => self.c,
            "d" => self.d,
            "e" => self.e,
            "f" => self.f,
            "g" => self.g,
            "dp" => self.dp,
            _ => None,
        }
    }

    /// Builds the `display_7seg` resource with the given index.
    pub fn resource(&self, index: u32, attrs: AttributeSet) -> Result<Resource, ConstraintError> {
        let id = ResourceId::new("display_7seg", index);
        if let Some(field) = first_missing(Self::REQUIRED, |name| self.field(name)) {
            return Err(ConstraintError::MissingField { id, field });
        }

        let mut builder = Resource::builder("display_7seg", index);
        for name in SEGMENTS.iter().chain(["dp"].iter()) {
            if let Some(list) = self.field(name) {
                builder = builder.subsignal(subsignal(name, list, Direction::Out, self.invert)?);
            }
        }
        builder.attrs(attrs).build()
    }

    /// Builds and registers the `display_7seg` resource.
    pub fn register(
        &self,
        registry: &mut RegistryBuilder,
        index: u32,
        attrs: AttributeSet,
    ) -> Result<ResourceId, ConstraintError> {
        register(registry, self.resource(index, attrs)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceBody;

    fn names(r: &Resource) -> Vec<&str> {
        match r.body() {
            ResourceBody::Subsignals(subs) => subs.iter().map(|s| s.name.as_str()).collect(),
            ResourceBody::Pins(_) => Vec::new(),
        }
    }

    #[test]
    fn sd_card_4bit() {
        let pins = SdCardPins {
            clk: Some("AB6"),
            cmd: Some("W8"),
            dat0: Some("U7"),
            dat1: Some("T7"),
            dat2: Some("V8"),
            dat3: Some("T8"),
            ..Default::default()
        };
        let r = pins.resource(0, AttributeSet::io_standard("3.3-V LVTTL")).unwrap();
        assert_eq!(r.id(), &ResourceId::new("sd_card_4bit", 0));
        assert_eq!(names(&r), vec!["clk", "cmd", "dat"]);
        assert_eq!(r.subsignal("dat").unwrap().pins.tokens(), vec!["U7", "T7", "V8", "T8"]);
    }

    #[test]
    fn sd_card_1bit_with_detect() {
        let pins = SdCardPins {
            clk: Some("A1"),
            cmd: Some("A2"),
            dat0: Some("A3"),
            cd: Some("A4"),
            ..Default::default()
        };
        let r = pins.resource(0, AttributeSet::new()).unwrap();
        assert_eq!(r.kind(), "sd_card_1bit");
        assert_eq!(names(&r), vec!["clk", "cmd", "dat", "cd"]);
        assert_eq!(r.subsignal("cd").unwrap().pins.dir(), Direction::In);
    }

    #[test]
    fn sd_card_partial_wide_data_missing() {
        let pins = SdCardPins {
            clk: Some("A1"),
            cmd: Some("A2"),
            dat0: Some("A3"),
            dat1: Some("A4"),
            dat3: Some("A6"),
            ..Default::default()
        };
        let err = pins.resource(0, AttributeSet::new()).unwrap_err();
        assert!(matches!(err, ConstraintError::MissingField { field: "dat2", .. }));
    }

    #[test]
    fn sd_card_missing_cmd_registers_nothing() {
        let mut reg = RegistryBuilder::new();
        let pins = SdCardPins {
            clk: Some("A1"),
            dat0: Some("A3"),
            ..Default::default()
        };
        let err = pins.register(&mut reg, 0, AttributeSet::new()).unwrap_err();
        assert!(matches!(err, ConstraintError::MissingField { field: "cmd", .. }));
        assert!(reg.is_empty());
    }

    #[test]
    fn sram_strobes_active_low() {
        let pins = SramPins {
            cs: Some("N23"),
            oe: Some("M22"),
            we: Some("G25"),
            a: Some("B25 B26 H19"),
            d: Some("E24 E25"),
            dm: Some("H25 M25"),
        };
        let r = pins.resource(0, AttributeSet::new()).unwrap();
        assert_eq!(names(&r), vec!["cs", "oe", "we", "a", "d", "dm"]);
        for strobe in ["cs", "oe", "we", "dm"] {
            assert!(r.subsignal(strobe).unwrap().pins.invert(), "{strobe}");
        }
        assert!(!r.subsignal("a").unwrap().pins.invert());
        assert_eq!(r.subsignal("a").unwrap().pins.width(), 3);
        assert_eq!(r.subsignal("d").unwrap().pins.dir(), Direction::InOut);
    }

    #[test]
    fn sram_optional_fields_skipped() {
        let pins = SramPins {
            cs: Some("A1"),
            we: Some("A2"),
            a: Some("A3 A4"),
            d: Some("A5"),
            ..Default::default()
        };
        let r = pins.resource(1, AttributeSet::new()).unwrap();
        assert_eq!(names(&r), vec!["cs", "we", "a", "d"]);
    }

    #[test]
    fn sram_missing_address() {
        let pins = SramPins {
            cs: Some("A1"),
            we: Some("A2"),
            d: Some("A5"),
            ..Default::default()
        };
        let err = pins.resource(0, AttributeSet::new()).unwrap_err();
        assert_eq!(err.to_string(), "sram#0: missing required field 'a'");
    }

    #[test]
    fn uart_minimal() {
        let pins = UartPins {
            rx: Some("L9"),
            tx: Some("M9"),
            ..Default::default()
        };
        let r = pins.resource(0, AttributeSet::io_standard("2.5 V")).unwrap();
        assert_eq!(names(&r), vec!["rx", "tx"]);
        assert_eq!(r.subsignal("rx").unwrap().pins.dir(), Direction::In);
        assert_eq!(r.subsignal("tx").unwrap().pins.dir(), Direction::Out);
    }

    #[test]
    fn uart_role_sets_modem_directions() {
        let dte = UartPins {
            rx: Some("A1"),
            tx: Some("A2"),
            rts: Some("A3"),
            cts: Some("A4"),
            ..Default::default()
        };
        let r = dte.resource(0, AttributeSet::new()).unwrap();
        assert_eq!(r.subsignal("rts").unwrap().pins.dir(), Direction::Out);
        assert_eq!(r.subsignal("cts").unwrap().pins.dir(), Direction::In);

        let dce = UartPins {
            role: UartRole::Dce,
            ..dte
        };
        let r = dce.resource(0, AttributeSet::new()).unwrap();
        assert_eq!(r.subsignal("rts").unwrap().pins.dir(), Direction::In);
        assert_eq!(r.subsignal("cts").unwrap().pins.dir(), Direction::Out);
    }

    #[test]
    fn uart_missing_tx() {
        let pins = UartPins {
            rx: Some("L9"),
            ..Default::default()
        };
        assert!(matches!(
            pins.resource(0, AttributeSet::new()).unwrap_err(),
            ConstraintError::MissingField { field: "tx", .. }
        ));
    }

    #[test]
    fn display_7seg_named() {
        let pins = Display7SegPins {
            a: Some("V19"),
            b: Some("V18"),
            c: Some("V17"),
            d: Some("W18"),
            e: Some("Y20"),
            f: Some("Y19"),
            g: Some("Y18"),
            invert: true,
            ..Default::default()
        };
        let r = pins.resource(0, AttributeSet::io_standard("1.2 V")).unwrap();
        assert_eq!(names(&r), SEGMENTS.to_vec());
        assert!(r.subsignal("e").unwrap().pins.invert());
        assert_eq!(r.pin_tokens().len(), 7);
    }

    #[test]
    fn display_7seg_with_dp_and_missing_segment() {
        let full = Display7SegPins {
            a: Some("A1"),
            b: Some("A2"),
            c: Some("A3"),
            d: Some("A4"),
            e: Some("A5"),
            f: Some("A6"),
            g: Some("A7"),
            dp: Some("A8"),
            invert: false,
        };
        assert_eq!(full.resource(0, AttributeSet::new()).unwrap().pin_tokens().len(), 8);

        let missing = Display7SegPins { c: None, ..full };
        assert!(matches!(
            missing.resource(0, AttributeSet::new()).unwrap_err(),
            ConstraintError::MissingField { field: "c", .. }
        ));
    }
}
