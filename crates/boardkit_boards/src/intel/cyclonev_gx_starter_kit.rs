//! Terasic Cyclone V GX Starter Kit.
//!
//! Carries a 5CGXFC5C6F27C7 (77K LEs, FBGA-672). Designs are clocked from
//! the 50 MHz oscillator on bank 5B and reset from KEY4 (`CPU_RESET_n`).
//!
//! Not modelled: the ADC, the Si5338 programmable clocks and reference
//! clocks, DDR2LP, GPIO/Arduino headers, HSMC and SMA. HEX2 and HEX3 share
//! pins with the GPIO header behind DIP switches S1/S2; with GPIO absent
//! they are declared unconditionally.

use boardkit_constraints::{
    button_resources, diff_pair, led_resources, pins, pins_n, switch_resources, AttributeSet,
    BgaGrid, Clock, ConstraintError, DeviceIdentity, Direction, Display7SegPins, Platform,
    PlatformSpec, RegistryBuilder, Resource, ResourceId, SdCardPins, SramPins, Subsignal,
    Toolchain, UartPins,
};
use boardkit_program::QuartusProgrammer;

/// Catalogue name of the board.
pub const NAME: &str = "cyclonev_gx_starter_kit";

const LVTTL_3V3: &str = "3.3-V LVTTL";
const V2_5: &str = "2.5 V";
const V1_2: &str = "1.2 V";

fn io(standard: &str) -> AttributeSet {
    AttributeSet::io_standard(standard)
}

fn sub(name: &str, list: &str, dir: Direction) -> Result<Subsignal, ConstraintError> {
    Ok(Subsignal::new(name, pins(list, dir)?))
}

/// Returns the FPGA on the board.
pub fn device() -> DeviceIdentity {
    DeviceIdentity::new("5CGXFC5", "C6F27", "C7")
}

/// Returns the board facts besides its resources.
pub fn spec() -> PlatformSpec {
    PlatformSpec {
        name: NAME.to_string(),
        device: device(),
        default_clk: ResourceId::new("clk50", 0),
        default_rst: ResourceId::new("rst", 0),
        default_attrs: AttributeSet::new(),
    }
}

fn clocks(reg: &mut RegistryBuilder) -> Result<(), ConstraintError> {
    // CLOCK_125_p/n
    reg.add(
        Resource::builder("clk125", 0)
            .pins(diff_pair("U12", "V12", Direction::In)?)
            .clock(Clock::hz(125e6)?)
            .attrs(io("LVDS"))
            .build()?,
    )?;

    // CLOCK_50_B5B and CLOCK_50_B6A come from the Si501, B7A and B8A from the Si5338.
    let clk50 = [("R20", LVTTL_3V3), ("N20", LVTTL_3V3), ("H12", V2_5), ("M10", V2_5)];
    for (index, (pin, standard)) in (0u32..).zip(clk50) {
        reg.add(
            Resource::builder("clk50", index)
                .pins(pins(pin, Direction::In)?)
                .clock(Clock::hz(50e6)?)
                .attrs(io(standard))
                .build()?,
        )?;
    }
    Ok(())
}

fn user_io(reg: &mut RegistryBuilder) -> Result<(), ConstraintError> {
    // LEDG0..LEDG7, LEDR0..LEDR9
    led_resources(
        reg,
        "L7 K6 D8 E9 A5 B6 H8 H9 F7 F6 G6 G7 J8 J7 K10 K8 H7 J10",
        io(V2_5),
        false,
    )?;

    // KEY0..KEY3, debounced
    button_resources(reg, "P11 P12 Y15 Y16", io(V1_2), true)?;

    // KEY4 / CPU_RESET_n
    reg.add(
        Resource::builder("rst", 0)
            .pins(pins_n("AB24", Direction::In)?)
            .attrs(io(LVTTL_3V3))
            .build()?,
    )?;

    // SW0..SW9
    switch_resources(
        reg,
        "AC9 AE10 AD13 AC8 W11 AB10 V10 AC10 Y11 AE19",
        io(V1_2),
        false,
    )?;
    Ok(())
}

fn hdmi(reg: &mut RegistryBuilder) -> Result<(), ConstraintError> {
    // RGB24 input format: HDMI_TX_D0..7 red, 8..15 green, 16..23 blue.
    reg.add(
        Resource::builder("adv7513", 0)
            .subsignal(sub("tx_d_r", "V23 AA26 W25 W26 V24 V25 U24 T23", Direction::Out)?)
            .subsignal(sub("tx_d_g", "T24 T26 R23 R25 P22 P23 N25 P26", Direction::Out)?)
            .subsignal(sub("tx_d_b", "P21 R24 R26 AB26 AA24 AB25 AC25 AD25", Direction::Out)?)
            .subsignal(sub("tx_clk", "Y25", Direction::Out)?)
            .subsignal(sub("tx_de", "Y26", Direction::Out)?)
            .subsignal(sub("tx_hs", "U26", Direction::Out)?)
            .subsignal(sub("tx_vs", "U25", Direction::Out)?)
            .subsignal(sub("tx_int", "T12", Direction::In)?.attrs(io(V1_2)))
            .attrs(io(LVTTL_3V3))
            .build()?,
    )?;
    Ok(())
}

fn i2c(reg: &mut RegistryBuilder) -> Result<(), ConstraintError> {
    // Shared by the ADV7513 and the SSM2603.
    reg.add(
        Resource::builder("i2c", 0)
            .subsignal(sub("scl", "B7", Direction::Out)?)
            .subsignal(sub("sda", "G11", Direction::InOut)?)
            .attrs(io(V2_5))
            .build()?,
    )?;
    Ok(())
}

fn memory(reg: &mut RegistryBuilder) -> Result<(), ConstraintError> {
    SdCardPins {
        clk: Some("AB6"),
        cmd: Some("W8"),
        dat0: Some("U7"),
        dat1: Some("T7"),
        dat2: Some("V8"),
        dat3: Some("T8"),
        ..Default::default()
    }
    .register(reg, 0, io(LVTTL_3V3))?;

    SramPins {
        cs: Some("N23"),
        oe: Some("M22"),
        we: Some("G25"),
        a: Some("B25 B26 H19 H20 D25 C25 J20 J21 D22 E23 G20 F21 E21 F22 J25 J26 N24 M24"),
        d: Some("E24 E25 K24 K23 F24 G24 L23 L24 H23 H24 H22 J23 F23 G22 L22 K21"),
        dm: Some("H25 M25"),
    }
    .register(reg, 0, io(LVTTL_3V3))?;
    Ok(())
}

fn serial_and_audio(reg: &mut RegistryBuilder) -> Result<(), ConstraintError> {
    UartPins {
        rx: Some("L9"),
        tx: Some("M9"),
        ..Default::default()
    }
    .register(reg, 0, io(V2_5))?;

    reg.add(
        Resource::builder("ssm2603", 0)
            .subsignal(sub("adclrck", "C7", Direction::InOut)?)
            .subsignal(sub("adcdat", "D7", Direction::In)?)
            .subsignal(sub("daclrck", "G10", Direction::InOut)?)
            .subsignal(sub("dacdat", "H10", Direction::Out)?)
            .subsignal(sub("xck", "D6", Direction::Out)?)
            .subsignal(sub("bclk", "E6", Direction::InOut)?)
            .attrs(io(V2_5))
            .build()?,
    )?;
    Ok(())
}

fn displays(reg: &mut RegistryBuilder) -> Result<(), ConstraintError> {
    let digits: [([&str; 7], &str); 4] = [
        (["V19", "V18", "V17", "W18", "Y20", "Y19", "Y18"], V1_2),
        (["AA18", "AD26", "AB19", "AE26", "AE25", "AC19", "AF24"], V1_2),
        (["AD7", "AD6", "U20", "V22", "V20", "W21", "W20"], LVTTL_3V3),
        (["Y24", "Y23", "AA23", "AA22", "AC24", "AC23", "AC22"], LVTTL_3V3),
    ];
    for (index, ([a, b, c, d, e, f, g], standard)) in (0u32..).zip(digits) {
        Display7SegPins {
            a: Some(a),
            b: Some(b),
            c: Some(c),
            d: Some(d),
            e: Some(e),
            f: Some(f),
            g: Some(g),
            dp: None,
            invert: true,
        }
        .register(reg, index, io(standard))?;
    }
    Ok(())
}

/// Assembles the board's resources into a fresh registry.
pub fn registry() -> Result<RegistryBuilder, ConstraintError> {
    let mut reg = RegistryBuilder::with_grammar(Box::new(BgaGrid));
    clocks(&mut reg)?;
    user_io(&mut reg)?;
    hdmi(&mut reg)?;
    i2c(&mut reg)?;
    memory(&mut reg)?;
    serial_and_audio(&mut reg)?;
    displays(&mut reg)?;
    Ok(reg)
}

/// Builds the platform, programming it with `toolchain`.
pub fn platform_with(toolchain: Box<dyn Toolchain>) -> Result<Platform, ConstraintError> {
    Platform::new(spec(), registry()?, toolchain)
}

/// Builds the platform with the Quartus programmer.
pub fn platform() -> Result<Platform, ConstraintError> {
    platform_with(Box::new(QuartusProgrammer::new()))
}
