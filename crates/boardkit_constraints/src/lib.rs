//! Board resource and pin constraint model for boardkit.
//!
//! A board definition is assembled into a [`RegistryBuilder`]: resources are
//! built from [`PinExpression`]s and [`AttributeSet`]s, either one at a time
//! or in bulk with the composite generators, and connectors map header labels
//! onto physical pins. [`Platform::new`] then checks the whole set for
//! physical pin conflicts, resolves the default clock and reset, and yields a
//! read-only model that a [`SynthesisBackend`] consumes and a [`Toolchain`]
//! programs.
//!
//! ```
//! use boardkit_constraints::{led_resources, AttributeSet, RegistryBuilder, ResourceId};
//!
//! let mut registry = RegistryBuilder::new();
//! led_resources(&mut registry, "A1 A2 A3", AttributeSet::io_standard("2.5 V"), false).unwrap();
//! assert!(registry.contains(&ResourceId::new("led", 2)));
//! assert!(registry.validate().is_ok());
//! ```
//!
//! Every error is raised eagerly at definition time; only [`ProgramError`]
//! waits for an explicit program request.

#![warn(missing_docs)]

pub mod attrs;
pub mod connector;
pub mod error;
pub mod generators;
pub mod peripherals;
pub mod pin;
pub mod platform;
pub mod products;
pub mod registry;
pub mod resource;
pub mod validate;

pub use attrs::AttributeSet;
pub use connector::Connector;
pub use error::{BuildError, ConstraintError, ProcessError, ProgramError};
pub use generators::{button_resources, led_resources, switch_resources, RepeatedResources};
pub use peripherals::{Display7SegPins, SdCardPins, SramPins, UartPins, UartRole};
pub use pin::{
    diff_pair, pins, pins_n, AnyPin, BgaGrid, Direction, PinExpression, PinGrammar, PinShape,
};
pub use platform::{
    BuildRequest, DeviceIdentity, PinAssignment, Platform, PlatformSpec, SynthesisBackend,
    Toolchain,
};
pub use products::{BuildProducts, ExtractedArtifact};
pub use registry::RegistryBuilder;
pub use resource::{Clock, Resource, ResourceBody, ResourceBuilder, ResourceId, Subsignal};
pub use validate::validate;
