//! Device programming for boardkit platforms.
//!
//! [`QuartusProgrammer`] implements [`boardkit_constraints::Toolchain`] for
//! Intel boards: it extracts `<name>.sof` from the build products to a
//! temporary file and runs the vendor programmer over JTAG on it. Each
//! attempt is a [`ProgramSession`] moving through
//! `Idle → Extracting → Invoking → Done | Failed`.

#![warn(missing_docs)]

pub mod quartus;
pub mod session;

pub use quartus::{
    resolve_executable, QuartusProgrammer, ARTIFACT_EXTENSION, DEFAULT_EXECUTABLE, EXECUTABLE_ENV,
};
pub use session::{
    programming_args, ExecutableSource, ProgramReport, ProgramSession, ProgramState,
};
