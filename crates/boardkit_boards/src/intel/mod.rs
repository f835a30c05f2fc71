//! Boards built around Intel (formerly Altera) FPGAs.
//!
//! All of them are programmed over JTAG with `quartus_pgm`.

pub mod cyclonev_gx_starter_kit;

use boardkit_constraints::Toolchain;
use boardkit_program::QuartusProgrammer;

/// Returns the Quartus programmer. Each programming attempt honours the
/// `QUARTUS_PGM` override before `configured`.
pub fn quartus_toolchain(configured: Option<&str>) -> Box<dyn Toolchain> {
    Box::new(QuartusProgrammer::configured(configured))
}
