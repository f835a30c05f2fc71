//! Board definitions and the board catalogue.
//!
//! Each board module assembles its resources into a
//! [`RegistryBuilder`](boardkit_constraints::RegistryBuilder) and builds a
//! validated [`Platform`]. The catalogue lists every known board so tools can
//! select one by name:
//!
//! ```
//! use boardkit_boards::find_board;
//!
//! let board = find_board("cyclonev_gx_starter_kit").unwrap();
//! assert_eq!(board.part_number(), "5CGXFC5C6F27C7");
//! ```

#![warn(missing_docs)]

pub mod intel;

use std::fmt;

use boardkit_constraints::{ConstraintError, Platform, Toolchain};
use serde::Serialize;

pub use intel::cyclonev_gx_starter_kit;

/// A catalogued board.
#[derive(Clone, Copy, Serialize)]
pub struct BoardInfo {
    /// Catalogue name, as used in `boardkit.toml`.
    pub name: &'static str,
    /// Human-readable name.
    pub title: &'static str,
    /// FPGA vendor.
    pub vendor: &'static str,
    /// FPGA device id.
    pub device: &'static str,
    /// FPGA package id.
    pub package: &'static str,
    /// FPGA speed grade.
    pub speed: &'static str,
    #[serde(skip)]
    build: fn(Box<dyn Toolchain>) -> Result<Platform, ConstraintError>,
    #[serde(skip)]
    toolchain: fn(Option<&str>) -> Box<dyn Toolchain>,
}

impl fmt::Debug for BoardInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardInfo")
            .field("name", &self.name)
            .field("vendor", &self.vendor)
            .field("part", &self.part_number())
            .finish_non_exhaustive()
    }
}

impl BoardInfo {
    /// Returns the full part number of the board's FPGA.
    pub fn part_number(&self) -> String {
        format!("{}{}{}", self.device, self.package, self.speed)
    }

    /// Returns the board's programmer, with `executable` as the configured
    /// override of the vendor tool.
    pub fn toolchain(&self, executable: Option<&str>) -> Box<dyn Toolchain> {
        (self.toolchain)(executable)
    }

    /// Assembles and validates the board, programming it with `toolchain`.
    pub fn platform_with(
        &self,
        toolchain: Box<dyn Toolchain>,
    ) -> Result<Platform, ConstraintError> {
        (self.build)(toolchain)
    }

    /// Assembles and validates the board with its default programmer.
    pub fn platform(&self, executable: Option<&str>) -> Result<Platform, ConstraintError> {
        self.platform_with(self.toolchain(executable))
    }
}

/// Every board boardkit knows about.
pub const BOARDS: &[BoardInfo] = &[BoardInfo {
    name: cyclonev_gx_starter_kit::NAME,
    title: "Terasic Cyclone V GX Starter Kit",
    vendor: "intel",
    device: "5CGXFC5",
    package: "C6F27",
    speed: "C7",
    build: cyclonev_gx_starter_kit::platform_with,
    toolchain: intel::quartus_toolchain,
}];

/// Looks up a board by catalogue name.
pub fn find_board(name: &str) -> Option<&'static BoardInfo> {
    BOARDS.iter().find(|b| b.name == name)
}

/// Returns the catalogue names of all boards.
pub fn board_names() -> Vec<&'static str> {
    BOARDS.iter().map(|b| b.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_known_board() {
        let board = find_board("cyclonev_gx_starter_kit").unwrap();
        assert_eq!(board.vendor, "intel");
        assert!(find_board("de0_nano").is_none());
    }

    #[test]
    fn catalogue_matches_definitions() {
        for board in BOARDS {
            let platform = board.platform(Some("quartus_pgm")).unwrap();
            assert_eq!(platform.name(), board.name);
            assert_eq!(platform.device().part_number(), board.part_number());
        }
    }

    #[test]
    fn names_unique() {
        let mut names = board_names();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), BOARDS.len());
    }

    #[test]
    fn serializes_without_constructors() {
        let json = serde_json::to_value(find_board("cyclonev_gx_starter_kit").unwrap()).unwrap();
        assert_eq!(json["device"], "5CGXFC5");
        assert!(json.get("build").is_none());
    }
}
