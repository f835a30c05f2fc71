//! `boardkit check`: assemble a board and report whether it validates.

use std::collections::BTreeSet;

use crate::project::board_and_project;
use crate::{CheckArgs, GlobalArgs};

/// Runs the `boardkit check` command.
///
/// Returns exit code 0 when the board assembles without conflicts. Assembly
/// errors propagate and are reported by `main`.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (board, project) = board_and_project(args.board.as_deref(), global)?;
    let executable = project.as_ref().and_then(|p| p.executable.as_deref());
    let platform = board.platform(executable)?;

    let pins: BTreeSet<&str> = platform
        .pin_assignments()
        .iter()
        .flat_map(|a| a.pins.iter().map(String::as_str))
        .collect();

    if !global.quiet {
        eprintln!(
            "   Checked {} ({}): {} resources, {} ports, {} pins, default clock {}{}",
            platform.name(),
            platform.device().part_number(),
            platform.resources().len(),
            platform.pin_assignments().len(),
            pins.len(),
            platform.default_clock().id(),
            platform
                .default_clock_frequency()
                .map(|f| format!(" @ {f}"))
                .unwrap_or_default()
        );
    }
    Ok(0)
}
