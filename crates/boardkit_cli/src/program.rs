//! `boardkit program`: load build products and program the device.

use std::path::PathBuf;

use boardkit_constraints::BuildProducts;

use crate::project::board_and_project;
use crate::{GlobalArgs, ProgramArgs};

/// Runs the `boardkit program` command.
///
/// The artifact name, products directory and programmer executable come from
/// the command line first and `boardkit.toml` second. Blocks until the
/// programmer exits.
pub fn run(args: &ProgramArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (board, project) = board_and_project(args.board.as_deref(), global)?;

    let name = match (&args.name, &project) {
        (Some(name), _) => name.clone(),
        (None, Some(project)) => project.top.clone(),
        (None, None) => {
            return Err("no artifact name: pass NAME or set project.top in boardkit.toml".into())
        }
    };
    let products_dir = match (&args.products, &project) {
        (Some(dir), _) => PathBuf::from(dir),
        (None, Some(project)) => project.products_dir.clone(),
        (None, None) => PathBuf::from("build"),
    };
    let executable = project.as_ref().and_then(|p| p.executable.as_deref());

    let platform = board.platform(executable)?;
    let products = BuildProducts::load_dir(&products_dir).map_err(|e| {
        format!(
            "failed to read build products from {}: {e}",
            products_dir.display()
        )
    })?;

    if !global.quiet {
        eprintln!(
            "   Programming {name}.{} onto {} with {}",
            platform.toolchain().artifact_extension(),
            platform.name(),
            platform.toolchain().name()
        );
    }
    platform.program(&products, &name)?;
    if !global.quiet {
        eprintln!("   Done");
    }
    Ok(0)
}
