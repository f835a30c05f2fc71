//! Board resolution: binding a configuration to a catalogued board.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use boardkit_boards::{board_names, find_board, BoardInfo};
use std::path::{Path, PathBuf};

/// A configuration with its board looked up and its paths made concrete.
#[derive(Debug)]
pub struct ResolvedProject {
    /// The project name.
    pub name: String,
    /// The selected board.
    pub board: &'static BoardInfo,
    /// Base name of the artifact to program.
    pub top: String,
    /// Configured programmer executable, before environment overrides.
    pub executable: Option<String>,
    /// Directory holding the build products.
    pub products_dir: PathBuf,
}

/// Looks up a board by name, failing with the list of known boards.
pub fn find_catalogued(name: &str) -> Result<&'static BoardInfo, ConfigError> {
    find_board(name).ok_or_else(|| ConfigError::UnknownBoard {
        name: name.to_string(),
        known: board_names().join(", "),
    })
}

/// Resolves the configured board against the catalogue.
pub fn resolve_board(config: &ProjectConfig) -> Result<&'static BoardInfo, ConfigError> {
    find_catalogued(&config.board.name)
}

/// Resolves the configured board and anchors relative paths at `project_dir`.
pub fn resolve_project(
    config: &ProjectConfig,
    project_dir: &Path,
) -> Result<ResolvedProject, ConfigError> {
    let board = resolve_board(config)?;
    Ok(ResolvedProject {
        name: config.project.name.clone(),
        board,
        top: config.project.top.clone(),
        executable: config.programmer.executable.clone(),
        products_dir: project_dir.join(&config.products.dir),
    })
}
