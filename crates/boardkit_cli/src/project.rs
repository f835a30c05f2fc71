//! Project discovery and board selection shared by the subcommands.

use std::path::{Path, PathBuf};

use boardkit_boards::BoardInfo;
use boardkit_config::{find_catalogued, resolve_project, ResolvedProject, CONFIG_FILE};

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing `boardkit.toml`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE).is_file())
        .map(Path::to_path_buf)
}

/// Loads the project configuration, if there is one.
///
/// With `--config`, the given file (or `boardkit.toml` inside the given
/// directory) must exist. Otherwise `cwd` and its parents are searched. Only
/// a missing configuration yields `Ok(None)`; a file that fails to parse or
/// validate is an error.
pub fn load_project(
    global: &GlobalArgs,
    cwd: &Path,
) -> Result<Option<ResolvedProject>, Box<dyn std::error::Error>> {
    let (dir, config) = match global.config {
        Some(ref path) => {
            let path = PathBuf::from(path);
            let (dir, file) = if path.is_dir() {
                (path.clone(), path.join(CONFIG_FILE))
            } else {
                let dir = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                (dir, path)
            };
            (dir, boardkit_config::load_config_file(&file)?)
        }
        None => match find_project_root(cwd) {
            Some(dir) => {
                let config = boardkit_config::load_config(&dir)?;
                (dir, config)
            }
            None => return Ok(None),
        },
    };
    log::debug!("using project {} in {}", config.project.name, dir.display());
    Ok(Some(resolve_project(&config, &dir)?))
}

/// Picks the board from `--board`, falling back to the project configuration.
pub fn select_board(
    board: Option<&str>,
    project: Option<&ResolvedProject>,
) -> Result<&'static BoardInfo, Box<dyn std::error::Error>> {
    match (board, project) {
        (Some(name), _) => Ok(find_catalogued(name)?),
        (None, Some(project)) => Ok(project.board),
        (None, None) => Err(format!(
            "no board selected: pass --board or create {CONFIG_FILE} with a [board] table"
        )
        .into()),
    }
}

/// Loads the project (if any) and selects the board in one step.
pub fn board_and_project(
    board: Option<&str>,
    global: &GlobalArgs,
) -> Result<(&'static BoardInfo, Option<ResolvedProject>), Box<dyn std::error::Error>> {
    board_and_project_from(board, global, &std::env::current_dir()?)
}

fn board_and_project_from(
    board: Option<&str>,
    global: &GlobalArgs,
    cwd: &Path,
) -> Result<(&'static BoardInfo, Option<ResolvedProject>), Box<dyn std::error::Error>> {
    let project = load_project(global, cwd)?;
    let board = select_board(board, project.as_ref())?;
    Ok((board, project))
}
