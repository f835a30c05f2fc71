//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// File name of the project configuration.
pub const CONFIG_FILE: &str = "boardkit.toml";

/// Loads and validates a `boardkit.toml` configuration from a project directory.
///
/// Reads `<project_dir>/boardkit.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `boardkit.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and configuration values are consistent.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.project.top.is_empty() {
        return Err(ConfigError::MissingField("project.top".to_string()));
    }
    if config.board.name.is_empty() {
        return Err(ConfigError::MissingField("board.name".to_string()));
    }
    if config.project.top.contains(['/', '\\']) {
        return Err(ConfigError::ValidationError(format!(
            "project.top '{}' must be an artifact base name, not a path",
            config.project.top
        )));
    }
    if config.project.top.ends_with(".sof") {
        return Err(ConfigError::ValidationError(format!(
            "project.top '{}' must not include the artifact extension",
            config.project.top
        )));
    }
    if config.programmer.executable.as_deref() == Some("") {
        return Err(ConfigError::ValidationError(
            "programmer.executable is empty".to_string(),
        ));
    }
    if config.products.dir.is_empty() {
        return Err(ConfigError::ValidationError(
            "products.dir is empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
[project]
name = "blinky"
top = "top"

[board]
name = "cyclonev_gx_starter_kit"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.name, "blinky");
        assert_eq!(config.project.top, "top");
        assert_eq!(config.board.name, "cyclonev_gx_starter_kit");
        assert!(config.programmer.executable.is_none());
        assert_eq!(config.products.dir, "build");
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[project]
name = "blinky"
top = "blinky_top"
description = "LED blinker"

[board]
name = "cyclonev_gx_starter_kit"

[programmer]
executable = "/opt/quartus/bin/quartus_pgm"

[products]
dir = "output_files"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.description, "LED blinker");
        assert_eq!(
            config.programmer.executable.as_deref(),
            Some("/opt/quartus/bin/quartus_pgm")
        );
        assert_eq!(config.products.dir, "output_files");
    }

    #[test]
    fn missing_name_errors() {
        let toml = r#"
[project]
name = ""
top = "top"

[board]
name = "cyclonev_gx_starter_kit"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(f) if f == "project.name"));
    }

    #[test]
    fn missing_top_errors() {
        let toml = r#"
[project]
name = "blinky"
top = ""

[board]
name = "cyclonev_gx_starter_kit"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(f) if f == "project.top"));
    }

    #[test]
    fn empty_board_name_errors() {
        let toml = r#"
[project]
name = "blinky"
top = "top"

[board]
name = ""
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(f) if f == "board.name"));
    }

    #[test]
    fn missing_board_table_is_parse_error() {
        let toml = r#"
[project]
name = "blinky"
top = "top"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn top_with_extension_rejected() {
        let toml = r#"
[project]
name = "blinky"
top = "top.sof"

[board]
name = "cyclonev_gx_starter_kit"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn empty_products_dir_rejected() {
        let toml = r#"
[project]
name = "blinky"
top = "top"

[board]
name = "cyclonev_gx_starter_kit"

[products]
dir = ""
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let toml = "this is not valid toml {{{}}}";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[project]\nname = \"blinky\"\ntop = \"top\"\n\n\
             [board]\nname = \"cyclonev_gx_starter_kit\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.project.name, "blinky");
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
