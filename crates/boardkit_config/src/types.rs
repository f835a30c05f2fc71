//! Configuration types deserialized from `boardkit.toml`.

use serde::Deserialize;

/// The top-level project configuration parsed from `boardkit.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Project metadata (name, top-level artifact name).
    pub project: ProjectMeta,
    /// The board the project targets.
    pub board: BoardConfig,
    /// Programmer overrides.
    #[serde(default)]
    pub programmer: ProgrammerConfig,
    /// Where the external build leaves its products.
    #[serde(default)]
    pub products: ProductsConfig,
}

/// Core project metadata required in every `boardkit.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// Base name of the build artifacts, without extension (e.g. `"top"`).
    pub top: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
}

/// Board selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardConfig {
    /// Catalogue name of the board (e.g. `"cyclonev_gx_starter_kit"`).
    pub name: String,
}

/// Programmer settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgrammerConfig {
    /// Path or name of the vendor programmer executable.
    ///
    /// The vendor's environment variable (`QUARTUS_PGM` for Intel boards)
    /// still takes precedence when set.
    pub executable: Option<String>,
}

/// Build products location.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductsConfig {
    /// Directory holding the build artifacts, relative to the project directory.
    #[serde(default = "default_products_dir")]
    pub dir: String,
}

fn default_products_dir() -> String {
    "build".to_string()
}

impl Default for ProductsConfig {
    fn default() -> Self {
        Self {
            dir: default_products_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn products_default_dir() {
        assert_eq!(ProductsConfig::default().dir, "build");
        let parsed: ProductsConfig = toml::from_str("").unwrap();
        assert_eq!(parsed.dir, "build");
    }

    #[test]
    fn programmer_executable_optional() {
        let parsed: ProgrammerConfig = toml::from_str("").unwrap();
        assert!(parsed.executable.is_none());
        let parsed: ProgrammerConfig =
            toml::from_str(r#"executable = "/opt/quartus/bin/quartus_pgm""#).unwrap();
        assert_eq!(parsed.executable.as_deref(), Some("/opt/quartus/bin/quartus_pgm"));
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(toml::from_str::<BoardConfig>("name = \"x\"\nrevision = 2").is_err());
    }
}
