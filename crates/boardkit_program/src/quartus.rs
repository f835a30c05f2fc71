//! The Quartus programmer strategy for Intel FPGA boards.

use boardkit_constraints::{BuildProducts, ProgramError, Toolchain};

use crate::session::{ExecutableSource, ProgramReport, ProgramSession};

/// Executable used when nothing overrides it.
pub const DEFAULT_EXECUTABLE: &str = "quartus_pgm";

/// Environment variable overriding the programmer executable.
pub const EXECUTABLE_ENV: &str = "QUARTUS_PGM";

/// Extension of the SRAM object file the programmer loads.
pub const ARTIFACT_EXTENSION: &str = "sof";

/// Picks the programmer executable.
///
/// The [`EXECUTABLE_ENV`] environment variable wins when set and non-empty,
/// then `configured`, then [`DEFAULT_EXECUTABLE`].
pub fn resolve_executable(configured: Option<&str>) -> String {
    pick_executable(std::env::var(EXECUTABLE_ENV).ok(), configured)
}

fn pick_executable(env: Option<String>, configured: Option<&str>) -> String {
    env.filter(|v| !v.is_empty())
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_EXECUTABLE.to_string())
}

/// Programs `.sof` images over JTAG with `quartus_pgm`.
///
/// Unless built with [`QuartusProgrammer::with_executable`], the executable is
/// resolved on every attempt, once the artifact has been extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuartusProgrammer {
    executable: ExecutableSource,
}

impl Default for QuartusProgrammer {
    fn default() -> Self {
        Self::new()
    }
}

impl QuartusProgrammer {
    /// Creates a programmer using [`EXECUTABLE_ENV`] if set, else [`DEFAULT_EXECUTABLE`].
    pub fn new() -> Self {
        Self::configured(None)
    }

    /// Creates a programmer using [`EXECUTABLE_ENV`] if set, else `configured`,
    /// else [`DEFAULT_EXECUTABLE`].
    pub fn configured(configured: Option<&str>) -> Self {
        Self {
            executable: ExecutableSource::Resolved(configured.map(str::to_string)),
        }
    }

    /// Creates a programmer invoking exactly `executable`, ignoring the environment.
    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            executable: ExecutableSource::Fixed(executable.into()),
        }
    }

    /// Returns the executable an attempt started now would invoke.
    pub fn executable(&self) -> String {
        self.executable.resolve()
    }

    /// Programs `<name>.sof` and returns the full report of the attempt.
    pub fn program_with_report(&self, products: &BuildProducts, name: &str) -> ProgramReport {
        ProgramSession::new(
            &self.executable,
            products,
            format!("{name}.{ARTIFACT_EXTENSION}"),
        )
        .run()
    }
}

impl Toolchain for QuartusProgrammer {
    fn name(&self) -> &str {
        "quartus"
    }

    fn artifact_extension(&self) -> &str {
        ARTIFACT_EXTENSION
    }

    fn program(&self, products: &BuildProducts, name: &str) -> Result<(), ProgramError> {
        self.program_with_report(products, name).result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ProgramState;

    #[test]
    fn executable_precedence() {
        assert_eq!(pick_executable(None, None), "quartus_pgm");
        assert_eq!(pick_executable(None, Some("/opt/q/quartus_pgm")), "/opt/q/quartus_pgm");
        assert_eq!(
            pick_executable(Some("/env/quartus_pgm".into()), Some("/opt/q/quartus_pgm")),
            "/env/quartus_pgm"
        );
        assert_eq!(pick_executable(Some(String::new()), Some("cfg")), "cfg");
    }

    #[test]
    fn fixed_executable_is_kept() {
        let programmer = QuartusProgrammer::with_executable("/opt/q/quartus_pgm");
        assert_eq!(programmer.executable(), "/opt/q/quartus_pgm");
        assert_ne!(programmer, QuartusProgrammer::configured(Some("/opt/q/quartus_pgm")));
    }

    #[test]
    fn artifact_name_gets_extension() {
        let programmer = QuartusProgrammer::with_executable("/nonexistent/quartus_pgm");
        let mut products = BuildProducts::new();
        products.insert("top", b"no extension".to_vec());
        let err = programmer.program(&products, "top").unwrap_err();
        assert!(matches!(err, ProgramError::ArtifactNotFound(name) if name == "top.sof"));
    }

    #[cfg(unix)]
    #[test]
    fn stub_failure_surfaces_exit_code() {
        let programmer = QuartusProgrammer::with_executable("false");
        let mut products = BuildProducts::new();
        products.insert("top.sof", b"sof".to_vec());
        let report = programmer.program_with_report(&products, "top");
        assert_eq!(report.final_state(), ProgramState::Failed);
        let err = report.result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "programming with 'false' failed: exited with status 1"
        );
    }

    #[cfg(unix)]
    #[test]
    fn toolchain_program_succeeds() {
        let programmer = QuartusProgrammer::with_executable("true");
        let mut products = BuildProducts::new();
        products.insert("top.sof", b"sof".to_vec());
        assert!(programmer.program(&products, "top").is_ok());
        assert_eq!(programmer.artifact_extension(), "sof");
    }
}
