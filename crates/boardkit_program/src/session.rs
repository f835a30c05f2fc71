//! One programming attempt, as an explicit state machine.

use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::process::Command;

use boardkit_common::ContentHash;
use boardkit_constraints::{BuildProducts, ProcessError, ProgramError};
use log::{info, warn};

use crate::quartus::resolve_executable;

/// Where a session gets the programmer executable from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutableSource {
    /// Always this executable.
    Fixed(String),
    /// Resolved with [`resolve_executable`] when the session reaches
    /// `Invoking`, from the optional configured path.
    Resolved(Option<String>),
}

impl ExecutableSource {
    /// Returns the executable to run now.
    pub fn resolve(&self) -> String {
        match self {
            ExecutableSource::Fixed(executable) => executable.clone(),
            ExecutableSource::Resolved(configured) => resolve_executable(configured.as_deref()),
        }
    }
}

/// Where a programming attempt is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramState {
    /// Nothing done yet.
    Idle,
    /// Writing the artifact to a temporary file.
    Extracting,
    /// The programmer process is running.
    Invoking,
    /// The programmer exited successfully.
    Done,
    /// The attempt failed; see [`ProgramReport::result`].
    Failed,
}

impl fmt::Display for ProgramState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProgramState::Idle => "idle",
            ProgramState::Extracting => "extracting",
            ProgramState::Invoking => "invoking",
            ProgramState::Done => "done",
            ProgramState::Failed => "failed",
        })
    }
}

/// Arguments passed to the programmer for a bitstream at `path`.
///
/// Halts the continuous clock, selects JTAG mode and requests the program
/// operation on the given file.
pub fn programming_args(path: &Path) -> Vec<OsString> {
    let mut operation = OsString::from("P;");
    operation.push(path);
    vec![
        "--haltcc".into(),
        "--mode".into(),
        "JTAG".into(),
        "--operation".into(),
        operation,
    ]
}

/// The outcome of a [`ProgramSession`].
#[derive(Debug)]
pub struct ProgramReport {
    /// Every state the session passed through, starting with `Idle`.
    pub transitions: Vec<ProgramState>,
    /// Digest of the programmed artifact, once it was extracted.
    pub digest: Option<ContentHash>,
    /// `Ok` when the programmer reported success.
    pub result: Result<(), ProgramError>,
}

impl ProgramReport {
    /// Returns the state the session ended in.
    pub fn final_state(&self) -> ProgramState {
        self.transitions
            .last()
            .copied()
            .unwrap_or(ProgramState::Idle)
    }
}

/// A single attempt at programming one artifact with one executable.
///
/// The artifact file exists only while the programmer runs and is removed
/// on every exit path. There is no retry and no timeout.
#[derive(Debug)]
pub struct ProgramSession<'a> {
    executable: &'a ExecutableSource,
    products: &'a BuildProducts,
    artifact: String,
    transitions: Vec<ProgramState>,
}

impl<'a> ProgramSession<'a> {
    /// Prepares to program the artifact called `artifact` with `executable`.
    pub fn new(
        executable: &'a ExecutableSource,
        products: &'a BuildProducts,
        artifact: impl Into<String>,
    ) -> Self {
        Self {
            executable,
            products,
            artifact: artifact.into(),
            transitions: vec![ProgramState::Idle],
        }
    }

    fn advance(&mut self, next: ProgramState) {
        info!("{}: {next}", self.artifact);
        self.transitions.push(next);
    }

    fn fail(mut self, digest: Option<ContentHash>, err: ProgramError) -> ProgramReport {
        warn!("{}: {err}", self.artifact);
        self.advance(ProgramState::Failed);
        ProgramReport {
            transitions: self.transitions,
            digest,
            result: Err(err),
        }
    }

    /// Runs the attempt to completion, blocking until the programmer exits.
    pub fn run(mut self) -> ProgramReport {
        self.advance(ProgramState::Extracting);
        let extracted = match self.products.extract(&self.artifact) {
            Ok(extracted) => extracted,
            Err(err) => return self.fail(None, err),
        };
        let digest = Some(extracted.digest());
        info!(
            "{}: extracted to {} (xxh3 {})",
            self.artifact,
            extracted.path().display(),
            extracted.digest().short()
        );

        let executable = self.executable.resolve();
        self.advance(ProgramState::Invoking);
        let args = programming_args(extracted.path());
        info!(
            "running {} {}",
            executable,
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );
        let outcome = match Command::new(&executable).args(&args).status() {
            Err(err) => Err(ProcessError::Spawn(err)),
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(ProcessError::ExitStatus {
                code: status.code(),
            }),
        };

        if let Err(err) = extracted.close() {
            warn!("{}: failed to remove temporary file: {err}", self.artifact);
        }

        match outcome {
            Ok(()) => {
                self.advance(ProgramState::Done);
                ProgramReport {
                    transitions: self.transitions,
                    digest,
                    result: Ok(()),
                }
            }
            Err(source) => {
                let err = ProgramError::Programming { executable, source };
                self.fail(digest, err)
            }
        }
    }
}
