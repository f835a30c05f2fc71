//! Error types for board definition and device programming.

use boardkit_common::FrequencyError;

use crate::resource::ResourceId;

/// Errors raised while a board definition is being assembled.
///
/// All of these are detected eagerly, before anything is handed to a build
/// backend or a programmer, and abort assembly of the platform.
#[derive(Debug, thiserror::Error)]
pub enum ConstraintError {
    /// A pin token is empty, malformed, or rejected by the platform's pin grammar.
    #[error("invalid pin '{token}': {reason}")]
    Format {
        /// The offending token.
        token: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A resource body does not have exactly one of pins or subsignals.
    #[error("malformed resource {id}: {reason}")]
    MalformedResource {
        /// The resource being built.
        id: ResourceId,
        /// What is wrong with its shape.
        reason: String,
    },

    /// The same (kind, index) was registered twice.
    #[error("duplicate resource {0}")]
    DuplicateResource(ResourceId),

    /// The same connector (name, number) was registered twice.
    #[error("duplicate connector {name}_{number}")]
    DuplicateConnector {
        /// Connector name.
        name: String,
        /// Connector number.
        number: u32,
    },

    /// A pin list does not split evenly into units of the generator's arity.
    #[error("{kind}: {count} pins cannot be split into units of {arity}")]
    ArityMismatch {
        /// Resource kind being generated.
        kind: String,
        /// Number of pin tokens supplied.
        count: usize,
        /// Pins per generated resource.
        arity: usize,
    },

    /// A named peripheral generator was called without one of its required fields.
    #[error("{id}: missing required field '{field}'")]
    MissingField {
        /// The resource that would have been generated.
        id: ResourceId,
        /// The absent field.
        field: &'static str,
    },

    /// Two resources claim the same physical pin.
    #[error("pin {pin} is claimed by both {a} and {b}")]
    Conflict {
        /// The first resource (in registration order) to claim the pin.
        a: ResourceId,
        /// The later resource that claimed it again.
        b: ResourceId,
        /// The shared physical pin.
        pin: String,
    },

    /// The default clock or reset does not name a registered resource.
    #[error("default {role} {id} does not name a registered resource")]
    UnresolvedDefault {
        /// Either "clock" or "reset".
        role: &'static str,
        /// The reference that failed to resolve.
        id: ResourceId,
    },

    /// A connector pin reference names a connector or label that does not exist.
    #[error("unknown connector pin '{0}'")]
    UnknownConnector(String),

    /// A clock frequency is not a positive rate.
    #[error(transparent)]
    Frequency(#[from] FrequencyError),
}

/// Failure reported by an external programmer process.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The executable could not be started (not found, not executable, ...).
    #[error("failed to start: {0}")]
    Spawn(#[source] std::io::Error),

    /// The process ran and exited unsuccessfully.
    #[error("{}", describe_exit(.code))]
    ExitStatus {
        /// The exit code, or `None` when the process was killed by a signal.
        code: Option<i32>,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Errors raised when programming a build artifact onto a device.
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// The build products contain no artifact with the requested name.
    #[error("build products contain no artifact named '{0}'")]
    ArtifactNotFound(String),

    /// The artifact could not be materialized on the filesystem.
    #[error("failed to extract '{name}': {source}")]
    Extract {
        /// The artifact name.
        name: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The programmer executable failed to run or reported failure.
    #[error("programming with '{executable}' failed: {source}")]
    Programming {
        /// The executable that was invoked.
        executable: String,
        /// What went wrong with the process.
        source: ProcessError,
    },
}

/// Failure of a combined build-then-program request.
#[derive(Debug, thiserror::Error)]
pub enum BuildError<E: std::error::Error + 'static> {
    /// The synthesis backend failed.
    #[error("build failed: {0}")]
    Backend(#[source] E),

    /// The build succeeded but programming did not.
    #[error(transparent)]
    Program(#[from] ProgramError),
}
