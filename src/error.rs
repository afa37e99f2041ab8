//! Error types for forkshell.

use thiserror::Error;

/// Result type alias for shell operations.
pub type ShellResult<T> = Result<T, ShellError>;

/// Everything that can go wrong while reading, parsing, or running a line.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Reading input or writing to the output handle failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The kernel refused a new pipe between two stages.
    #[error("cannot create pipe: {0}")]
    Pipe(#[source] nix::Error),

    /// No child process could be created for a segment or stage.
    #[error("cannot fork: {0}")]
    Fork(#[source] nix::Error),

    /// Rewiring stdin or stdout onto a pipe or file failed.
    #[error("cannot duplicate descriptor: {0}")]
    Dup(#[source] nix::Error),

    /// Opening a redirection target failed.
    #[error("cannot redirect to '{path}': {source}")]
    Redirect {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The external program could not replace the process image.
    #[error("{program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: nix::Error,
    },

    /// A word could not be passed to `execvp` (interior NUL, empty argv).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Input exceeded a configured capacity under the `reject` policy.
    #[error("too many {what} (limit {limit})")]
    Capacity { what: &'static str, limit: usize },
}
