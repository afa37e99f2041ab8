//! forkshell: a line-oriented shell built directly on fork, pipe, and exec.
//!
//! Each input line is split into `;` segments and each segment into `|`
//! stages. Every segment runs in its own forked process, optionally with one
//! file redirection (`>>`, `>`, `<`), and every stage in a process of its
//! own. Segments run one after another (`style sequential`, the default) or
//! all at once (`style parallel`). `!!` repeats the last command.
//!
//! # Architecture
//!
//! - **[`parse`]** — Bounded splitting into segments, stages, and words; redirection detection.
//! - **[`state`]** — Per-process shell state: style, I/O handles, history.
//! - **[`commands`]** — Builtins (`exit`, `style`) and external program launch.
//! - **[`exec`]** — Forking, pipe wiring, and the sequential/parallel wait discipline.
//! - **[`config`]** — Configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]** — File logging to `~/.local/share/forkshell/forkshell.log`.

/// Builtin recognition and external launch.
pub mod commands;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Crate error type.
pub mod error;
/// Process orchestration for lines, segments, and pipelines.
pub mod exec;
/// File-based logging setup.
pub mod logging;
/// Line splitting, tokenizing, and redirection parsing.
pub mod parse;
/// Shell state threaded through every call.
pub mod state;

pub use error::{ShellError, ShellResult};
pub use exec::{Flow, execute_line};
pub use state::{ShellState, Style};

/// Read and run lines until input runs out or `exit` is resolved.
///
/// Errors that only affect one line are reported on stderr and reading goes
/// on; failing to read input is returned.
pub fn run(state: &mut ShellState) -> ShellResult<()> {
    loop {
        let line = match state.read_line() {
            Ok(Some(line)) => line,
            Ok(None) => return Ok(()),
            Err(ShellError::Io(e)) => return Err(e.into()),
            Err(e) => {
                exec::report_error(&e);
                continue;
            }
        };
        match execute_line(state, &line) {
            Ok(Flow::Stop) => return Ok(()),
            Ok(Flow::Continue) => {}
            Err(e) => exec::report_error(&e),
        }
    }
}
