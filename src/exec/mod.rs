//! Process orchestration: lines → segments → pipeline stages → programs.
//!
//! Every level runs in one of two [`Mode`]s. `Execute` forks and launches;
//! `Validate` walks the same text in the parent without creating processes,
//! which is how the parent picks up `style`/`exit`/history changes that the
//! forked child resolved in its own memory.

pub mod flow;
pub mod line;
pub mod pipeline;
pub(crate) mod process;
pub mod segment;

pub use flow::{Flow, Mode};
pub use line::execute_line;
pub use pipeline::run_pipeline;
pub use segment::run_segment;

use crate::error::ShellError;

/// Report a non-fatal error on stderr.
pub fn report_error(error: &ShellError) {
    log::warn!("[{}] {error}", std::process::id());
    eprintln!("Error: {error}");
}
