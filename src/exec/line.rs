use std::fs::{File, OpenOptions};

use nix::libc::{STDIN_FILENO, STDOUT_FILENO};
use nix::unistd::{ForkResult, Pid, fork};

use crate::error::{ShellError, ShellResult};
use crate::exec::pipeline::{check_capacity, run_pipeline};
use crate::exec::process::{exit_child, exit_code, replace_stdio, wait_for};
use crate::exec::{Flow, Mode, report_error};
use crate::parse::{self, ParsedSegment, Redirect, RedirectMode, Redirection};
use crate::state::{ShellState, Style};

/// Run one input line: one forked process per `;` segment.
///
/// Under [`Style::Sequential`] each segment's process is waited for before
/// the next is forked; under [`Style::Parallel`] all are forked first. After
/// forking, the parent replays the segment in validation mode so that
/// `style`, `exit`, and history changes resolved by the child also happen
/// here. Returns [`Flow::Stop`] once a replay resolves `exit`; later
/// segments are then not dispatched.
///
/// The replay sees only the text before any redirection operator, so
/// `exit > f.txt` still stops the shell and history never holds the
/// redirection.
///
/// Every child forked for this line has been reaped when this returns.
pub fn execute_line(state: &mut ShellState, line: &str) -> ShellResult<Flow> {
    let segments = parse::segments(line, &state.limits)?;
    let mut pending = Vec::new();
    let outcome = dispatch(state, &segments, &mut pending);
    for child in pending {
        wait_for(child);
    }
    outcome
}

fn dispatch(state: &mut ShellState, segments: &[&str], pending: &mut Vec<Pid>) -> ShellResult<Flow> {
    for segment in segments {
        let parsed = parse::parse_segment(segment);
        check_capacity(state, parsed.command)?;
        state.flush();

        // SAFETY: the shell is single-threaded; the child only touches its
        // own copy of the state before exec'ing or exiting.
        let child = match unsafe { fork() } {
            Ok(ForkResult::Child) => run_segment_child(state, &parsed),
            Ok(ForkResult::Parent { child }) => child,
            Err(e) => {
                report_error(&ShellError::Fork(e));
                continue;
            }
        };
        log::debug!(
            "[{}] segment forked as {child} ({:?}): {:?}",
            std::process::id(),
            state.style,
            parsed.command.trim()
        );

        match state.style {
            Style::Sequential => wait_for(child),
            Style::Parallel => pending.push(child),
        }

        if run_pipeline(state, parsed.command, Mode::Validate)?.is_stop() {
            log::info!("[{}] exit requested", std::process::id());
            return Ok(Flow::Stop);
        }
    }
    Ok(Flow::Continue)
}

/// Child side of one segment: redirect, run the pipeline, close, exit.
fn run_segment_child(state: &mut ShellState, parsed: &ParsedSegment<'_>) -> ! {
    let redirected = apply_redirect(&parsed.redirect);
    let result = run_pipeline(state, parsed.command, Mode::Execute);
    let code = exit_code(&result);
    drop(redirected);
    exit_child(state, code)
}

/// Failures here are reported and the segment runs unredirected.
fn apply_redirect(redirect: &Redirect) -> Option<File> {
    match redirect {
        Redirect::None => None,
        Redirect::MissingTarget(mode) => {
            println!(
                "Failed to redirect command: no file after '{}'",
                mode.as_str()
            );
            None
        }
        Redirect::File(redirection) => match open_redirect(redirection) {
            Ok(file) => Some(file),
            Err(e) => {
                report_error(&e);
                None
            }
        },
    }
}

fn open_redirect(redirection: &Redirection) -> ShellResult<File> {
    let mut options = OpenOptions::new();
    match redirection.mode {
        RedirectMode::Append => {
            options.append(true).create(true);
        }
        RedirectMode::Truncate => {
            options.write(true).create(true).truncate(true);
        }
        RedirectMode::Read => {
            options.read(true);
        }
    }
    let file = options
        .open(&redirection.target)
        .map_err(|source| ShellError::Redirect {
            path: redirection.target.clone(),
            source,
        })?;

    let stream = if redirection.mode.is_input() {
        STDIN_FILENO
    } else {
        STDOUT_FILENO
    };
    replace_stdio(&file, stream)?;
    log::debug!(
        "[{}] {} {}",
        std::process::id(),
        redirection.mode.as_str(),
        redirection.target
    );
    Ok(file)
}
