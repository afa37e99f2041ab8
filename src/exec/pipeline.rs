use std::os::fd::OwnedFd;

use nix::libc::{STDIN_FILENO, STDOUT_FILENO};
use nix::unistd::{ForkResult, fork, pipe};

use crate::error::{ShellError, ShellResult};
use crate::exec::process::{exit_child, exit_code, replace_stdio, wait_for};
use crate::exec::segment::run_segment;
use crate::exec::{Flow, Mode};
use crate::parse;
use crate::state::ShellState;

/// Run one `;` segment as a `|` pipeline.
///
/// In [`Mode::Validate`] every stage is replayed in order without forking,
/// stopping at the first one that resolves to `exit`. In [`Mode::Execute`]
/// each stage gets its own process.
pub fn run_pipeline(state: &mut ShellState, segment: &str, mode: Mode) -> ShellResult<Flow> {
    let stages = parse::stages(segment, &state.limits)?;
    match mode {
        Mode::Validate => {
            for stage in stages {
                if run_segment(state, stage, Mode::Validate)?.is_stop() {
                    return Ok(Flow::Stop);
                }
            }
            Ok(Flow::Continue)
        }
        Mode::Execute => {
            spawn_stages(state, &stages)?;
            Ok(Flow::Continue)
        }
    }
}

/// Fail with [`ShellError::Capacity`] if any stage of `segment` is over the
/// configured limits under the `reject` policy. Lets the parent refuse a
/// segment before forking anything for it.
pub fn check_capacity(state: &ShellState, segment: &str) -> ShellResult<()> {
    for stage in parse::stages(segment, &state.limits)? {
        parse::tokenize(stage, &state.limits)?;
    }
    Ok(())
}

/// Fork the stages strictly one at a time: stage `i + 1` is not forked until
/// stage `i` has exited, whatever the segment style. A stage that fills the
/// pipe buffer therefore blocks forever, since its reader does not exist yet.
///
/// Every descriptor still held here is dropped on the error paths, and no
/// earlier stage is left running when one fails.
fn spawn_stages(state: &mut ShellState, stages: &[&str]) -> ShellResult<()> {
    let last = stages.len().saturating_sub(1);
    let mut previous: Option<OwnedFd> = None;

    for (index, stage) in stages.iter().enumerate() {
        let (read_end, write_end) = pipe().map_err(ShellError::Pipe)?;
        state.flush();

        // SAFETY: the shell is single-threaded; the child only touches its
        // own copy of the state before exec'ing or exiting.
        match unsafe { fork() }.map_err(ShellError::Fork)? {
            ForkResult::Child => {
                let result = wire_stage(previous.take(), read_end, write_end, index < last)
                    .and_then(|()| run_segment(state, stage, Mode::Execute));
                exit_child(state, exit_code(&result))
            }
            ForkResult::Parent { child } => {
                log::debug!(
                    "[{}] stage {index} forked as {child}: {:?}",
                    std::process::id(),
                    stage.trim()
                );
                drop(write_end);
                previous = Some(read_end);
                wait_for(child);
            }
        }
    }
    Ok(())
}

/// Child side: stdin from the previous stage, stdout into this stage's pipe
/// unless it is the last one. All pipe descriptors are closed afterwards.
fn wire_stage(
    previous: Option<OwnedFd>,
    read_end: OwnedFd,
    write_end: OwnedFd,
    pipe_out: bool,
) -> ShellResult<()> {
    drop(read_end);
    if let Some(previous) = previous {
        replace_stdio(&previous, STDIN_FILENO)?;
    }
    if pipe_out {
        replace_stdio(&write_end, STDOUT_FILENO)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Overflow};
    use crate::state::Style;
    use std::io::Cursor;

    fn batch() -> ShellState {
        ShellState::batch(Cursor::new(""), &Config::default_config())
    }

    #[test]
    fn validate_replays_every_stage() {
        let mut state = batch();
        let flow = run_pipeline(&mut state, "style parallel | echo hi", Mode::Validate).unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(state.style, Style::Parallel);
        assert_eq!(state.last_command, "echo hi");
    }

    #[test]
    fn validate_stops_at_exit() {
        let mut state = batch();
        let flow = run_pipeline(&mut state, "echo a | exit | style parallel", Mode::Validate)
            .unwrap();
        assert_eq!(flow, Flow::Stop);
        // Stages after `exit` are not replayed.
        assert_eq!(state.style, Style::Sequential);
        assert_eq!(state.last_command, "exit");
    }

    #[test]
    fn validate_recall_per_stage() {
        let mut state = batch();
        run_pipeline(&mut state, "ls -l", Mode::Validate).unwrap();
        run_pipeline(&mut state, "!! | wc", Mode::Validate).unwrap();
        assert_eq!(state.last_command, "wc");
    }

    #[test]
    fn validate_truncates_stages() {
        let mut state = batch();
        let line: Vec<String> = (0..50).map(|i| format!("cmd{i}")).collect();
        run_pipeline(&mut state, &line.join("|"), Mode::Validate).unwrap();
        assert_eq!(state.last_command, "cmd39");
    }

    #[test]
    fn capacity_check_passes_within_limits() {
        let state = batch();
        assert!(check_capacity(&state, "echo a | tr a b").is_ok());
    }

    #[test]
    fn capacity_check_rejects_long_stage() {
        let mut config = Config::default_config();
        config.limits.overflow = Overflow::Reject;
        config.limits.max_tokens = 2;
        let state = ShellState::batch(Cursor::new(""), &config);
        assert!(check_capacity(&state, "ls | echo a b").is_err());
    }

    #[test]
    fn validate_rejects_too_many_stages() {
        let mut config = Config::default_config();
        config.limits.overflow = Overflow::Reject;
        config.limits.max_stages = 2;
        let mut state = ShellState::batch(Cursor::new(""), &config);
        let err = run_pipeline(&mut state, "a | b | c", Mode::Validate).unwrap_err();
        assert!(matches!(err, ShellError::Capacity { what: "stages", .. }));
        assert!(state.last_command.is_empty());
    }
}
