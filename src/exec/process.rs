//! Small wrappers around the process primitives shared by the pipeline
//! runner and the line orchestrator.

use std::os::fd::{AsRawFd, RawFd};

use nix::errno::Errno;
use nix::sys::wait::waitpid;
use nix::unistd::{Pid, dup2};

use crate::error::{ShellError, ShellResult};
use crate::exec::{Flow, report_error};
use crate::state::ShellState;

/// Block until `child` exits. Failures are logged, never propagated:
/// nothing in the shell looks at a child's status.
pub(crate) fn wait_for(child: Pid) {
    loop {
        match waitpid(child, None) {
            Err(Errno::EINTR) => continue,
            Ok(status) => {
                log::debug!("[{}] reaped {child}: {status:?}", std::process::id());
                return;
            }
            Err(e) => {
                log::warn!("[{}] waitpid({child}) failed: {e}", std::process::id());
                return;
            }
        }
    }
}

/// Point a standard descriptor (`target`) at `fd`. The caller still owns
/// `fd` and closes it by dropping.
pub(crate) fn replace_stdio(fd: &impl AsRawFd, target: RawFd) -> ShellResult<()> {
    dup2(fd.as_raw_fd(), target)
        .map(drop)
        .map_err(ShellError::Dup)
}

/// Report a forked child's result and map it to an exit status.
pub(crate) fn exit_code(result: &ShellResult<Flow>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(e) => {
            report_error(e);
            match e {
                ShellError::Launch { .. } => 127,
                _ => 1,
            }
        }
    }
}

/// Terminate a forked child. Never returns into the caller's control flow.
pub(crate) fn exit_child(state: &mut ShellState, code: i32) -> ! {
    state.flush();
    std::process::exit(code)
}
