use crate::commands::{self, Builtin, Recognized, launch::launch};
use crate::error::ShellResult;
use crate::exec::{Flow, Mode};
use crate::parse;
use crate::state::ShellState;

/// Interpret one pipe-free stage.
///
/// Resolves `!!` against this process's own history, applies builtins in
/// either mode, and in [`Mode::Execute`] replaces the process with the
/// external program. History is always rewritten to the resolved words.
///
/// In `Execute` mode with an external command this only returns on launch
/// failure; the caller must terminate the process.
pub fn run_segment(state: &mut ShellState, text: &str, mode: Mode) -> ShellResult<Flow> {
    let mut words: Vec<String> = parse::tokenize(text, &state.limits)?
        .into_iter()
        .map(String::from)
        .collect();

    if commands::is_recall(&words) {
        if mode == Mode::Validate && state.has_output() {
            if state.last_command.is_empty() {
                state.report("No commands")?;
            } else {
                let recalled = state.last_command.clone();
                state.report(&recalled)?;
            }
        }
        // Resolved once: a recalled `!!` would be taken literally.
        words = parse::tokenize(&state.last_command, &state.limits)?
            .into_iter()
            .map(String::from)
            .collect();
    }

    state.last_command = parse::join(&words);

    match Builtin::recognize(&words) {
        Recognized::Builtin(Builtin::Exit) => Ok(Flow::Stop),
        Recognized::Builtin(Builtin::Style(style)) => {
            if state.style != style {
                log::info!("[{}] style -> {:?}", std::process::id(), style);
            }
            state.style = style;
            Ok(Flow::Continue)
        }
        Recognized::Misuse(message) => {
            if mode == Mode::Validate {
                state.report(&message)?;
            }
            Ok(Flow::Continue)
        }
        Recognized::External => {
            if mode == Mode::Execute && !words.is_empty() {
                state.flush();
                match launch(&words)? {}
            }
            Ok(Flow::Continue)
        }
    }
}
