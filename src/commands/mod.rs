//! Commands the shell handles itself, and the launch of everything else.
//!
//! Builtins are matched on exact token count: `exit` alone, or `style`
//! followed by exactly one of `parallel` / `sequential`. Anything else is
//! handed to [`launch::launch`].

/// Replace the current process image with an external program.
pub mod launch;

use crate::state::Style;

/// The history recall token.
pub const RECALL: &str = "!!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// Stop reading input.
    Exit,
    /// Switch the segment scheduling style.
    Style(Style),
}

/// Outcome of looking at a stage's first word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognized {
    Builtin(Builtin),
    /// A builtin name with arguments it does not accept.
    Misuse(String),
    External,
}

impl Builtin {
    /// Classify a resolved token sequence.
    pub fn recognize<S: AsRef<str>>(tokens: &[S]) -> Recognized {
        let words: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        match words.as_slice() {
            ["exit"] => Recognized::Builtin(Builtin::Exit),
            ["style", "parallel"] => Recognized::Builtin(Builtin::Style(Style::Parallel)),
            ["style", "sequential"] => Recognized::Builtin(Builtin::Style(Style::Sequential)),
            ["exit", ..] => Recognized::Misuse("exit: takes no arguments".into()),
            ["style", ..] => {
                Recognized::Misuse("style: expected 'parallel' or 'sequential'".into())
            }
            _ => Recognized::External,
        }
    }
}

/// Whether a stage is exactly the recall token.
pub fn is_recall<S: AsRef<str>>(tokens: &[S]) -> bool {
    matches!(tokens, [only] if only.as_ref() == RECALL)
}
