//! Types produced by the line parser and consumed by the exec layer.

/// How a redirection target is opened and which standard stream it replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    /// `>>` — stdout, create if missing, append
    Append,
    /// `>` — stdout, create if missing, truncate
    Truncate,
    /// `<` — stdin, read only
    Read,
}

impl RedirectMode {
    /// Operators in match precedence order.
    pub const PRECEDENCE: [RedirectMode; 3] =
        [RedirectMode::Append, RedirectMode::Truncate, RedirectMode::Read];

    /// The operator's shell syntax.
    pub fn as_str(self) -> &'static str {
        match self {
            RedirectMode::Append => ">>",
            RedirectMode::Truncate => ">",
            RedirectMode::Read => "<",
        }
    }

    /// Whether the target replaces standard input rather than standard output.
    pub fn is_input(self) -> bool {
        self == RedirectMode::Read
    }
}

/// A file redirection attached to a whole segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub mode: RedirectMode,
    /// First whitespace token after the operator.
    pub target: String,
}

/// Result of looking for a redirection operator in a segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    None,
    File(Redirection),
    /// An operator was found with nothing after it, e.g. `echo hi >`.
    MissingTarget(RedirectMode),
}

/// One `;` segment split into the command that will be piped and run,
/// and its redirection.
///
/// `command` is the text before the operator. Everything after the target
/// token is discarded, so `echo x > out < in` runs `echo x ` with only the
/// truncating redirect applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSegment<'a> {
    pub command: &'a str,
    pub redirect: Redirect,
}
