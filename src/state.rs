//! Per-process shell state: scheduling style, I/O handles, and history.
//!
//! A forked child gets its own copy of everything here. The only way a
//! change made inside a child reaches the parent is the parent re-running
//! the same text in validation mode (see [`crate::exec`]).

use std::io::{BufRead, Write};

use crate::config::{Config, Limits};
use crate::error::ShellResult;
use crate::parse;

/// How `;` segments of one line are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// Wait for each segment before forking the next.
    #[default]
    Sequential,
    /// Fork every segment first, wait for all of them afterwards.
    Parallel,
}

impl Style {
    /// Short tag shown in the prompt.
    pub fn prompt_tag(self) -> &'static str {
        match self {
            Style::Sequential => "seq",
            Style::Parallel => "par",
        }
    }
}

pub struct ShellState {
    pub style: Style,
    /// Resolved text of the last stage run; empty until the first command.
    pub last_command: String,
    pub limits: Limits,
    prompt_name: String,
    input: Option<Box<dyn BufRead>>,
    /// Absent in batch mode: no prompt, no history echo.
    output: Option<Box<dyn Write>>,
}

impl ShellState {
    pub fn new(
        input: Option<Box<dyn BufRead>>,
        output: Option<Box<dyn Write>>,
        config: &Config,
    ) -> Self {
        Self {
            style: Style::Sequential,
            last_command: String::new(),
            limits: config.limits,
            prompt_name: config.settings.prompt_name.clone(),
            input,
            output,
        }
    }

    /// Read from stdin and echo prompts to stdout.
    pub fn interactive(config: &Config) -> Self {
        Self::new(
            Some(Box::new(std::io::stdin().lock())),
            Some(Box::new(std::io::stdout())),
            config,
        )
    }

    /// Read commands from `reader` without prompting.
    pub fn batch(reader: impl BufRead + 'static, config: &Config) -> Self {
        Self::new(Some(Box::new(reader)), None, config)
    }

    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    /// Prompt (when there is an output handle) and read the next non-blank line.
    ///
    /// Leading whitespace and the line terminator are stripped; blank lines
    /// are skipped without prompting again. Returns `Ok(None)` once input is
    /// exhausted.
    pub fn read_line(&mut self) -> ShellResult<Option<String>> {
        self.prompt()?;
        let Some(input) = self.input.as_mut() else {
            return Ok(None);
        };

        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                return Ok(None);
            }
            let text = String::from_utf8_lossy(&buf);
            let line = text.trim_end_matches(['\n', '\r']).trim_start();
            if line.is_empty() {
                continue;
            }
            return Ok(Some(parse::clamp_line(line, &self.limits)?.to_string()));
        }
    }

    /// Write one line to the output handle, if there is one.
    pub fn report(&mut self, message: &str) -> ShellResult<()> {
        if let Some(out) = self.output.as_mut() {
            writeln!(out, "{message}")?;
            out.flush()?;
        }
        Ok(())
    }

    /// Flush every buffered writer this process could hand down to a child.
    ///
    /// Must run before `fork`, otherwise pending bytes would be written once
    /// by the parent and again by each child.
    pub fn flush(&mut self) {
        if let Some(out) = self.output.as_mut() {
            let _ = out.flush();
        }
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
    }

    fn prompt(&mut self) -> ShellResult<()> {
        if let Some(out) = self.output.as_mut() {
            write!(out, "{} {}> ", self.prompt_name, self.style.prompt_tag())?;
            out.flush()?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::SharedBuffer;
    use super::*;
    use crate::config::Overflow;
    use crate::error::ShellError;
    use std::io::Cursor;

    fn interactive_with(input: &str) -> (ShellState, SharedBuffer) {
        let out = SharedBuffer::default();
        let state = ShellState::new(
            Some(Box::new(Cursor::new(input.to_string()))),
            Some(Box::new(out.clone())),
            &Config::default_config(),
        );
        (state, out)
    }

    #[test]
    fn new_state_is_sequential_without_history() {
        let state = ShellState::batch(Cursor::new(""), &Config::default_config());
        assert_eq!(state.style, Style::Sequential);
        assert!(state.last_command.is_empty());
        assert!(!state.has_output());
    }

    #[test]
    fn read_line_prompts_with_style() {
        let (mut state, out) = interactive_with("ls -l\n");
        assert_eq!(state.read_line().unwrap().as_deref(), Some("ls -l"));
        assert_eq!(out.contents(), "forkshell seq> ");

        state.style = Style::Parallel;
        assert_eq!(state.read_line().unwrap(), None);
        assert_eq!(out.contents(), "forkshell seq> forkshell par> ");
    }

    #[test]
    fn read_line_skips_blank_lines_and_leading_whitespace() {
        let (mut state, out) = interactive_with("\n   \n\t  echo hi\r\n");
        assert_eq!(state.read_line().unwrap().as_deref(), Some("echo hi"));
        // One prompt, not one per blank line
        assert_eq!(out.contents(), "forkshell seq> ");
    }

    #[test]
    fn read_line_without_trailing_newline() {
        let mut state = ShellState::batch(Cursor::new("exit"), &Config::default_config());
        assert_eq!(state.read_line().unwrap().as_deref(), Some("exit"));
        assert_eq!(state.read_line().unwrap(), None);
    }

    #[test]
    fn read_line_truncates_long_lines() {
        let long = format!("{}\necho next\n", "a".repeat(100));
        let mut state = ShellState::batch(Cursor::new(long), &Config::default_config());
        assert_eq!(state.read_line().unwrap().map(|l| l.len()), Some(80));
        assert_eq!(state.read_line().unwrap().as_deref(), Some("echo next"));
    }

    #[test]
    fn read_line_rejects_long_lines_under_reject_policy() {
        let mut config = Config::default_config();
        config.limits.overflow = Overflow::Reject;
        let long = format!("{}\necho next\n", "a".repeat(100));
        let mut state = ShellState::batch(Cursor::new(long), &config);
        assert!(matches!(state.read_line(), Err(ShellError::Capacity { .. })));
        // The rejected line is consumed; reading goes on.
        assert_eq!(state.read_line().unwrap().as_deref(), Some("echo next"));
    }

    #[test]
    fn read_line_without_input_is_exhausted() {
        let mut state = ShellState::new(None, None, &Config::default_config());
        assert_eq!(state.read_line().unwrap(), None);
    }

    #[test]
    fn report_only_writes_with_output() {
        let (mut state, out) = interactive_with("");
        state.report("No commands").unwrap();
        assert_eq!(out.contents(), "No commands\n");

        let mut quiet = ShellState::batch(Cursor::new(""), &Config::default_config());
        quiet.report("No commands").unwrap();
    }

    #[test]
    fn custom_prompt_name() {
        let mut config = Config::default_config();
        config.settings.prompt_name = "box".into();
        let out = SharedBuffer::default();
        let mut state = ShellState::new(
            Some(Box::new(Cursor::new(""))),
            Some(Box::new(out.clone())),
            &config,
        );
        state.read_line().unwrap();
        assert_eq!(out.contents(), "box seq> ");
    }
}
