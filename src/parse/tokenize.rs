use crate::config::{Limits, Overflow};
use crate::error::{ShellError, ShellResult};

/// Split `text` on `delimiter`, collapsing consecutive delimiters and
/// dropping pieces that are empty or whitespace-only.
///
/// At most `limit` pieces survive; what happens to the rest depends on
/// `overflow`. `what` names the pieces in log lines and errors.
pub fn split<'a>(
    text: &'a str,
    delimiter: char,
    limit: usize,
    overflow: Overflow,
    what: &'static str,
) -> ShellResult<Vec<&'a str>> {
    let pieces = text.split(delimiter).filter(|piece| !piece.trim().is_empty());
    bounded(pieces, limit, overflow, what)
}

/// Split a line into `;` segments.
pub fn segments<'a>(line: &'a str, limits: &Limits) -> ShellResult<Vec<&'a str>> {
    split(line, ';', limits.max_segments, limits.overflow, "segments")
}

/// Split a segment into `|` pipeline stages.
pub fn stages<'a>(segment: &'a str, limits: &Limits) -> ShellResult<Vec<&'a str>> {
    split(segment, '|', limits.max_stages, limits.overflow, "stages")
}

/// Split a stage into whitespace-delimited words.
pub fn tokenize<'a>(stage: &'a str, limits: &Limits) -> ShellResult<Vec<&'a str>> {
    bounded(stage.split_whitespace(), limits.max_tokens, limits.overflow, "tokens")
}

/// Inverse of [`tokenize`]: words separated by exactly one space.
pub fn join<S: AsRef<str>>(tokens: &[S]) -> String {
    let words: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
    words.join(" ")
}

/// Bound an input line to `limits.max_line_bytes`, cutting on a UTF-8 boundary.
pub fn clamp_line<'a>(line: &'a str, limits: &Limits) -> ShellResult<&'a str> {
    let max = limits.max_line_bytes;
    if line.len() <= max {
        return Ok(line);
    }
    if limits.overflow == Overflow::Reject {
        return Err(ShellError::Capacity {
            what: "bytes in line",
            limit: max,
        });
    }
    let mut end = max;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    log::warn!("line truncated from {} to {end} bytes", line.len());
    Ok(&line[..end])
}

fn bounded<'a>(
    pieces: impl Iterator<Item = &'a str>,
    limit: usize,
    overflow: Overflow,
    what: &'static str,
) -> ShellResult<Vec<&'a str>> {
    let mut kept: Vec<&str> = pieces.take(limit + 1).collect();
    if kept.len() > limit {
        if overflow == Overflow::Reject {
            return Err(ShellError::Capacity { what, limit });
        }
        log::warn!("more than {limit} {what}; keeping the first {limit}");
        kept.truncate(limit);
    }
    Ok(kept)
}
