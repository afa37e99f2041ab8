use super::types::{ParsedSegment, Redirect, RedirectMode, Redirection};

/// Detect at most one redirection in a segment.
///
/// Operators are tried in precedence order `>>`, `>`, `<`; the first one
/// present anywhere in the segment wins, even if another operator appears
/// earlier in the text.
pub fn parse_segment(segment: &str) -> ParsedSegment<'_> {
    for mode in RedirectMode::PRECEDENCE {
        let Some(pos) = segment.find(mode.as_str()) else {
            continue;
        };
        let command = &segment[..pos];
        let rest = &segment[pos + mode.as_str().len()..];
        let redirect = match rest.split_whitespace().next() {
            Some(target) => Redirect::File(Redirection {
                mode,
                target: target.to_string(),
            }),
            None => Redirect::MissingTarget(mode),
        };
        return ParsedSegment { command, redirect };
    }

    ParsedSegment {
        command: segment,
        redirect: Redirect::None,
    }
}
