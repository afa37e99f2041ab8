pub mod redirect;
pub mod tokenize;
pub mod types;

pub use redirect::parse_segment;
pub use tokenize::{clamp_line, join, segments, split, stages, tokenize};
pub use types::{ParsedSegment, Redirect, RedirectMode, Redirection};
