//! inline portrait directives embedded in dialogue text
//!
//! ```text
//! <speaker ref> <speaker name> [<trim marker>]🐬<rest of line...>
//! ```
//!
//! the speaker ref is either an image id from the portrait library or [`CHARACTER_SENTINEL`],
//! which looks the speaker name up as a named character instead. the speaker name may be
//! [`DERIVE_NAME_SENTINEL`] to take the display name from the text in front of the trim marker.

mod parse;
mod reassemble;

pub use parse::{Directive, DirectiveArgs, DirectiveError, SpeakerName, SpeakerRef, parse_directive};
pub(crate) use parse::normalize_line;
pub use reassemble::{Reassembled, reassemble};

/// Separates directive arguments from the dialogue body.
pub const PRIMARY_MARKER: &str = "🐬";

/// Speaker ref meaning "look up a named character".
pub const CHARACTER_SENTINEL: &str = "👤";

/// Speaker name meaning "derive the display name from the trimmed text".
pub const DERIVE_NAME_SENTINEL: &str = "✂";

/// Host page break between dialogue pages.
pub const PAGE_BREAK: &str = "#$b#";

/// Name used by the synthetic speaker, and the display name when nothing else is known.
pub const UNKNOWN_NAME: &str = "???";

/// Position of the primary marker in `line`, if it sits far enough in to leave room for a
/// speaker ref in front of it.
///
/// Markers at character position 0 or 1 are treated as incidental text.
pub(crate) fn find_primary_marker(line: &str) -> Option<usize> {
    let index = line.find(PRIMARY_MARKER)?;
    (line[..index].chars().count() > 1).then_some(index)
}
