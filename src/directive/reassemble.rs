use super::{PAGE_BREAK, PRIMARY_MARKER, UNKNOWN_NAME, normalize_line};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassembled {
    pub text: String,
    pub display_name: String,
}

/// Rebuilds a multi-page dialogue with directive syntax removed from every page.
///
/// Each line loses everything up to and including the primary marker, then everything up to
/// and including `trim_marker`. When no display name is known yet, the text in front of the
/// first trim marker found becomes the display name. Pages are trimmed and joined with the
/// host page break.
pub fn reassemble<S: AsRef<str>>(
    lines: &[S],
    trim_marker: Option<&str>,
    display_name: Option<String>,
) -> Reassembled {
    let mut display_name = display_name;
    let mut text = String::new();

    for (index, line) in lines.iter().enumerate() {
        let line = normalize_line(line.as_ref());
        let mut rest: &str = &line;

        if let Some(marker) = rest.find(PRIMARY_MARKER) {
            rest = &rest[marker + PRIMARY_MARKER.len()..];
        }
        if let Some(trim) = trim_marker {
            if let Some(cut) = rest.find(trim) {
                if display_name.is_none() {
                    let derived = rest[..cut].trim();
                    if !derived.is_empty() {
                        display_name = Some(derived.to_string());
                    }
                }
                rest = &rest[cut + trim.len()..];
            }
        }

        if index > 0 {
            text.push_str(PAGE_BREAK);
        }
        text.push_str(rest.trim());
    }

    Reassembled {
        text,
        display_name: display_name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
    }
}
