use std::{borrow::Cow, fmt};

use super::{CHARACTER_SENTINEL, DERIVE_NAME_SENTINEL, PRIMARY_MARKER, find_primary_marker};

/// Who provides the portrait: a named character or a portrait library image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeakerRef {
    /// Resolve the speaker name as a named character.
    Character,
    /// Portrait library id.
    Image(String),
}

impl SpeakerRef {
    fn from_token(token: String) -> Self {
        if token == CHARACTER_SENTINEL {
            Self::Character
        } else {
            Self::Image(token)
        }
    }
}

/// Display name for the speaker, or a request to derive it from the trimmed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeakerName {
    Literal(String),
    DeriveFromTrim,
}

impl SpeakerName {
    fn from_token(token: String) -> Self {
        if token == DERIVE_NAME_SENTINEL {
            Self::DeriveFromTrim
        } else {
            Self::Literal(token)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(name) => name,
            Self::DeriveFromTrim => DERIVE_NAME_SENTINEL,
        }
    }
}

/// The arguments written in front of the primary marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveArgs {
    pub speaker_ref: SpeakerRef,
    pub speaker_name: SpeakerName,
    pub trim_marker: Option<String>,
}

/// A parsed directive line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub args: DirectiveArgs,
    /// Text following the primary marker.
    pub body: String,
}

/// Why a line carrying the primary marker is not a usable directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    Missing(&'static str),
    Blank(&'static str),
}

impl fmt::Display for DirectiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(field) => write!(f, "directive is missing required field '{field}'"),
            Self::Blank(field) => write!(f, "directive field '{field}' must not be blank"),
        }
    }
}

impl std::error::Error for DirectiveError {}

/// Splits one dialogue line into directive arguments and body.
///
/// `Ok(None)` means the line carries no directive at all. A line that has the marker but
/// malformed arguments is an error so the caller can report it and move on to the next line.
pub fn parse_directive(line: &str) -> Result<Option<Directive>, DirectiveError> {
    let line = normalize_line(line);
    let Some(index) = find_primary_marker(&line) else {
        return Ok(None);
    };

    let mut tokens = split_quote_aware(&line[..index]).into_iter();
    let speaker_ref = required(tokens.next(), "speaker ref")?;
    let speaker_name = required(tokens.next(), "speaker name")?;
    let trim_marker = match tokens.next() {
        Some(token) => Some(required(Some(token), "trim marker")?),
        None => None,
    };

    Ok(Some(Directive {
        args: DirectiveArgs {
            speaker_ref: SpeakerRef::from_token(speaker_ref),
            speaker_name: SpeakerName::from_token(speaker_name),
            trim_marker,
        },
        body: line[index + PRIMARY_MARKER.len()..].to_string(),
    }))
}

fn required(token: Option<String>, field: &'static str) -> Result<String, DirectiveError> {
    match token {
        None => Err(DirectiveError::Missing(field)),
        Some(token) if token.trim().is_empty() => Err(DirectiveError::Blank(field)),
        Some(token) => Ok(token),
    }
}

/// Drops line endings so a line reads as one logical unit.
pub(crate) fn normalize_line(line: &str) -> Cow<'_, str> {
    if line.contains(['\r', '\n']) {
        Cow::Owned(line.replace(['\r', '\n'], ""))
    } else {
        Cow::Borrowed(line)
    }
}

/// Whitespace split where `"` groups a token and `\"` is a literal quote.
pub(crate) fn split_quote_aware(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    // tracks `""` so an explicitly empty token survives
    let mut started = false;
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
                started = true;
            }
            '"' => {
                in_quotes = !in_quotes;
                started = true;
            }
            ch if ch.is_whitespace() && !in_quotes => {
                if started {
                    tokens.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            ch => {
                current.push(ch);
                started = true;
            }
        }
    }
    if started {
        tokens.push(current);
    }

    tokens
}
