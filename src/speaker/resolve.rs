use std::fmt;

use bevy::{ecs::system::SystemParam, prelude::*};

use super::cache::SyntheticSpeaker;
use crate::{
    directive::{DirectiveArgs, SpeakerName, SpeakerRef},
    host::{Character, PortraitLibrary, TokenTable},
};

/// The host lookups speaker resolution needs.
pub trait SpeakerHost {
    fn image_exists(&self, id: &str) -> bool;
    fn load_image(&self, id: &str) -> Option<Handle<Image>>;
    fn find_character(&self, name: &str) -> Option<CharacterPortrait>;
    fn expand_tokens(&self, text: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct CharacterPortrait {
    pub portrait: Handle<Image>,
    pub display_name: String,
}

#[derive(Debug, Clone)]
pub struct ResolvedSpeaker {
    pub portrait: Handle<Image>,
    /// `None` until derived from the trimmed dialogue text.
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    UnknownCharacter(String),
    InvalidPortrait(String),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCharacter(name) => write!(f, "no character named '{name}'"),
            Self::InvalidPortrait(id) => write!(f, "portrait '{id}' is invalid"),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Picks the portrait and display name for a directive.
///
/// The character sentinel is checked first and never falls back to the portrait library.
pub fn resolve_speaker(
    args: &DirectiveArgs,
    host: &impl SpeakerHost,
) -> Result<ResolvedSpeaker, ResolveError> {
    match &args.speaker_ref {
        SpeakerRef::Character => {
            let name = args.speaker_name.as_str();
            let character = host
                .find_character(name)
                .ok_or_else(|| ResolveError::UnknownCharacter(name.to_string()))?;
            Ok(ResolvedSpeaker {
                portrait: character.portrait,
                display_name: Some(character.display_name),
            })
        }
        SpeakerRef::Image(id) => {
            let portrait = host
                .image_exists(id)
                .then(|| host.load_image(id))
                .flatten()
                .ok_or_else(|| ResolveError::InvalidPortrait(id.clone()))?;
            let display_name = match &args.speaker_name {
                SpeakerName::Literal(name) => Some(host.expand_tokens(name)),
                SpeakerName::DeriveFromTrim => None,
            };
            Ok(ResolvedSpeaker {
                portrait,
                display_name,
            })
        }
    }
}

/// [`SpeakerHost`] backed by the reference host's resources.
#[derive(SystemParam)]
pub struct HostLookup<'w, 's> {
    characters: Query<'w, 's, &'static Character, Without<SyntheticSpeaker>>,
    library: Res<'w, PortraitLibrary>,
    tokens: Res<'w, TokenTable>,
}

impl SpeakerHost for HostLookup<'_, '_> {
    fn image_exists(&self, id: &str) -> bool {
        self.library.contains(id)
    }

    fn load_image(&self, id: &str) -> Option<Handle<Image>> {
        self.library.get(id)
    }

    fn find_character(&self, name: &str) -> Option<CharacterPortrait> {
        self.characters
            .iter()
            .find(|character| character.name == name)
            .map(|character| CharacterPortrait {
                portrait: character.portrait().clone(),
                display_name: character.display_name.clone(),
            })
    }

    fn expand_tokens(&self, text: &str) -> String {
        self.tokens.expand(text)
    }
}
