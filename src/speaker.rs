//! speaker resolution and the shared synthetic speaker

mod cache;
mod resolve;

pub use cache::{SyntheticSpeaker, SyntheticSpeakerCache};
pub use resolve::{
    CharacterPortrait, HostLookup, ResolveError, ResolvedSpeaker, SpeakerHost, resolve_speaker,
};
