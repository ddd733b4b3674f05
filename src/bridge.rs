//! every write into host-internal dialogue state happens here

use bevy::prelude::*;

use crate::host::{ActiveMenu, Character, DialogueBox, Response};

/// Which host internals the plugin can reach. A host advertises this once at startup.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// The dialogue box exposes its character-mode flag.
    pub character_mode_flag: bool,
    /// The dialogue box exposes its response list.
    pub response_list: bool,
}

impl HostCapabilities {
    pub const fn all() -> Self {
        Self {
            character_mode_flag: true,
            response_list: true,
        }
    }

    pub const fn supports_questions(self) -> bool {
        self.character_mode_flag && self.response_list
    }
}

/// Whether question boxes get portraits this session.
#[derive(Resource, Debug, Clone, Copy)]
pub struct QuestionPortraits {
    pub enabled: bool,
}

pub fn set_portrait(character: &mut Character, portrait: Handle<Image>) {
    character.portrait = portrait;
}

pub fn set_interactive_flag(dialogue: &mut DialogueBox, character_mode: bool) {
    dialogue.character_mode = character_mode;
}

pub fn set_response_list(dialogue: &mut DialogueBox, responses: Vec<Response>) {
    dialogue.responses = responses;
}

pub fn force_active_presentation(active: &mut ActiveMenu, presentation: Entity) {
    active.0 = Some(presentation);
}

pub(crate) fn probe_host_capabilities(
    capabilities: Option<Res<HostCapabilities>>,
    mut questions: ResMut<QuestionPortraits>,
) {
    if !questions.enabled {
        return;
    }
    match capabilities.as_deref() {
        Some(capabilities) if capabilities.supports_questions() => {}
        Some(capabilities) => {
            error!(
                "host dialogue internals unavailable ({capabilities:?}), question dialogue portraits disabled"
            );
            questions.enabled = false;
        }
        None => {
            error!("host did not advertise dialogue capabilities, question dialogue portraits disabled");
            questions.enabled = false;
        }
    }
}
