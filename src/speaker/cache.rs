use bevy::prelude::*;

use crate::{bridge, directive::UNKNOWN_NAME, host::Character};

/// Marks the placeholder character that voices directive dialogue.
#[derive(Component, Debug, Default)]
pub struct SyntheticSpeaker;

/// Owns the one synthetic speaker entity, created on first use and reused afterwards.
///
/// Not reentrant. Only exclusive world access touches it, so one conversion always finishes
/// with the speaker before the next one starts.
#[derive(Resource, Debug, Default)]
pub struct SyntheticSpeakerCache {
    entity: Option<Entity>,
}

impl SyntheticSpeakerCache {
    pub fn entity(&self) -> Option<Entity> {
        self.entity
    }

    /// Clears the speaker's previous conversation, then gives it a new name and portrait.
    pub(crate) fn prepare(world: &mut World, display_name: &str, portrait: Handle<Image>) -> Entity {
        let cached = world
            .resource::<Self>()
            .entity
            .filter(|entity| world.get::<Character>(*entity).is_some());

        let entity = match cached {
            Some(entity) => entity,
            None => {
                let entity = world
                    .spawn((
                        Name::new(UNKNOWN_NAME),
                        SyntheticSpeaker,
                        Character::new(UNKNOWN_NAME, portrait.clone()),
                    ))
                    .id();
                world.resource_mut::<Self>().entity = Some(entity);
                entity
            }
        };

        if let Some(mut character) = world.get_mut::<Character>(entity) {
            character.current_dialogue.clear();
            character.name = UNKNOWN_NAME.to_string();
            character.display_name = display_name.to_string();
            bridge::set_portrait(&mut character, portrait);
        }

        entity
    }
}
