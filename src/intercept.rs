//! watches dialogue box construction and builds portrait replacements for directive dialogue

use std::ops::{Deref, DerefMut};

use bevy::prelude::*;

use crate::{
    bridge::{self, QuestionPortraits},
    directive::{parse_directive, reassemble},
    host::{ActiveMenu, DialogueBox, Response},
    settings::PortraitSettings,
    speaker::{HostLookup, SpeakerHost, SyntheticSpeakerCache, resolve_speaker},
    swap::{PendingSwap, SwapScheduler, schedule_swap},
};

/// Set while the plugin spawns its own replacement box, so that spawn is not intercepted again.
#[derive(Resource, Debug, Default)]
pub struct InterceptGuard {
    suppressed: bool,
}

impl InterceptGuard {
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }
}

/// World access with interception held off. Dropping it lifts the suppression again.
pub(crate) struct SuppressInterception<'w> {
    world: &'w mut World,
}

impl<'w> SuppressInterception<'w> {
    pub(crate) fn enter(world: &'w mut World) -> Self {
        world.resource_mut::<InterceptGuard>().suppressed = true;
        Self { world }
    }
}

impl Deref for SuppressInterception<'_> {
    type Target = World;

    fn deref(&self) -> &World {
        self.world
    }
}

impl DerefMut for SuppressInterception<'_> {
    fn deref_mut(&mut self) -> &mut World {
        self.world
    }
}

impl Drop for SuppressInterception<'_> {
    fn drop(&mut self) {
        if let Some(mut guard) = self.world.get_resource_mut::<InterceptGuard>() {
            guard.suppressed = false;
        }
    }
}

/// Question boxes start with a portrait and drop back to the host's own question layout after
/// being active for `ticks` updates.
#[derive(Component, Debug)]
pub struct RevertCharacterMode {
    ticks: u32,
}

impl RevertCharacterMode {
    pub fn after_ticks(ticks: u32) -> Self {
        Self { ticks }
    }
}

#[derive(Debug)]
struct Conversion {
    original: Entity,
    portrait: Handle<Image>,
    display_name: String,
    text: String,
    responses: Option<Vec<Response>>,
}

pub(crate) fn intercept_dialogue_box(
    add: On<Add, DialogueBox>,
    mut commands: Commands,
    guard: Res<InterceptGuard>,
    questions: Res<QuestionPortraits>,
    settings: Res<PortraitSettings>,
    boxes: Query<&DialogueBox>,
    host: HostLookup,
) {
    if guard.is_suppressed() {
        return;
    }
    let Ok(dialogue) = boxes.get(add.entity) else {
        return;
    };
    if dialogue.is_portrait_box() || (dialogue.is_question() && !questions.enabled) {
        return;
    }

    let Some(conversion) = convert(add.entity, dialogue, &host) else {
        return;
    };
    if settings.log_conversions {
        debug!(
            "convert: '{}' -> '{}'",
            dialogue.dialogues.join(","),
            conversion.text
        );
    }

    commands.queue(move |world: &mut World| build_replacement(world, conversion));
}

/// First line whose directive parses and resolves decides the speaker for the whole box.
fn convert(original: Entity, dialogue: &DialogueBox, host: &impl SpeakerHost) -> Option<Conversion> {
    for line in &dialogue.dialogues {
        let directive = match parse_directive(line) {
            Ok(Some(directive)) => directive,
            Ok(None) => continue,
            Err(error) => {
                warn!("skipping portrait directive in '{line}': {error}");
                continue;
            }
        };
        let speaker = match resolve_speaker(&directive.args, host) {
            Ok(speaker) => speaker,
            Err(error) => {
                warn!("skipping portrait directive in '{line}': {error}");
                continue;
            }
        };

        let reassembled = reassemble(
            &dialogue.dialogues,
            directive.args.trim_marker.as_deref(),
            speaker.display_name,
        );
        return Some(Conversion {
            original,
            portrait: speaker.portrait,
            display_name: reassembled.display_name,
            text: reassembled.text,
            responses: dialogue
                .is_question()
                .then(|| dialogue.responses().to_vec()),
        });
    }
    None
}

fn build_replacement(world: &mut World, conversion: Conversion) {
    if world.get::<DialogueBox>(conversion.original).is_none() {
        return;
    }
    // the shared speaker still voices the pending replacement, leave it alone
    let policy = world.resource::<PortraitSettings>().pending_swap_policy;
    if !world.resource::<SwapScheduler>().would_accept(policy) {
        debug!(
            "portrait swap already pending, leaving dialogue {:?} as is (policy {policy:?})",
            conversion.original
        );
        return;
    }

    let speaker =
        SyntheticSpeakerCache::prepare(world, &conversion.display_name, conversion.portrait);

    let mut scope = SuppressInterception::enter(world);
    let mut dialogue = DialogueBox::speaking(speaker, conversion.text);
    let question = conversion.responses.is_some();
    if let Some(responses) = conversion.responses {
        bridge::set_response_list(&mut dialogue, responses);
    }
    let mut replacement = scope.spawn(dialogue);
    if question {
        replacement.insert(RevertCharacterMode::after_ticks(1));
    }
    let replacement = replacement.id();

    schedule_swap(
        &mut scope,
        PendingSwap {
            original: conversion.original,
            replacement,
        },
    );
}

pub(crate) fn revert_character_mode(
    mut commands: Commands,
    active: Res<ActiveMenu>,
    mut pending: Query<(Entity, &mut RevertCharacterMode, &mut DialogueBox)>,
) {
    for (entity, mut revert, mut dialogue) in &mut pending {
        if active.0 != Some(entity) {
            continue;
        }
        if revert.ticks > 0 {
            revert.ticks -= 1;
            continue;
        }
        bridge::set_interactive_flag(&mut dialogue, false);
        commands.entity(entity).remove::<RevertCharacterMode>();
    }
}
