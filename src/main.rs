// Support configuring Bevy lints within code.
#![cfg_attr(bevy_lint, feature(register_tool), register_tool(bevy))]

use bevy::{log::LogPlugin, prelude::*};
use portraits_anywhere::{
    PortraitSystems, PortraitsPlugin,
    host::{ActiveMenu, Character, DialogueBox, DialogueHostPlugin, PortraitLibrary, Response, TokenTable},
};

/// Frames to wait between demo steps.
const STEP_FRAMES: u32 = 2;

fn main() -> AppExit {
    App::new().add_plugins(DemoPlugin).run()
}

pub struct DemoPlugin;

impl Plugin for DemoPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            MinimalPlugins,
            LogPlugin {
                filter: "info,portraits_anywhere=debug".to_string(),
                ..default()
            },
            AssetPlugin::default(),
        ))
        .init_asset::<Image>()
        .add_plugins((DialogueHostPlugin, PortraitsPlugin))
        .init_resource::<DemoScript>()
        .add_systems(Startup, setup_cast)
        .add_systems(Update, run_script.after(PortraitSystems));
    }
}

#[derive(Clone, Copy, Debug)]
enum Step {
    Show(&'static [&'static str]),
    Ask(&'static str),
}

const SCRIPT: &[Step] = &[
    Step::Show(&["fish.png Willy 🐬Caught a big one today!", "🐬Want to see?"]),
    Step::Show(&["👤 Penny 🐬Morning! Class starts soon."]),
    Step::Show(&["town.png [Mayor] 🐬Welcome to the valley."]),
    Step::Show(&["town.png ✂ ::🐬Gus::Drinks are on me tonight."]),
    Step::Show(&["Just an old sign. Nothing to see."]),
    Step::Ask("fish.png Willy 🐬Fancy a fishing rod?"),
];

#[derive(Resource, Debug, Default)]
struct DemoScript {
    step: usize,
    frames: u32,
    shown: Option<Entity>,
}

fn setup_cast(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    mut library: ResMut<PortraitLibrary>,
    mut tokens: ResMut<TokenTable>,
) {
    for id in ["fish.png", "town.png"] {
        library.insert(id, images.add(Image::default()));
    }
    tokens.insert("Mayor", "Mayor Lewis");
    commands.spawn((
        Name::new("Penny"),
        Character::new("Penny", images.add(Image::default())).display_name("Penny"),
    ));
}

fn run_script(
    mut commands: Commands,
    mut script: ResMut<DemoScript>,
    mut active: ResMut<ActiveMenu>,
    boxes: Query<&DialogueBox>,
    characters: Query<&Character>,
    mut exit: MessageWriter<AppExit>,
) {
    script.frames += 1;
    if script.frames < STEP_FRAMES {
        return;
    }
    script.frames = 0;

    if let Some(shown) = script.shown.take() {
        report(active.0, &boxes, &characters);
        if boxes.contains(shown) {
            commands.entity(shown).despawn();
        }
        if active.0 == Some(shown) {
            active.0 = None;
        } else if let Some(current) = active.0.take() {
            commands.entity(current).despawn();
        }
        return;
    }

    let Some(step) = SCRIPT.get(script.step) else {
        info!("demo finished");
        exit.write(AppExit::Success);
        return;
    };
    script.step += 1;

    let dialogue = match *step {
        Step::Show(lines) => DialogueBox::new(lines.iter().copied()),
        Step::Ask(text) => DialogueBox::question(
            text,
            vec![Response::new("yes", "Sure!"), Response::new("no", "Maybe later.")],
        ),
    };
    let entity = commands.spawn(dialogue).id();
    active.0 = Some(entity);
    script.shown = Some(entity);
}

fn report(active: Option<Entity>, boxes: &Query<&DialogueBox>, characters: &Query<&Character>) {
    let Some(dialogue) = active.and_then(|entity| boxes.get(entity).ok()) else {
        warn!("no dialogue on screen");
        return;
    };
    let speaker = dialogue
        .speaker
        .and_then(|speaker| characters.get(speaker).ok())
        .map_or("(no portrait)", |character| character.display_name.as_str());
    info!("{speaker}: {}", dialogue.dialogues.join(" / "));
}
