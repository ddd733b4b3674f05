//! portraits for any dialogue
//!
//! plain dialogue text can name its own speaker portrait with an inline directive:
//! `fish.png Jane 🐬Hello!` shows "Hello!" next to the `fish.png` portrait, labelled Jane.
//! when a [`DialogueBox`](host::DialogueBox) carrying a directive is spawned, the plugin builds
//! a portrait box voiced by a shared synthetic speaker and swaps it in the moment the original
//! becomes the active menu.
//!
//! quick start:
//! ```no_run
//! # use bevy::prelude::*;
//! # use portraits_anywhere::{PortraitsPlugin, host::{DialogueBox, DialogueHostPlugin}};
//! # let mut app = App::new();
//! app.add_plugins((DialogueHostPlugin, PortraitsPlugin));
//! app.world_mut().spawn(DialogueBox::single("fish.png Jane 🐬Hello!"));
//! ```

// Support configuring Bevy lints within code.
#![cfg_attr(bevy_lint, feature(register_tool), register_tool(bevy))]

pub mod bridge;
pub mod directive;
pub mod host;
mod intercept;
pub mod propagate;
pub mod settings;
pub mod speaker;
pub mod swap;

use bevy::prelude::*;
use bevy_common_assets::ron::RonAssetPlugin;

use crate::{
    bridge::QuestionPortraits,
    host::HostSystems,
    propagate::StringTable,
    settings::PortraitSettings,
    speaker::SyntheticSpeakerCache,
    swap::SwapScheduler,
};
pub use intercept::{InterceptGuard, RevertCharacterMode};

pub struct PortraitsPlugin;

impl Plugin for PortraitsPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<PortraitSettings>() {
            app.insert_resource(settings::load_settings());
        }
        let question_portraits = app.world().resource::<PortraitSettings>().question_portraits;

        app.init_resource::<InterceptGuard>()
            .init_resource::<SwapScheduler>()
            .init_resource::<SyntheticSpeakerCache>()
            .insert_resource(QuestionPortraits {
                enabled: question_portraits,
            })
            .add_plugins(RonAssetPlugin::<StringTable>::new(&["strings.ron"]))
            .add_observer(intercept::intercept_dialogue_box)
            .add_observer(swap::abandon_on_original_removed)
            .add_systems(Startup, bridge::probe_host_capabilities)
            .add_systems(
                Update,
                (
                    swap::apply_pending_swap,
                    intercept::revert_character_mode,
                    propagate::propagate_string_tables,
                )
                    .chain()
                    .in_set(PortraitSystems)
                    .after(HostSystems::TrackMenus),
            );
    }
}

/// Systems that react to the host's menu changes and asset loads.
#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct PortraitSystems;
