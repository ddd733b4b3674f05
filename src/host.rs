//! reference dialogue host
//!
//! the components and resources a game exposes for dialogue: dialogue boxes, named characters,
//! the active menu slot, the portrait library and token expansion. `PortraitsPlugin` only talks
//! to the host through these types, and only writes host internals through [`crate::bridge`].

use std::collections::HashMap;

use bevy::prelude::*;

use crate::bridge::HostCapabilities;

pub struct DialogueHostPlugin;

impl Plugin for DialogueHostPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveMenu>()
            .init_resource::<PortraitLibrary>()
            .init_resource::<TokenTable>()
            .insert_resource(HostCapabilities::all())
            .add_message::<MenuChanged>()
            .add_systems(Update, track_active_menu.in_set(HostSystems::TrackMenus));
    }
}

#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum HostSystems {
    /// Emits [`MenuChanged`] when the active menu slot changes.
    TrackMenus,
}

/// A dialogue box. Spawning one is what the host calls constructing a dialogue menu.
#[derive(Component, Debug, Clone, Default)]
pub struct DialogueBox {
    pub dialogues: Vec<String>,
    pub speaker: Option<Entity>,
    pub(crate) responses: Vec<Response>,
    pub(crate) character_mode: bool,
}

impl DialogueBox {
    pub fn new<I, S>(dialogues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dialogues: dialogues.into_iter().map(Into::into).collect(),
            ..default()
        }
    }

    pub fn single(text: impl Into<String>) -> Self {
        Self::new([text])
    }

    pub fn question(text: impl Into<String>, responses: Vec<Response>) -> Self {
        Self {
            responses,
            ..Self::single(text)
        }
    }

    /// A box spoken by a character, shown with their portrait.
    pub fn speaking(speaker: Entity, text: impl Into<String>) -> Self {
        Self {
            speaker: Some(speaker),
            character_mode: true,
            ..Self::single(text)
        }
    }

    pub fn is_portrait_box(&self) -> bool {
        self.character_mode && self.speaker.is_some()
    }

    pub fn is_question(&self) -> bool {
        !self.responses.is_empty()
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    pub fn character_mode(&self) -> bool {
        self.character_mode
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub key: String,
    pub text: String,
}

impl Response {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }
}

/// A named character that can speak with a portrait.
#[derive(Component, Debug, Clone)]
pub struct Character {
    pub name: String,
    pub display_name: String,
    pub current_dialogue: Vec<String>,
    pub(crate) portrait: Handle<Image>,
}

impl Character {
    pub fn new(name: impl Into<String>, portrait: Handle<Image>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            current_dialogue: Vec::new(),
            portrait,
        }
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn portrait(&self) -> &Handle<Image> {
        &self.portrait
    }
}

/// The menu currently shown to the player.
#[derive(Resource, Debug, Default)]
pub struct ActiveMenu(pub Option<Entity>);

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuChanged {
    pub old: Option<Entity>,
    pub new: Option<Entity>,
}

/// Portrait images by asset id.
#[derive(Resource, Debug, Default)]
pub struct PortraitLibrary {
    portraits: HashMap<String, Handle<Image>>,
}

impl PortraitLibrary {
    pub fn insert(&mut self, id: impl Into<String>, image: Handle<Image>) {
        self.portraits.insert(id.into(), image);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.portraits.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<Handle<Image>> {
        self.portraits.get(id).cloned()
    }
}

/// Expands `[Token]` references in display text. Unknown tokens are left as written.
#[derive(Resource, Debug, Default)]
pub struct TokenTable {
    tokens: HashMap<String, String>,
}

impl TokenTable {
    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<String>) {
        self.tokens.insert(token.into(), value.into());
    }

    pub fn expand(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut remaining = text;
        while let Some(start) = remaining.find('[') {
            let Some(end_rel) = remaining[start + 1..].find(']') else {
                break;
            };
            let end = start + 1 + end_rel;
            out.push_str(&remaining[..start]);
            match self.tokens.get(remaining[start + 1..end].trim()) {
                Some(value) => out.push_str(value),
                None => out.push_str(&remaining[start..=end]),
            }
            remaining = &remaining[end + 1..];
        }
        out.push_str(remaining);
        out
    }
}

fn track_active_menu(
    active: Res<ActiveMenu>,
    mut previous: Local<Option<Entity>>,
    mut changed: MessageWriter<MenuChanged>,
) {
    if active.0 == *previous {
        return;
    }
    changed.write(MenuChanged {
        old: *previous,
        new: active.0,
    });
    *previous = active.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_known_tokens_only() {
        let mut tokens = TokenTable::default();
        tokens.insert("Mayor", "Lewis");
        assert_eq!(tokens.expand("[Mayor] of [Town]"), "Lewis of [Town]");
        assert_eq!(tokens.expand("[ Mayor ]!"), "Lewis!");
        assert_eq!(tokens.expand("no tokens"), "no tokens");
        assert_eq!(tokens.expand("dangling [Mayor"), "dangling [Mayor");
    }

    #[test]
    fn portrait_box_needs_speaker_and_character_mode() {
        let mut world = World::new();
        let speaker = world.spawn_empty().id();

        assert!(!DialogueBox::single("hi").is_portrait_box());
        let mut spoken = DialogueBox::speaking(speaker, "hi");
        assert!(spoken.is_portrait_box());
        spoken.character_mode = false;
        assert!(!spoken.is_portrait_box());
    }

    #[derive(Resource, Default)]
    struct Seen(Vec<MenuChanged>);

    fn collect(mut reader: MessageReader<MenuChanged>, mut seen: ResMut<Seen>) {
        seen.0.extend(reader.read().copied());
    }

    #[test]
    fn menu_changes_are_reported_once() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ActiveMenu>()
            .init_resource::<Seen>()
            .add_message::<MenuChanged>()
            .add_systems(Update, (track_active_menu, collect).chain());

        let menu = app.world_mut().spawn_empty().id();
        app.world_mut().resource_mut::<ActiveMenu>().0 = Some(menu);
        app.update();
        app.update();
        app.world_mut().resource_mut::<ActiveMenu>().0 = None;
        app.update();

        assert_eq!(
            app.world().resource::<Seen>().0,
            vec![
                MenuChanged {
                    old: None,
                    new: Some(menu)
                },
                MenuChanged {
                    old: Some(menu),
                    new: None
                },
            ]
        );
    }
}
