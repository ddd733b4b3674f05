//! one-shot deferred replacement of a dialogue box by its portrait version

use bevy::prelude::*;

use crate::{
    bridge,
    host::{ActiveMenu, DialogueBox, MenuChanged},
    settings::{PendingSwapPolicy, PortraitSettings},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSwap {
    pub original: Entity,
    pub replacement: Entity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwapState {
    #[default]
    Idle,
    Pending(PendingSwap),
}

/// Result of [`SwapScheduler::schedule`]. Any abandoned swap's replacement is no longer needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheduled {
    Fresh,
    Replaced { abandoned: PendingSwap },
    Rejected { abandoned: PendingSwap },
}

#[derive(Resource, Debug, Default)]
pub struct SwapScheduler {
    state: SwapState,
}

impl SwapScheduler {
    pub fn state(&self) -> SwapState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SwapState::Idle
    }

    /// Whether a swap scheduled now under `policy` would be kept.
    pub fn would_accept(&self, policy: PendingSwapPolicy) -> bool {
        self.is_idle() || policy == PendingSwapPolicy::Overwrite
    }

    pub fn schedule(&mut self, swap: PendingSwap, policy: PendingSwapPolicy) -> Scheduled {
        match (self.state, policy) {
            (SwapState::Idle, _) => {
                self.state = SwapState::Pending(swap);
                Scheduled::Fresh
            }
            (SwapState::Pending(previous), PendingSwapPolicy::Overwrite) => {
                self.state = SwapState::Pending(swap);
                Scheduled::Replaced {
                    abandoned: previous,
                }
            }
            (SwapState::Pending(_), PendingSwapPolicy::KeepFirst) => {
                Scheduled::Rejected { abandoned: swap }
            }
        }
    }

    /// Consumes the pending swap when its original just became the active menu.
    ///
    /// Any other menu becoming active leaves the pending swap in place.
    pub fn take_if_activated(&mut self, active: Option<Entity>) -> Option<PendingSwap> {
        match self.state {
            SwapState::Pending(swap) if active == Some(swap.original) => {
                self.state = SwapState::Idle;
                Some(swap)
            }
            _ => None,
        }
    }

    /// Drops the pending swap when its original is gone for good.
    pub fn abandon_original(&mut self, original: Entity) -> Option<PendingSwap> {
        match self.state {
            SwapState::Pending(swap) if swap.original == original => {
                self.state = SwapState::Idle;
                Some(swap)
            }
            _ => None,
        }
    }
}

/// Registers a freshly built replacement and cleans up whichever swap lost out.
pub(crate) fn schedule_swap(world: &mut World, swap: PendingSwap) {
    let policy = world.resource::<PortraitSettings>().pending_swap_policy;
    let scheduled = world.resource_mut::<SwapScheduler>().schedule(swap, policy);
    match scheduled {
        Scheduled::Fresh => {}
        Scheduled::Replaced { abandoned } | Scheduled::Rejected { abandoned } => {
            debug!(
                "abandoning portrait swap for {:?} (policy {policy:?})",
                abandoned.original
            );
            world.despawn(abandoned.replacement);
        }
    }
}

pub(crate) fn apply_pending_swap(
    mut commands: Commands,
    mut changes: MessageReader<MenuChanged>,
    mut scheduler: ResMut<SwapScheduler>,
    mut active: ResMut<ActiveMenu>,
    boxes: Query<(), With<DialogueBox>>,
) {
    for change in changes.read() {
        let Some(swap) = scheduler.take_if_activated(change.new) else {
            continue;
        };
        if !boxes.contains(swap.replacement) {
            warn!(
                "portrait dialogue {:?} vanished before it could be shown",
                swap.replacement
            );
            continue;
        }
        debug!("swapping dialogue {:?} for {:?}", swap.original, swap.replacement);
        bridge::force_active_presentation(&mut active, swap.replacement);
        if boxes.contains(swap.original) {
            commands.entity(swap.original).despawn();
        }
    }
}

pub(crate) fn abandon_on_original_removed(
    remove: On<Remove, DialogueBox>,
    mut commands: Commands,
    mut scheduler: ResMut<SwapScheduler>,
    boxes: Query<(), With<DialogueBox>>,
) {
    let Some(swap) = scheduler.abandon_original(remove.entity) else {
        return;
    };
    debug!(
        "dialogue {:?} went away before being shown, dropping its portrait swap",
        swap.original
    );
    if boxes.contains(swap.replacement) {
        commands.entity(swap.replacement).despawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(count: usize) -> Vec<Entity> {
        let mut world = World::new();
        (0..count).map(|_| world.spawn_empty().id()).collect()
    }

    fn swap(original: Entity, replacement: Entity) -> PendingSwap {
        PendingSwap {
            original,
            replacement,
        }
    }

    #[test]
    fn idle_to_pending_to_consumed() {
        let e = entities(3);
        let mut scheduler = SwapScheduler::default();
        assert_eq!(
            scheduler.schedule(swap(e[0], e[1]), PendingSwapPolicy::Overwrite),
            Scheduled::Fresh
        );

        assert_eq!(scheduler.take_if_activated(Some(e[2])), None);
        assert_eq!(scheduler.take_if_activated(None), None);
        assert_eq!(scheduler.state(), SwapState::Pending(swap(e[0], e[1])));

        assert_eq!(scheduler.take_if_activated(Some(e[0])), Some(swap(e[0], e[1])));
        assert!(scheduler.is_idle());
        assert_eq!(scheduler.take_if_activated(Some(e[0])), None);
    }

    #[test]
    fn overwrite_abandons_the_older_swap() {
        let e = entities(4);
        let mut scheduler = SwapScheduler::default();
        scheduler.schedule(swap(e[0], e[1]), PendingSwapPolicy::Overwrite);
        assert_eq!(
            scheduler.schedule(swap(e[2], e[3]), PendingSwapPolicy::Overwrite),
            Scheduled::Replaced {
                abandoned: swap(e[0], e[1])
            }
        );
        assert_eq!(scheduler.take_if_activated(Some(e[0])), None);
        assert_eq!(scheduler.take_if_activated(Some(e[2])), Some(swap(e[2], e[3])));
    }

    #[test]
    fn keep_first_rejects_the_newer_swap() {
        let e = entities(4);
        let mut scheduler = SwapScheduler::default();
        scheduler.schedule(swap(e[0], e[1]), PendingSwapPolicy::KeepFirst);
        assert_eq!(
            scheduler.schedule(swap(e[2], e[3]), PendingSwapPolicy::KeepFirst),
            Scheduled::Rejected {
                abandoned: swap(e[2], e[3])
            }
        );
        assert_eq!(scheduler.state(), SwapState::Pending(swap(e[0], e[1])));
    }

    #[test]
    fn acceptance_depends_on_state_and_policy() {
        let e = entities(2);
        let mut scheduler = SwapScheduler::default();
        assert!(scheduler.would_accept(PendingSwapPolicy::KeepFirst));
        assert!(scheduler.would_accept(PendingSwapPolicy::Overwrite));

        scheduler.schedule(swap(e[0], e[1]), PendingSwapPolicy::KeepFirst);
        assert!(!scheduler.would_accept(PendingSwapPolicy::KeepFirst));
        assert!(scheduler.would_accept(PendingSwapPolicy::Overwrite));
    }

    #[test]
    fn removing_the_original_abandons() {
        let e = entities(3);
        let mut scheduler = SwapScheduler::default();
        scheduler.schedule(swap(e[0], e[1]), PendingSwapPolicy::Overwrite);
        assert_eq!(scheduler.abandon_original(e[2]), None);
        assert_eq!(scheduler.abandon_original(e[0]), Some(swap(e[0], e[1])));
        assert!(scheduler.is_idle());
    }
}
