//! Animation service (montage playback + notify windows)
//!
//! ECS ответственность:
//! - MontagePlayer: какой montage играет, сколько прошло
//! - Window сигналы (begin/tick/end) → AttackWindowNotify events
//! - Ended/interrupted → MontageEnded events
//!
//! Combat видит animation только через `AnimationPlayback` и эти events.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub mod montage;

pub use montage::{Montage, MontagePlayer, NotifyWindow};

/// Which limb a notify window sweeps with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum CollisionPart {
    /// Сокеты / forward ray из самого AttackDefinition
    #[default]
    None,
    RightHand,
    LeftHand,
}

/// Raw signal produced by a montage player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackSignal {
    WindowBegin { part: CollisionPart },
    WindowTick { part: CollisionPart },
    WindowEnd { part: CollisionPart },
    Ended { interrupted: bool },
}

/// Animation-playback capability the combat core depends on.
pub trait AnimationPlayback {
    fn is_any_montage_playing(&self) -> bool;

    /// Starts `montage` (interrupting the current one). Returns its duration.
    fn play(&mut self, montage: &Montage) -> f32;

    /// Stops the current montage; its open windows get closed.
    fn interrupt(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPhase {
    Begin,
    Tick,
    End,
}

/// Событие: notify window сигнал у entity
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AttackWindowNotify {
    pub entity: Entity,
    pub phase: WindowPhase,
    pub part: CollisionPart,
}

/// Событие: montage закончился (или был прерван)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct MontageEnded {
    pub entity: Entity,
    pub interrupted: bool,
}

/// Система: advance всех montage players на fixed delta
pub fn advance_montages(
    time: Res<Time<Fixed>>,
    mut players: Query<(Entity, &mut MontagePlayer)>,
    mut window_events: EventWriter<AttackWindowNotify>,
    mut ended_events: EventWriter<MontageEnded>,
) {
    let delta = time.delta_secs();

    for (entity, mut player) in players.iter_mut() {
        for signal in player.advance(delta) {
            match signal {
                PlaybackSignal::WindowBegin { part } => {
                    window_events.write(AttackWindowNotify { entity, phase: WindowPhase::Begin, part });
                }
                PlaybackSignal::WindowTick { part } => {
                    window_events.write(AttackWindowNotify { entity, phase: WindowPhase::Tick, part });
                }
                PlaybackSignal::WindowEnd { part } => {
                    window_events.write(AttackWindowNotify { entity, phase: WindowPhase::End, part });
                }
                PlaybackSignal::Ended { interrupted } => {
                    ended_events.write(MontageEnded { entity, interrupted });
                }
            }
        }
    }
}
