//! One-shot delayed effects (scheduler).
//!
//! Effects fire from a timer, not from an animation notify: spawn/destroy
//! weapon during equip animations, forward strike at frame N of a montage.
//! Attack-bound effects are cancelled when the attack is interrupted or the
//! owner dies.

use std::time::Duration;

use bevy::prelude::*;

use crate::combat::components::WeaponClassId;
use crate::combat::damage::DamageParams;
use crate::combat::sweep::CollisionParams;
use crate::combat::CombatError;

/// Handle for cancelling a scheduled effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectHandle(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum DelayedEffect {
    SpawnWeapon { class: WeaponClassId },
    DestroyWeapon { weapon: Entity },
    /// Forward-ray strike with damage resolved at attack start
    ForwardStrike {
        base_damage: f32,
        damage: DamageParams,
        collision: CollisionParams,
    },
}

#[derive(Debug, Clone)]
struct ScheduledEffect {
    handle: EffectHandle,
    timer: Timer,
    effect: DelayedEffect,
    attack_bound: bool,
}

/// Pending one-shot timers of one entity.
#[derive(Component, Debug, Clone, Default)]
pub struct ScheduledEffects {
    next_id: u64,
    effects: Vec<ScheduledEffect>,
}

/// Authored delay → timer seconds. Negative clamps to 0; NaN/inf is a configuration error.
pub fn validate_delay(delay: f32) -> Result<f32, CombatError> {
    if delay.is_finite() {
        Ok(delay.max(0.0))
    } else {
        Err(CombatError::InvalidDelay(delay))
    }
}

impl ScheduledEffects {
    /// Schedules `effect` to fire after `delay` seconds.
    pub fn schedule(
        &mut self,
        delay: f32,
        effect: DelayedEffect,
        attack_bound: bool,
    ) -> Result<EffectHandle, CombatError> {
        let seconds = validate_delay(delay)?;
        let handle = EffectHandle(self.next_id);
        self.next_id += 1;

        self.effects.push(ScheduledEffect {
            handle,
            timer: Timer::from_seconds(seconds, TimerMode::Once),
            effect,
            attack_bound,
        });

        Ok(handle)
    }

    /// Returns false if the effect already fired or was cancelled.
    pub fn cancel(&mut self, handle: EffectHandle) -> bool {
        let before = self.effects.len();
        self.effects.retain(|scheduled| scheduled.handle != handle);
        self.effects.len() != before
    }

    /// Cancels every attack-bound effect, returns how many were dropped.
    pub fn cancel_attack_bound(&mut self) -> usize {
        let before = self.effects.len();
        self.effects.retain(|scheduled| !scheduled.attack_bound);
        before - self.effects.len()
    }

    pub fn is_scheduled(&self, handle: EffectHandle) -> bool {
        self.effects.iter().any(|scheduled| scheduled.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Advances every timer; fired effects are removed and returned in scheduling order.
    pub fn tick(&mut self, delta: Duration) -> Vec<(EffectHandle, DelayedEffect)> {
        let mut fired = Vec::new();

        self.effects.retain_mut(|scheduled| {
            scheduled.timer.tick(delta);
            if scheduled.timer.finished() {
                fired.push((scheduled.handle, scheduled.effect.clone()));
                false
            } else {
                true
            }
        });

        fired
    }
}
