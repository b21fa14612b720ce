//! Базовые компоненты акторов: Actor, Vitals (health + mana)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Актор (игрок, NPC, враг): базовый компонент для живых существ
///
/// Через Required Components получает vitals, команду, locomotion,
/// perception stimuli и floating status bar.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(
    Vitals,
    crate::components::Team,
    crate::components::Locomotion,
    crate::components::PerceptionStimuli,
    crate::components::FloatingStatusBar
)]
pub struct Actor;

/// One vital resource (health or mana).
///
/// `0 <= current <= max` is the intended range, but damage does not clamp:
/// `current` may go negative, and `percentage` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct VitalPool {
    pub current: f32,
    pub max: f32,
    /// `current / max`, recomputed on every mutation
    pub percentage: f32,
}

impl VitalPool {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            percentage: calculate_percentage(max, max),
        }
    }

    /// Subtracts without a floor.
    pub fn drain(&mut self, amount: f32) {
        self.current -= amount;
        self.recompute();
    }

    /// Adds, clamped to `max`.
    pub fn restore(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
        self.recompute();
    }

    fn recompute(&mut self) {
        self.percentage = calculate_percentage(self.current, self.max);
    }
}

/// `current / max`; a non-positive max yields 0.
pub fn calculate_percentage(current: f32, max: f32) -> f32 {
    if max <= 0.0 {
        return 0.0;
    }
    current / max
}

/// Result of one `Vitals::apply_damage` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    /// Amount actually subtracted (0 when damage is disabled)
    pub applied: f32,
    /// True only on the call that crossed health to `<= 0` while alive
    pub killed: bool,
}

/// Health + mana of an actor.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Vitals {
    pub health: VitalPool,
    pub mana: VitalPool,
    /// Damage intake switch (turned off by the death transition)
    pub can_be_damaged: bool,
    /// Gate for death-only effects; never re-derived from health
    pub alive: bool,
}

impl Default for Vitals {
    fn default() -> Self {
        Self::new(100.0, 100.0)
    }
}

impl Vitals {
    pub fn new(max_health: f32, max_mana: f32) -> Self {
        Self {
            health: VitalPool::new(max_health),
            mana: VitalPool::new(max_mana),
            can_be_damaged: true,
            alive: true,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Damage entry point.
    ///
    /// Disabled intake → nothing applied. Otherwise health drops by `amount`
    /// without clamping; `killed` is reported once, the first time health
    /// reaches `<= 0` while still alive.
    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.can_be_damaged {
            return DamageOutcome {
                applied: 0.0,
                killed: false,
            };
        }

        self.health.drain(amount);

        let killed = self.alive && self.health.current <= 0.0;
        if killed {
            self.alive = false;
        }

        DamageOutcome {
            applied: amount,
            killed,
        }
    }

    /// Spends mana if there is enough of it.
    pub fn spend_mana(&mut self, cost: f32) -> bool {
        if self.mana.current < cost {
            return false;
        }
        self.mana.drain(cost);
        true
    }

    pub fn restore_mana(&mut self, amount: f32) {
        self.mana.restore(amount);
    }
}
