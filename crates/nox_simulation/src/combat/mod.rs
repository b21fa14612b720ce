//! Melee combat module.
//!
//! Ядро (pure, тестируется без App):
//! - damage: итоговый урон из base + DamageParams
//! - sweep: socket path → сегменты → sweep primitive
//! - window: attack window state + per-swing dedup
//! - dispatcher: выбор атаки, routing окон, per-frame sweep
//!
//! ECS слой (systems): intents, montage notifies, delayed effects, death.

use bevy::prelude::*;

pub mod collision;
pub mod components;
pub mod config;
pub mod damage;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod hurtbox;
pub mod schedule;
pub mod sweep;
pub mod systems;
pub mod window;

#[cfg(test)]
mod dispatcher_tests;

// Re-export основных типов
pub use components::*;
pub use config::{advance_combat_frame, CombatConfig, CombatFrame};
pub use damage::{resolve_damage, DamageParams};
pub use error::CombatError;
pub use events::*;
pub use hurtbox::{Hurtbox, HurtboxSweep};
pub use schedule::{DelayedEffect, EffectHandle, ScheduledEffects};
pub use sweep::{CollisionParams, CollisionPointSource, DebugDrawMode, HitResult, SweepSegment, SweepTrace};
pub use window::AttackWindowState;

use crate::animation::{advance_montages, AttackWindowNotify, MontageEnded};
use crate::diagnostics::CombatDiagnostics;

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate.
///
/// Порядок выполнения (один fixed tick):
/// 1. advance_combat_frame: frame index для per-frame идемпотентности
/// 2. tick_scheduled_effects: delayed effects (spawn/destroy weapon, forward strike)
/// 3. process_equip_intents + apply_equipment_effects
/// 4. process_attack_intents: dispatcher → montage + active attack
/// 5. advance_montages: window begin/tick/end notifies, montage ended
/// 6. route_attack_windows + sweep_attack_windows: окна и sweeps
/// 7. execute_forward_strikes
/// 8. apply_melee_hits: Vitals, DamageDealt, EntityDied
/// 9. cleanup_finished_attacks + handle_deaths
/// 10. sync_status_bars
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CombatConfig>()
            .init_resource::<CombatFrame>()
            .init_resource::<WeaponClasses>()
            .init_resource::<CombatDiagnostics>();

        // Регистрация событий
        app.add_event::<AttackIntent>()
            .add_event::<EquipWeaponIntent>()
            .add_event::<UnequipWeaponIntent>()
            .add_event::<DelayedEffectFired>()
            .add_event::<WeaponEquipped>()
            .add_event::<WeaponUnequipped>()
            .add_event::<AttackWindowNotify>()
            .add_event::<MontageEnded>()
            .add_event::<MeleeHit>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();

        app.add_systems(
            FixedUpdate,
            (
                advance_combat_frame,
                systems::tick_scheduled_effects,
                systems::process_equip_intents,
                systems::apply_equipment_effects,
                systems::process_attack_intents,
                advance_montages,
                systems::route_attack_windows,
                systems::sweep_attack_windows,
                systems::execute_forward_strikes,
                systems::apply_melee_hits,
                systems::cleanup_finished_attacks,
                systems::handle_deaths,
                systems::sync_status_bars,
            )
                .chain(), // Последовательное выполнение
        );
    }
}
