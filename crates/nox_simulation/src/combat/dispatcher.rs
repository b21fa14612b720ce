//! Weapon/unarmed attack dispatcher.
//!
//! Чистое ядро без ECS: выбор AttackDefinition, резолв params,
//! старт montage, открытие окна, один sweep окна за frame.
//! ECS системы (`combat::systems`) только собирают данные и вызывают его.
//!
//! # Attack selection
//!
//! - Нет оружия → `unarmed_attacks[unarmed_index]`, base = `MeleeCombat::base_damage`.
//! - Есть оружие → tag должен быть валидным; первая атака класса с точно
//!   совпадающим tag. Params оружия заменяются params атаки только при
//!   `override_collision_params`.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Group;

use crate::animation::{AnimationPlayback, CollisionPart, Montage};
use crate::combat::components::{
    ActiveAttack, AttackDefinition, AttackSource, MeleeCombat, Weapon, WeaponClasses,
};
use crate::combat::damage::DamageParams;
use crate::combat::schedule::{validate_delay, DelayedEffect, ScheduledEffects};
use crate::combat::sweep::{build_and_execute_sweep, CollisionParams, HitResult, SweepInstigator, SweepTrace};
use crate::combat::window::AttackWindowState;
use crate::combat::CombatError;
use crate::components::Vitals;
use crate::diagnostics::DiagnosticsSink;

/// What the attacker is holding.
#[derive(Debug, Clone, Copy)]
pub enum Armament<'a> {
    Unarmed,
    Armed { entity: Entity, weapon: &'a Weapon },
    /// `EquippedWeapon` указывает на несуществующий entity
    Missing(Entity),
}

/// Resolved attack, ready to commit.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackPlan {
    pub montage: Montage,
    pub attack: ActiveAttack,
    /// (delay, effect) для forward strike
    pub strike: Option<(f32, DelayedEffect)>,
}

/// Validates preconditions and resolves the attack to perform.
pub fn plan_attack(
    vitals: Option<&Vitals>,
    combat: &MeleeCombat,
    playback: &dyn AnimationPlayback,
    armament: Armament<'_>,
    classes: &WeaponClasses,
) -> Result<AttackPlan, CombatError> {
    if vitals.is_some_and(|v| !v.is_alive()) {
        return Err(CombatError::Dead);
    }
    if !combat.can_attack {
        return Err(CombatError::AttackDisabled);
    }
    if playback.is_any_montage_playing() {
        return Err(CombatError::MontagePlaying);
    }

    let (definition, source, base_damage, damage, collision) = match armament {
        Armament::Unarmed => {
            let definition = combat.unarmed_attacks.get(combat.unarmed_index).ok_or(
                CombatError::UnarmedAttackIndex {
                    index: combat.unarmed_index,
                    count: combat.unarmed_attacks.len(),
                },
            )?;
            (
                definition,
                AttackSource::Unarmed,
                combat.base_damage,
                definition.damage,
                definition.collision.clone(),
            )
        }
        Armament::Armed { entity, weapon } => {
            if !weapon.tag.is_valid() {
                return Err(CombatError::EmptyWeaponTag);
            }
            let class = classes
                .get(&weapon.class)
                .ok_or_else(|| CombatError::UnknownWeaponClass(weapon.class.clone()))?;
            let definition = class
                .find_attack(&weapon.tag)
                .ok_or_else(|| CombatError::NoAttackForTag(weapon.tag.clone()))?;

            let (damage, collision) = if definition.override_collision_params {
                (definition.damage, definition.collision.clone())
            } else {
                (weapon.damage, weapon.collision.clone())
            };
            (definition, AttackSource::Weapon(entity), weapon.base_damage, damage, collision)
        }
        Armament::Missing(entity) => return Err(CombatError::MissingWeapon(entity)),
    };

    let montage = definition.montage.clone().ok_or(CombatError::MissingMontage)?;
    let strike = strike_effect(definition, base_damage, damage, &collision)?;

    Ok(AttackPlan {
        attack: ActiveAttack {
            montage: montage.name.clone(),
            source,
            base_damage,
            damage,
            collision,
            strike: None,
        },
        montage,
        strike,
    })
}

fn strike_effect(
    definition: &AttackDefinition,
    base_damage: f32,
    damage: DamageParams,
    collision: &CollisionParams,
) -> Result<Option<(f32, DelayedEffect)>, CombatError> {
    let Some(delay) = definition.strike_delay else {
        return Ok(None);
    };
    let delay = validate_delay(delay)?;
    let collision = if collision.uses_forward_ray {
        collision.clone()
    } else {
        CollisionParams {
            debug_draw: collision.debug_draw,
            ..CollisionParams::forward_ray(collision.forward_range, collision.sweep_radius)
        }
    };
    Ok(Some((
        delay,
        DelayedEffect::ForwardStrike {
            base_damage,
            damage,
            collision,
        },
    )))
}

/// Plays the montage, schedules the strike and stores the active attack.
pub fn commit_attack(
    plan: AttackPlan,
    combat: &mut MeleeCombat,
    playback: &mut dyn AnimationPlayback,
    effects: &mut ScheduledEffects,
) {
    let AttackPlan {
        montage,
        mut attack,
        strike,
    } = plan;

    combat.end_window();
    playback.play(&montage);

    if let Some((delay, effect)) = strike {
        // Delay уже проверен в plan_attack
        attack.strike = effects.schedule(delay, effect, true).ok();
    }

    combat.active_attack = Some(attack);
}

/// Preconditions are traced, configuration errors are warnings.
pub fn report_error(diagnostics: &dyn DiagnosticsSink, entity: Entity, action: &str, err: &CombatError) {
    let message = format!("{} for {:?}: {}", action, entity, err);
    if err.is_precondition() {
        diagnostics.trace(&format!("🚫 {}", message));
    } else {
        diagnostics.warn(&format!("⚠️ {}", message));
    }
}

/// Window-begin routing: unarmed → hand flag, weapon → weapon collision.
pub fn open_attack_window(combat: &mut MeleeCombat, weapon: Option<&mut Weapon>, part: CollisionPart) {
    let Some(attack) = combat.active_attack.as_ref() else {
        return;
    };

    match (attack.source, weapon) {
        (AttackSource::Unarmed, _) => {
            let path = combat.unarmed_socket_path(part);
            combat.window.on_begin(part, path);
            combat.attacking_with_hands = true;
        }
        (AttackSource::Weapon(_), Some(weapon)) => {
            weapon.window.on_begin(part, attack.collision.sockets.clone());
            weapon.collision_active = true;
        }
        (AttackSource::Weapon(_), None) => {}
    }
}

/// Window-end routing. Also used as the forced end (interrupt, death).
pub fn close_attack_window(combat: &mut MeleeCombat, weapon: Option<&mut Weapon>) {
    combat.end_window();
    if let Some(weapon) = weapon {
        weapon.end_window();
    }
}

/// Everything one window sweep needs.
pub struct WindowSweep<'a> {
    pub frame: u64,
    pub instigator: SweepInstigator,
    pub points: &'a [Vec3],
    pub params: &'a CollisionParams,
    pub filter: Group,
    pub ignore: &'a [Entity],
}

/// One sweep of an open window; returns only targets not struck yet.
///
/// At most one sweep per window per frame: a second call with the same
/// frame returns nothing and does not touch `trace`.
pub fn sweep_window(
    window: &mut AttackWindowState,
    request: &WindowSweep<'_>,
    trace: &dyn SweepTrace,
    diagnostics: &dyn DiagnosticsSink,
) -> Vec<HitResult> {
    if !window.claim_frame(request.frame) {
        return Vec::new();
    }

    build_and_execute_sweep(
        &request.instigator,
        request.points,
        request.params,
        request.filter,
        request.ignore,
        trace,
        diagnostics,
    )
    .into_iter()
    .filter(|hit| window.try_strike(hit.actor))
    .collect()
}
