//! Attack window systems: routing begin/end, per-frame sweeps, cleanup.
//!
//! Sweep запускается из двух источников: tick notify от montage и
//! per-frame флаги (`attacking_with_hands`, `Weapon::collision_active`).
//! Оба пути идут через `AttackWindowState::claim_frame`, поэтому за frame
//! окно делает максимум один sweep.

use std::collections::HashSet;

use bevy::prelude::*;

use crate::animation::{AttackWindowNotify, MontageEnded, WindowPhase};
use crate::combat::components::{AttackSource, MeleeCombat, Weapon, WeaponVariant};
use crate::combat::config::CombatFrame;
use crate::combat::dispatcher::{close_attack_window, open_attack_window, report_error, sweep_window, WindowSweep};
use crate::combat::events::MeleeHit;
use crate::combat::hurtbox::{Hurtbox, HurtboxSweep};
use crate::combat::schedule::ScheduledEffects;
use crate::combat::sweep::SweepInstigator;
use crate::components::SocketSet;
use crate::diagnostics::CombatDiagnostics;

fn attack_weapon(combat: &MeleeCombat) -> Option<Entity> {
    match combat.active_attack.as_ref()?.source {
        AttackSource::Weapon(entity) => Some(entity),
        AttackSource::Unarmed => None,
    }
}

/// System: window begin/end → unarmed window или окно оружия.
pub fn route_attack_windows(
    mut notifies: EventReader<AttackWindowNotify>,
    mut attackers: Query<&mut MeleeCombat>,
    mut weapons: Query<&mut Weapon>,
) {
    for notify in notifies.read() {
        let Ok(mut combat) = attackers.get_mut(notify.entity) else {
            continue;
        };
        let mut weapon = match attack_weapon(&combat) {
            Some(entity) => weapons.get_mut(entity).ok(),
            None => None,
        };

        match notify.phase {
            WindowPhase::Begin => open_attack_window(&mut combat, weapon.as_deref_mut(), notify.part),
            WindowPhase::End => close_attack_window(&mut combat, weapon.as_deref_mut()),
            WindowPhase::Tick => {}
        }
    }
}

/// System: один sweep на открытое окно за frame → MeleeHit для новых целей.
pub fn sweep_attack_windows(
    frame: Res<CombatFrame>,
    mut notifies: EventReader<AttackWindowNotify>,
    mut attackers: Query<(Entity, &Transform, &SocketSet, &mut MeleeCombat)>,
    mut weapons: Query<(&mut Weapon, &Transform, &SocketSet), Without<MeleeCombat>>,
    hurtboxes: Query<(Entity, &Hurtbox, &Transform)>,
    diagnostics: Res<CombatDiagnostics>,
    mut hits: EventWriter<MeleeHit>,
) {
    let ticked: HashSet<Entity> = notifies
        .read()
        .filter(|notify| notify.phase == WindowPhase::Tick)
        .map(|notify| notify.entity)
        .collect();

    let sink = diagnostics.sink();
    let mut trace: Option<HurtboxSweep> = None;

    for (entity, transform, sockets, mut combat) in attackers.iter_mut() {
        let Some(attack) = combat.active_attack.clone() else {
            continue;
        };
        let requested = ticked.contains(&entity);
        let instigator = SweepInstigator::from_transform(entity, transform);
        let damage = attack.final_damage();
        let filter = combat.object_filter;

        let weapon_entity = attack_weapon(&combat);
        let variant = WeaponVariant::resolve(weapon_entity.is_some(), attack.collision.point_source);

        let new_hits = match (variant, weapon_entity) {
            (WeaponVariant::Unarmed, _) | (_, None) => {
                if !(combat.attacking_with_hands || requested) || !combat.window.is_open() {
                    continue;
                }

                let points = if attack.collision.uses_forward_ray {
                    Vec::new()
                } else {
                    match sockets.resolve(transform, combat.window.socket_path()) {
                        Ok(points) => points,
                        Err(err) => {
                            report_error(sink, entity, "Unarmed sweep skipped", &err);
                            continue;
                        }
                    }
                };

                let trace: &HurtboxSweep = trace.get_or_insert_with(|| HurtboxSweep::collect(hurtboxes.iter()));
                let request = WindowSweep {
                    frame: frame.0,
                    instigator,
                    points: &points,
                    params: &attack.collision,
                    filter,
                    ignore: &[entity],
                };
                sweep_window(&mut combat.window, &request, trace, sink)
            }
            (WeaponVariant::MeleeOverlap | WeaponVariant::MeleeSocketPath, Some(weapon_entity)) => {
                let Ok((mut weapon, weapon_local, weapon_sockets)) = weapons.get_mut(weapon_entity) else {
                    continue;
                };
                if !(weapon.collision_active || requested) || !weapon.window.is_open() {
                    continue;
                }

                let weapon_world = transform.mul_transform(*weapon_local);
                let mut params = attack.collision.clone();
                let points = if params.uses_forward_ray {
                    Vec::new()
                } else if variant == WeaponVariant::MeleeOverlap {
                    match weapon.overlap_volume {
                        Some(volume) => {
                            params.sweep_radius = params.sweep_radius.max(volume.radius);
                            volume.axis_points(&weapon_world).to_vec()
                        }
                        // Без volume нет точек: builder сообщит о конфигурации
                        None => Vec::new(),
                    }
                } else {
                    match weapon_sockets.resolve(&weapon_world, weapon.window.socket_path()) {
                        Ok(points) => points,
                        Err(err) => {
                            report_error(sink, weapon_entity, "Weapon sweep skipped", &err);
                            continue;
                        }
                    }
                };

                let trace: &HurtboxSweep = trace.get_or_insert_with(|| HurtboxSweep::collect(hurtboxes.iter()));
                let request = WindowSweep {
                    frame: frame.0,
                    instigator,
                    points: &points,
                    params: &params,
                    filter,
                    ignore: &[entity, weapon_entity],
                };
                sweep_window(&mut weapon.window, &request, trace, sink)
            }
        };

        for hit in new_hits {
            sink.trace(&format!(
                "🎯 Melee hit: {:?} → {:?} at {:?} ({:.1} damage)",
                entity, hit.actor, hit.point, damage
            ));
            hits.write(MeleeHit {
                attacker: entity,
                target: hit.actor,
                component: hit.component,
                point: hit.point,
                damage,
            });
        }
    }
}

/// System: montage закончился → окна закрыты, атака снята.
///
/// Interrupt дополнительно отменяет attack-bound effects (forward strike).
pub fn cleanup_finished_attacks(
    mut ended: EventReader<MontageEnded>,
    mut attackers: Query<(&mut MeleeCombat, &mut ScheduledEffects)>,
    mut weapons: Query<&mut Weapon>,
) {
    for event in ended.read() {
        let Ok((mut combat, mut effects)) = attackers.get_mut(event.entity) else {
            continue;
        };

        let mut weapon = match attack_weapon(&combat) {
            Some(entity) => weapons.get_mut(entity).ok(),
            None => None,
        };
        close_attack_window(&mut combat, weapon.as_deref_mut());

        if event.interrupted {
            effects.cancel_attack_bound();
        }
        combat.active_attack = None;
    }
}
