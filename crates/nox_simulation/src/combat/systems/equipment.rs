//! Equip / unequip systems.
//!
//! Spawn/destroy оружия идёт через delayed effect (fixed delay после старта
//! equip montage). Delay 0 → синхронно в том же вызове, без scheduler.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, Sensor};

use crate::animation::{AnimationPlayback, MontagePlayer};
use crate::combat::collision;
use crate::combat::components::{
    EquipSettings, EquippedWeapon, Weapon, WeaponClass, WeaponClassId, WeaponClasses,
};
use crate::combat::dispatcher::report_error;
use crate::combat::events::{
    DelayedEffectFired, EquipWeaponIntent, UnequipWeaponIntent, WeaponEquipped, WeaponUnequipped,
};
use crate::combat::schedule::{validate_delay, DelayedEffect, ScheduledEffects};
use crate::combat::CombatError;
use crate::components::{SocketSet, Vitals};
use crate::diagnostics::CombatDiagnostics;

/// Default radius of a carried weapon's sensor when the class has no volume.
const CARRIED_SENSOR_RADIUS: f32 = 0.05;

/// Spawns `class` at the owner's grip socket, replacing the current weapon.
///
/// Spawned weapon is a child of the owner with a sensor collider that does
/// not collide with anything (owner included) while carried.
pub fn spawn_weapon(
    commands: &mut Commands,
    owner: Entity,
    owner_sockets: &SocketSet,
    settings: &EquipSettings,
    current: Option<Entity>,
    class: &WeaponClass,
) -> Result<Entity, CombatError> {
    let grip = owner_sockets
        .local(&settings.grip_socket)
        .ok_or_else(|| CombatError::MissingGripSocket(settings.grip_socket.clone()))?;

    if let Some(old) = current {
        commands.entity(old).despawn();
    }

    let sensor_radius = class.overlap_volume.map_or(CARRIED_SENSOR_RADIUS, |volume| volume.radius);
    let weapon = commands
        .spawn((
            Weapon::from_class(owner, class),
            class.sockets.clone(),
            Transform::from_translation(grip),
            ChildOf(owner),
            Collider::ball(sensor_radius),
            Sensor,
            collision::carried_weapon_groups(),
        ))
        .id();

    commands.entity(owner).insert(EquippedWeapon(weapon));
    Ok(weapon)
}

/// Destroys the carried weapon and clears the relationship.
pub fn destroy_weapon(commands: &mut Commands, owner: Entity, weapon: Entity) {
    commands.entity(weapon).despawn();
    commands.entity(owner).remove::<EquippedWeapon>();
}

type EquipOwner = (
    &'static SocketSet,
    &'static EquipSettings,
    Option<&'static EquippedWeapon>,
    &'static mut MontagePlayer,
    &'static mut ScheduledEffects,
    Option<&'static Vitals>,
);

fn is_dead(vitals: Option<&Vitals>) -> bool {
    vitals.is_some_and(|v| !v.is_alive())
}

/// Equip preconditions + class lookup (intent class, иначе default).
pub fn resolve_equip_class<'a>(
    requested: Option<&WeaponClassId>,
    settings: &EquipSettings,
    vitals: Option<&Vitals>,
    montage_playing: bool,
    classes: &'a WeaponClasses,
) -> Result<&'a WeaponClass, CombatError> {
    if is_dead(vitals) {
        return Err(CombatError::Dead);
    }
    if montage_playing {
        return Err(CombatError::MontagePlaying);
    }
    let class_id = requested
        .or(settings.default_class.as_ref())
        .ok_or(CombatError::NoDefaultWeaponClass)?;
    classes
        .get(class_id)
        .ok_or_else(|| CombatError::UnknownWeaponClass(class_id.clone()))
}

/// System: EquipWeaponIntent / UnequipWeaponIntent
pub fn process_equip_intents(
    mut commands: Commands,
    mut equip_intents: EventReader<EquipWeaponIntent>,
    mut unequip_intents: EventReader<UnequipWeaponIntent>,
    mut owners: Query<EquipOwner>,
    weapons: Query<(), With<Weapon>>,
    classes: Res<WeaponClasses>,
    diagnostics: Res<CombatDiagnostics>,
    mut equipped_events: EventWriter<WeaponEquipped>,
    mut unequipped_events: EventWriter<WeaponUnequipped>,
) {
    let sink = diagnostics.sink();

    for intent in equip_intents.read() {
        let Ok((sockets, settings, equipped, mut player, mut effects, vitals)) = owners.get_mut(intent.entity) else {
            continue;
        };

        let result = resolve_equip_class(
            intent.class.as_ref(),
            settings,
            vitals,
            player.is_any_montage_playing(),
            &classes,
        );

        let class = match result.and_then(|class| validate_delay(settings.equip_delay).map(|_| class)) {
            Ok(class) => class,
            Err(err) => {
                report_error(sink, intent.entity, "Equip rejected", &err);
                continue;
            }
        };

        if let Some(montage) = settings.equip_montage.as_ref() {
            player.play(montage);
        }

        if settings.equip_delay <= 0.0 {
            let current = equipped.map(|e| e.0).filter(|e| weapons.contains(*e));
            match spawn_weapon(&mut commands, intent.entity, sockets, settings, current, class) {
                Ok(weapon) => {
                    if let Some(old) = current {
                        unequipped_events.write(WeaponUnequipped { owner: intent.entity, weapon: old });
                    }
                    equipped_events.write(WeaponEquipped { owner: intent.entity, weapon });
                    sink.trace(&format!("🗡️ {:?} equipped '{}' ({:?})", intent.entity, class.id, weapon));
                }
                Err(err) => report_error(sink, intent.entity, "Equip failed", &err),
            }
        } else if let Err(err) = effects.schedule(
            settings.equip_delay,
            DelayedEffect::SpawnWeapon { class: class.id.clone() },
            false,
        ) {
            report_error(sink, intent.entity, "Equip failed", &err);
        }
    }

    for intent in unequip_intents.read() {
        let Ok((_, settings, equipped, mut player, mut effects, _)) = owners.get_mut(intent.entity) else {
            continue;
        };

        let Some(weapon) = equipped.map(|e| e.0).filter(|e| weapons.contains(*e)) else {
            sink.trace(&format!("🚫 Unequip ignored for {:?}: nothing equipped", intent.entity));
            continue;
        };
        if player.is_any_montage_playing() {
            report_error(sink, intent.entity, "Unequip rejected", &CombatError::MontagePlaying);
            continue;
        }
        if let Err(err) = validate_delay(settings.unequip_delay) {
            report_error(sink, intent.entity, "Unequip rejected", &err);
            continue;
        }

        if let Some(montage) = settings.unequip_montage.as_ref() {
            player.play(montage);
        }

        if settings.unequip_delay <= 0.0 {
            destroy_weapon(&mut commands, intent.entity, weapon);
            unequipped_events.write(WeaponUnequipped { owner: intent.entity, weapon });
        } else if let Err(err) = effects.schedule(settings.unequip_delay, DelayedEffect::DestroyWeapon { weapon }, false) {
            report_error(sink, intent.entity, "Unequip failed", &err);
        }
    }
}

/// System: SpawnWeapon / DestroyWeapon effects после equip delay
pub fn apply_equipment_effects(
    mut commands: Commands,
    mut fired_events: EventReader<DelayedEffectFired>,
    owners: Query<(&SocketSet, &EquipSettings, Option<&EquippedWeapon>, Option<&Vitals>)>,
    weapons: Query<&Weapon>,
    classes: Res<WeaponClasses>,
    diagnostics: Res<CombatDiagnostics>,
    mut equipped_events: EventWriter<WeaponEquipped>,
    mut unequipped_events: EventWriter<WeaponUnequipped>,
) {
    let sink = diagnostics.sink();

    for fired in fired_events.read() {
        let owner = fired.entity;
        let Ok((sockets, settings, equipped, vitals)) = owners.get(owner) else {
            continue;
        };
        let current = equipped.map(|e| e.0).filter(|e| weapons.contains(*e));

        match &fired.effect {
            DelayedEffect::SpawnWeapon { class } => {
                if is_dead(vitals) {
                    continue;
                }
                let Some(class) = classes.get(class) else {
                    report_error(sink, owner, "Equip failed", &CombatError::UnknownWeaponClass(class.clone()));
                    continue;
                };
                match spawn_weapon(&mut commands, owner, sockets, settings, current, class) {
                    Ok(weapon) => {
                        if let Some(old) = current {
                            unequipped_events.write(WeaponUnequipped { owner, weapon: old });
                        }
                        equipped_events.write(WeaponEquipped { owner, weapon });
                        sink.trace(&format!("🗡️ {:?} equipped '{}' ({:?})", owner, class.id, weapon));
                    }
                    Err(err) => report_error(sink, owner, "Equip failed", &err),
                }
            }
            DelayedEffect::DestroyWeapon { weapon } => {
                // Оружие могли уже заменить или уничтожить
                if current != Some(*weapon) {
                    continue;
                }
                let Ok(carried) = weapons.get(*weapon) else {
                    continue;
                };
                if carried.owner != owner {
                    continue;
                }
                destroy_weapon(&mut commands, owner, *weapon);
                unequipped_events.write(WeaponUnequipped { owner, weapon: *weapon });
            }
            DelayedEffect::ForwardStrike { .. } => {}
        }
    }
}
