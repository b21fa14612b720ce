//! Attack intent systems (dispatcher entry point).

use bevy::prelude::*;

use crate::animation::MontagePlayer;
use crate::combat::components::{EquippedWeapon, MeleeCombat, Weapon, WeaponClasses};
use crate::combat::dispatcher::{commit_attack, plan_attack, report_error, Armament};
use crate::combat::events::AttackIntent;
use crate::combat::schedule::ScheduledEffects;
use crate::components::Vitals;
use crate::diagnostics::CombatDiagnostics;

/// System: AttackIntent → выбор атаки → montage + active attack.
///
/// Отказ по preconditions (мёртв, атака запрещена, montage играет):
/// нормальный исход, только trace.
pub fn process_attack_intents(
    mut intents: EventReader<AttackIntent>,
    mut attackers: Query<(
        &mut MeleeCombat,
        &mut MontagePlayer,
        &mut ScheduledEffects,
        Option<&Vitals>,
        Option<&EquippedWeapon>,
    )>,
    weapons: Query<&Weapon>,
    classes: Res<WeaponClasses>,
    diagnostics: Res<CombatDiagnostics>,
) {
    let sink = diagnostics.sink();

    for intent in intents.read() {
        let Ok((mut combat, mut player, mut effects, vitals, equipped)) = attackers.get_mut(intent.entity) else {
            sink.warn(&format!(
                "⚠️ AttackIntent: entity {:?} has no MeleeCombat",
                intent.entity
            ));
            continue;
        };

        let armament = match equipped {
            None => Armament::Unarmed,
            Some(EquippedWeapon(weapon_entity)) => match weapons.get(*weapon_entity) {
                Ok(weapon) => Armament::Armed {
                    entity: *weapon_entity,
                    weapon,
                },
                Err(_) => Armament::Missing(*weapon_entity),
            },
        };

        match plan_attack(vitals, &combat, &*player, armament, &classes) {
            Ok(plan) => {
                sink.trace(&format!(
                    "⚔️ Attack started: {:?} plays '{}' ({:?}, damage {:.1})",
                    intent.entity,
                    plan.montage.name,
                    plan.attack.source,
                    plan.attack.final_damage()
                ));
                commit_attack(plan, &mut combat, &mut *player, &mut effects);
            }
            Err(err) => report_error(sink, intent.entity, "Attack rejected", &err),
        }
    }
}
