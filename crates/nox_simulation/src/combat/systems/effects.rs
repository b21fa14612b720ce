//! Scheduled effect systems: timers + delayed forward strike.

use std::collections::HashSet;

use bevy::prelude::*;

use crate::animation::MontagePlayer;
use crate::combat::components::MeleeCombat;
use crate::combat::damage::resolve_damage;
use crate::combat::events::{DelayedEffectFired, MeleeHit};
use crate::combat::hurtbox::{Hurtbox, HurtboxSweep};
use crate::combat::schedule::{DelayedEffect, ScheduledEffects};
use crate::combat::sweep::{build_and_execute_sweep, SweepInstigator};
use crate::diagnostics::CombatDiagnostics;

/// System: tick one-shot timers → DelayedEffectFired
pub fn tick_scheduled_effects(
    time: Res<Time<Fixed>>,
    mut owners: Query<(Entity, &mut ScheduledEffects)>,
    mut fired_events: EventWriter<DelayedEffectFired>,
) {
    let delta = time.delta();

    for (entity, mut effects) in owners.iter_mut() {
        if effects.is_empty() {
            continue;
        }
        for (handle, effect) in effects.tick(delta) {
            fired_events.write(DelayedEffectFired { entity, handle, effect });
        }
    }
}

/// System: ForwardStrike → один forward sweep, каждая цель максимум один раз.
///
/// Strike отменённой атаки (interrupt, смерть, новая атака) не срабатывает,
/// даже если timer истёк раньше, чем cleanup успел его отменить.
pub fn execute_forward_strikes(
    mut fired_events: EventReader<DelayedEffectFired>,
    mut attackers: Query<(&Transform, &mut MeleeCombat, &MontagePlayer)>,
    hurtboxes: Query<(Entity, &Hurtbox, &Transform)>,
    diagnostics: Res<CombatDiagnostics>,
    mut hits: EventWriter<MeleeHit>,
) {
    let sink = diagnostics.sink();

    for fired in fired_events.read() {
        let DelayedEffect::ForwardStrike {
            base_damage,
            damage,
            collision,
        } = &fired.effect
        else {
            continue;
        };

        let Ok((transform, mut combat, player)) = attackers.get_mut(fired.entity) else {
            continue;
        };

        // Strike живёт только пока играет montage своей атаки
        let Some(attack) = combat
            .active_attack
            .as_mut()
            .filter(|attack| attack.strike == Some(fired.handle))
        else {
            sink.trace(&format!("🚫 Forward strike of {:?} dropped: attack is over", fired.entity));
            continue;
        };
        attack.strike = None;
        if player.current_montage().map(|montage| montage.name.as_str()) != Some(attack.montage.as_str()) {
            sink.trace(&format!("🚫 Forward strike of {:?} dropped: montage interrupted", fired.entity));
            continue;
        }

        let trace = HurtboxSweep::collect(hurtboxes.iter());
        let instigator = SweepInstigator::from_transform(fired.entity, transform);
        let amount = resolve_damage(*base_damage, damage);

        let mut struck = HashSet::new();
        for hit in build_and_execute_sweep(
            &instigator,
            &[],
            collision,
            combat.object_filter,
            &[fired.entity],
            &trace,
            sink,
        ) {
            if !struck.insert(hit.actor) {
                continue;
            }
            hits.write(MeleeHit {
                attacker: fired.entity,
                target: hit.actor,
                component: hit.component,
                point: hit.point,
                damage: amount,
            });
        }

        sink.trace(&format!(
            "🗡️ Forward strike from {:?}: {} target(s), {:.1} damage",
            fired.entity,
            struck.len(),
            amount
        ));
    }
}
