//! Damage application (Vitals Tracker entry point).

use bevy::prelude::*;

use crate::combat::events::{DamageDealt, EntityDied, MeleeHit};
use crate::components::{FloatingStatusBar, Vitals};
use crate::diagnostics::CombatDiagnostics;

/// System: apply damage от MeleeHit событий
///
/// 1. `Vitals::apply_damage` (0 если цель не принимает урон)
/// 2. DamageDealt всегда
/// 3. EntityDied только на первом переходе health <= 0
pub fn apply_melee_hits(
    mut hit_events: EventReader<MeleeHit>,
    mut targets: Query<&mut Vitals>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut entity_died_events: EventWriter<EntityDied>,
    diagnostics: Res<CombatDiagnostics>,
) {
    for hit in hit_events.read() {
        let Ok(mut vitals) = targets.get_mut(hit.target) else {
            diagnostics
                .sink()
                .trace(&format!("MeleeHit: target {:?} has no Vitals", hit.target));
            continue;
        };

        let outcome = vitals.apply_damage(hit.damage);

        damage_dealt_events.write(DamageDealt {
            attacker: hit.attacker,
            target: hit.target,
            requested: hit.damage,
            applied: outcome.applied,
            point: hit.point,
        });

        if outcome.killed {
            diagnostics.sink().trace(&format!(
                "💀 Entity {:?} died (killer: {:?}, health {:.1})",
                hit.target, hit.attacker, vitals.health.current
            ));
            entity_died_events.write(EntityDied {
                entity: hit.target,
                killer: Some(hit.attacker),
            });
        }
    }
}

/// System: status bar зеркалит проценты Vitals
pub fn sync_status_bars(mut actors: Query<(&Vitals, &mut FloatingStatusBar), Changed<Vitals>>) {
    for (vitals, mut bar) in actors.iter_mut() {
        bar.health_percentage = vitals.health.percentage;
        bar.mana_percentage = vitals.mana.percentage;
    }
}
