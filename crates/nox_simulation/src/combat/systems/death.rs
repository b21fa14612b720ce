//! Death transition.
//!
//! Один атомарный шаг на EntityDied: нейтральная команда, урон выключен,
//! locomotion и AI stimuli выключены, status bar скрыт, окна закрыты,
//! attack-bound effects отменены, death montage или ragdoll.

use bevy::prelude::*;
use bevy_rapier3d::prelude::RigidBody;
use rand::Rng;

use crate::animation::{AnimationPlayback, MontagePlayer};
use crate::combat::collision;
use crate::combat::components::{AttackSource, DeathSettings, Dead, MeleeCombat, Ragdoll, Weapon};
use crate::combat::config::CombatConfig;
use crate::combat::events::EntityDied;
use crate::combat::hurtbox::Hurtbox;
use crate::combat::schedule::ScheduledEffects;
use crate::components::{FloatingStatusBar, Locomotion, PerceptionStimuli, Team, Vitals};
use crate::diagnostics::CombatDiagnostics;
use crate::DeterministicRng;

/// Flips the state switches of a dead actor. Missing components are skipped.
pub fn enter_dead_state(
    neutral: Team,
    vitals: &mut Vitals,
    team: Option<&mut Team>,
    locomotion: Option<&mut Locomotion>,
    stimuli: Option<&mut PerceptionStimuli>,
    status_bar: Option<&mut FloatingStatusBar>,
) {
    vitals.alive = false;
    vitals.can_be_damaged = false;

    if let Some(team) = team {
        *team = neutral;
    }
    if let Some(locomotion) = locomotion {
        locomotion.enabled = false;
    }
    if let Some(stimuli) = stimuli {
        stimuli.enabled = false;
    }
    if let Some(bar) = status_bar {
        bar.visible = false;
    }
}

/// Death variant index: fixed selection, random, or the first slot.
pub fn select_death_variant(settings: &DeathSettings, random: bool, rng: &mut impl Rng) -> Option<usize> {
    if let Some(index) = settings.selected {
        return Some(index);
    }
    if settings.montages.is_empty() {
        return None;
    }
    if random {
        Some(rng.gen_range(0..settings.montages.len()))
    } else {
        Some(0)
    }
}

type DyingActor = (
    &'static mut Vitals,
    Option<&'static mut Team>,
    Option<&'static mut Locomotion>,
    Option<&'static mut PerceptionStimuli>,
    Option<&'static mut FloatingStatusBar>,
    Option<&'static mut MeleeCombat>,
    Option<&'static mut MontagePlayer>,
    Option<&'static mut ScheduledEffects>,
    Option<&'static mut Hurtbox>,
    Option<&'static DeathSettings>,
    Has<Dead>,
);

/// System: EntityDied → death transition (ровно один раз на entity)
pub fn handle_deaths(
    mut commands: Commands,
    mut died_events: EventReader<EntityDied>,
    mut actors: Query<DyingActor>,
    mut weapons: Query<&mut Weapon>,
    config: Res<CombatConfig>,
    mut rng: ResMut<DeterministicRng>,
    diagnostics: Res<CombatDiagnostics>,
) {
    for event in died_events.read() {
        let Ok((
            mut vitals,
            team,
            locomotion,
            stimuli,
            status_bar,
            combat,
            player,
            effects,
            hurtbox,
            death_settings,
            already_dead,
        )) = actors.get_mut(event.entity)
        else {
            continue;
        };

        if already_dead {
            continue;
        }

        enter_dead_state(
            config.neutral_team,
            &mut vitals,
            team.map(|t| t.into_inner()),
            locomotion.map(|l| l.into_inner()),
            stimuli.map(|s| s.into_inner()),
            status_bar.map(|b| b.into_inner()),
        );

        // Окна закрываются немедленно, не дожидаясь interrupt сигналов
        if let Some(mut combat) = combat {
            if let Some(AttackSource::Weapon(weapon_entity)) = combat.active_attack.as_ref().map(|a| a.source) {
                if let Ok(mut weapon) = weapons.get_mut(weapon_entity) {
                    weapon.end_window();
                }
            }
            combat.end_window();
            combat.active_attack = None;
        }

        if let Some(mut effects) = effects {
            effects.cancel_attack_bound();
        }

        if let Some(mut hurtbox) = hurtbox {
            hurtbox.memberships = collision::group(collision::COLLISION_LAYER_CORPSES);
        }

        let death_montage = death_settings.and_then(|settings| {
            select_death_variant(settings, config.random_death_variant, &mut rng.rng)
                .and_then(|index| settings.montage_at(index))
        });

        let mut entity_commands = commands.entity(event.entity);
        entity_commands.insert((Dead, collision::corpse_groups()));

        match (death_montage, player) {
            (Some(montage), Some(mut player)) => {
                player.play(montage);
                diagnostics.sink().trace(&format!(
                    "💀 {:?} plays death montage '{}'",
                    event.entity, montage.name
                ));
            }
            (_, player) => {
                if let Some(mut player) = player {
                    player.interrupt();
                }
                entity_commands.insert((Ragdoll, RigidBody::Dynamic));
                diagnostics
                    .sink()
                    .trace(&format!("💀 {:?} has no death montage, ragdoll", event.entity));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Montage;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_enter_dead_state_flips_everything() {
        let mut vitals = Vitals::new(10.0, 0.0);
        let mut team = Team(3);
        let mut locomotion = Locomotion::default();
        let mut stimuli = PerceptionStimuli::default();
        let mut bar = FloatingStatusBar::default();

        enter_dead_state(
            Team::NEUTRAL,
            &mut vitals,
            Some(&mut team),
            Some(&mut locomotion),
            Some(&mut stimuli),
            Some(&mut bar),
        );

        assert!(!vitals.alive);
        assert!(!vitals.can_be_damaged);
        assert_eq!(team, Team::NEUTRAL);
        assert!(!locomotion.enabled);
        assert_eq!(locomotion.effective_speed(), 0.0);
        assert!(!stimuli.enabled);
        assert!(!bar.visible);
    }

    #[test]
    fn test_death_variant_selection() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let settings = DeathSettings::default()
            .with_montage(Montage::new("death_a", 1.0))
            .with_montage(Montage::new("death_b", 1.0));

        assert_eq!(select_death_variant(&DeathSettings::default(), true, &mut rng), None);
        assert_eq!(select_death_variant(&settings, false, &mut rng), Some(0));

        for _ in 0..20 {
            let index = select_death_variant(&settings, true, &mut rng).expect("non-empty");
            assert!(index < 2);
        }

        let fixed = DeathSettings {
            selected: Some(5),
            ..settings
        };
        // Выбранный слот пустой → montage_at None → ragdoll
        assert_eq!(select_death_variant(&fixed, true, &mut rng), Some(5));
        assert!(fixed.montage_at(5).is_none());
    }
}
