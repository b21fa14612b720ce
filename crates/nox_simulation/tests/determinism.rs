//! Determinism test: одинаковый seed → одинаковый исход боя.
//!
//! Death variant выбирается через DeterministicRng, поэтому при одном seed
//! выбранный montage совпадает между прогонами.

use bevy::prelude::*;
use nox_simulation::combat::{DamageParams, DeathSettings, Ragdoll};
use nox_simulation::*;

#[derive(Debug, PartialEq)]
struct Outcome {
    health: Vec<f32>,
    death_montages: Vec<Option<String>>,
    ragdolls: usize,
}

fn run_brawl(seed: u64) -> Outcome {
    let mut app = create_headless_app(seed);
    app.update();

    let mut combat = MeleeCombat::default().with_unarmed_attack(
        AttackDefinition::unarmed(
            Montage::new("punch", 0.6).with_window(0.15, 0.45, CollisionPart::RightHand),
        )
        .with_damage(DamageParams::additional(5.0)),
    );
    combat.limbs.right_hand = vec!["shoulder_r".into(), "fist_r".into()];

    // Широкий удар: задевает всех dummy в ряд
    let fighter = app
        .world_mut()
        .spawn((
            Actor,
            Team(1),
            Transform::default(),
            combat,
            SocketSet::new()
                .with_socket("shoulder_r", Vec3::new(-3.0, 1.0, -1.0))
                .with_socket("fist_r", Vec3::new(3.0, 1.0, -1.0)),
        ))
        .id();

    let deaths = DeathSettings::default()
        .with_montage(Montage::new("death_fall", 100.0))
        .with_montage(Montage::new("death_spin", 100.0))
        .with_montage(Montage::new("death_kneel", 100.0));

    let dummies: Vec<Entity> = (0..5)
        .map(|i| {
            app.world_mut()
                .spawn((
                    Actor,
                    Team(2),
                    Vitals::new(20.0 + i as f32 * 10.0, 0.0),
                    Transform::from_xyz(-2.0 + i as f32, 0.0, -1.0),
                    Hurtbox::default(),
                    MontagePlayer::default(),
                    deaths.clone(),
                ))
                .id()
        })
        .collect();

    for _ in 0..3 {
        app.world_mut().send_event(AttackIntent { entity: fighter });
        for _ in 0..60 {
            app.update();
        }
    }

    let world = app.world();
    Outcome {
        health: dummies
            .iter()
            .map(|e| world.get::<Vitals>(*e).map(|v| v.health.current).unwrap_or(f32::NAN))
            .collect(),
        death_montages: dummies
            .iter()
            .map(|e| {
                world
                    .get::<MontagePlayer>(*e)
                    .and_then(|p| p.current_montage())
                    .map(|m| m.name.clone())
            })
            .collect(),
        ragdolls: dummies.iter().filter(|e| world.get::<Ragdoll>(**e).is_some()).count(),
    }
}

#[test]
fn test_same_seed_same_outcome() {
    let first = run_brawl(42);
    let second = run_brawl(42);
    let third = run_brawl(42);

    assert_eq!(first, second);
    assert_eq!(second, third);
}

#[test]
fn test_brawl_kills_weak_dummies() {
    let outcome = run_brawl(7);

    // 3 удара по 30 урона, самому крепкому dummy (60 health) хватает двух
    assert!(outcome.health.iter().all(|h| *h <= 0.0), "{:?}", outcome.health);
    assert_eq!(outcome.ragdolls, 0, "death montage configured for every dummy");
    assert!(outcome.death_montages.iter().all(|m| m.as_deref().is_some_and(|n| n.starts_with("death_"))));
}
