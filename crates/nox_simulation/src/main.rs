//! Headless симуляция NOX
//!
//! Fighter бьёт training dummy голыми руками, потом мечом.
//! Запускает Bevy App без рендера, health печатается через logger.

use bevy::prelude::*;
use nox_simulation::combat::{CollisionParams, DamageParams};
use nox_simulation::*;

fn punch() -> Montage {
    Montage::new("punch", 0.6).with_window(0.15, 0.45, CollisionPart::RightHand)
}

fn slash() -> Montage {
    Montage::new("slash", 0.8).with_window(0.2, 0.5, CollisionPart::RightHand)
}

fn spawn_fighter(app: &mut App) -> Entity {
    let mut combat = MeleeCombat::default()
        .with_unarmed_attack(AttackDefinition::unarmed(punch()).with_damage(DamageParams::additional(5.0)));
    combat.limbs.right_hand = vec!["upperarm_r".into(), "hand_r".into()];

    app.world_mut()
        .spawn((
            Actor,
            Team(1),
            Transform::default(),
            combat,
            SocketSet::new()
                .with_socket("upperarm_r", Vec3::new(0.3, 1.4, -0.2))
                .with_socket("hand_r", Vec3::new(0.3, 1.4, -1.0))
                .with_socket("hand_r_grip", Vec3::new(0.3, 1.4, -0.4)),
            EquipSettings::default().with_default_class("longsword"),
        ))
        .id()
}

fn spawn_dummy(app: &mut App) -> Entity {
    app.world_mut()
        .spawn((
            Actor,
            Team(2),
            Vitals::new(100.0, 0.0),
            Transform::from_xyz(0.0, 0.0, -1.2),
            Hurtbox::default(),
        ))
        .id()
}

fn run_ticks(app: &mut App, ticks: usize, dummy: Entity) {
    for _ in 0..ticks {
        app.update();
    }
    if let Some(vitals) = app.world().get::<Vitals>(dummy) {
        log_info(&format!(
            "Dummy health: {:.1}/{:.1} ({:.0}%)",
            vitals.health.current,
            vitals.health.max,
            vitals.health.percentage * 100.0
        ));
    }
}

/// После смерти dummy уходит в нейтральную команду
fn log_attitude(app: &App, fighter: Entity, dummy: Entity) {
    let world = app.world();
    if let (Some(own), Some(other)) = (world.get::<Team>(fighter), world.get::<Team>(dummy)) {
        log_info(&format!("Fighter attitude towards dummy: {:?}", own.attitude_towards(*other)));
    }
}

fn main() {
    let seed = 42;
    let mut app = create_headless_app(seed);
    log_info(&format!("Starting NOX headless simulation (seed: {})", seed));

    let mut longsword = WeaponClass::new("longsword", "sword", 40.0);
    longsword.damage = DamageParams::additional(10.0);
    longsword.collision = CollisionParams::socket_path(["blade_base", "blade_tip"], 0.2);
    longsword.sockets = SocketSet::new()
        .with_socket("blade_base", Vec3::ZERO)
        .with_socket("blade_tip", Vec3::new(0.0, 0.0, -1.0));
    longsword.attacks.push(AttackDefinition::for_weapon("sword", slash()));
    app.world_mut().resource_mut::<WeaponClasses>().register(longsword);

    let fighter = spawn_fighter(&mut app);
    let dummy = spawn_dummy(&mut app);

    log_attitude(&app, fighter, dummy);

    // Первый update без fixed tick
    app.update();

    app.world_mut().send_event(AttackIntent { entity: fighter });
    run_ticks(&mut app, 60, dummy);

    app.world_mut().send_event(EquipWeaponIntent {
        entity: fighter,
        class: None,
    });
    run_ticks(&mut app, 2, dummy);

    app.world_mut().send_event(AttackIntent { entity: fighter });
    run_ticks(&mut app, 60, dummy);

    let dead = app.world().get::<Dead>(dummy).is_some();
    log_info(&format!("Simulation complete! Dummy dead: {}", dead));
    log_attitude(&app, fighter, dummy);
}
