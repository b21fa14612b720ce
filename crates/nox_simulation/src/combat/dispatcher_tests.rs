//! Tests for the attack dispatcher core.

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use bevy::prelude::*;
    use bevy_rapier3d::prelude::Group;

    use crate::animation::{AnimationPlayback, CollisionPart, Montage, MontagePlayer};
    use crate::combat::components::{
        AttackDefinition, AttackSource, MeleeCombat, Weapon, WeaponClass, WeaponClasses,
    };
    use crate::combat::damage::DamageParams;
    use crate::combat::dispatcher::*;
    use crate::combat::schedule::{DelayedEffect, ScheduledEffects};
    use crate::combat::sweep::{CollisionParams, HitResult, SweepInstigator, SweepSegment, SweepTrace};
    use crate::combat::CombatError;
    use crate::components::{SocketSet, Vitals};
    use crate::diagnostics::RecordingDiagnostics;

    /// Всегда находит одну и ту же цель, считает вызовы
    struct FixedTrace {
        target: Entity,
        segments: RefCell<Vec<SweepSegment>>,
    }

    impl FixedTrace {
        fn new(target: Entity) -> Self {
            Self {
                target,
                segments: RefCell::new(Vec::new()),
            }
        }
    }

    impl SweepTrace for FixedTrace {
        fn sweep(&self, segment: &SweepSegment, _radius: f32, _filter: Group, _ignore: &[Entity]) -> Vec<HitResult> {
            self.segments.borrow_mut().push(*segment);
            vec![HitResult {
                actor: self.target,
                component: self.target,
                point: segment.end,
            }]
        }
    }

    fn jab() -> AttackDefinition {
        AttackDefinition::unarmed(
            Montage::new("jab", 0.6).with_window(0.1, 0.4, CollisionPart::RightHand),
        )
        .with_damage(DamageParams::additional(5.0))
    }

    fn fighter() -> MeleeCombat {
        MeleeCombat::default().with_unarmed_attack(jab())
    }

    fn sword_class() -> WeaponClass {
        let mut class = WeaponClass::new("sword", "weapon.sword", 40.0);
        class.damage = DamageParams::additional(10.0);
        class.collision = CollisionParams {
            extra_range_at_tip: 0.3,
            ..CollisionParams::socket_path(["guard", "mid", "tip"], 0.1)
        };
        class.sockets = SocketSet::new()
            .with_socket("guard", Vec3::ZERO)
            .with_socket("mid", Vec3::new(0.0, 0.0, -0.5))
            .with_socket("tip", Vec3::new(0.0, 0.0, -1.0));
        class.attacks = vec![
            AttackDefinition::for_weapon("weapon.sword", Montage::new("slash", 0.8))
                .with_damage(DamageParams::overriding(99.0))
                .with_collision(CollisionParams::forward_ray(2.0, 0.5)),
        ];
        class
    }

    fn registry(class: WeaponClass) -> WeaponClasses {
        let mut classes = WeaponClasses::default();
        classes.register(class);
        classes
    }

    #[test]
    fn test_unarmed_plan_resolves_damage() {
        let combat = fighter();
        let plan = plan_attack(
            Some(&Vitals::default()),
            &combat,
            &MontagePlayer::default(),
            Armament::Unarmed,
            &WeaponClasses::default(),
        )
        .expect("unarmed attack");

        assert_eq!(plan.montage.name, "jab");
        assert_eq!(plan.attack.source, AttackSource::Unarmed);
        assert_eq!(plan.attack.final_damage(), 30.0);
        assert!(plan.strike.is_none());
    }

    #[test]
    fn test_preconditions() {
        let classes = WeaponClasses::default();
        let mut dead = Vitals::new(10.0, 0.0);
        dead.apply_damage(15.0);

        let err = plan_attack(Some(&dead), &fighter(), &MontagePlayer::default(), Armament::Unarmed, &classes);
        assert_eq!(err, Err(CombatError::Dead));

        let mut disabled = fighter();
        disabled.can_attack = false;
        let err = plan_attack(None, &disabled, &MontagePlayer::default(), Armament::Unarmed, &classes);
        assert_eq!(err, Err(CombatError::AttackDisabled));

        let mut busy = MontagePlayer::default();
        busy.play(&Montage::new("hit_react", 0.5));
        let err = plan_attack(None, &fighter(), &busy, Armament::Unarmed, &classes);
        assert_eq!(err, Err(CombatError::MontagePlaying));
    }

    #[test]
    fn test_unarmed_configuration_errors() {
        let classes = WeaponClasses::default();
        let player = MontagePlayer::default();

        let mut combat = fighter();
        combat.unarmed_index = 3;
        assert_eq!(
            plan_attack(None, &combat, &player, Armament::Unarmed, &classes),
            Err(CombatError::UnarmedAttackIndex { index: 3, count: 1 })
        );

        let mut no_montage = jab();
        no_montage.montage = None;
        let combat = MeleeCombat::default().with_unarmed_attack(no_montage);
        assert_eq!(
            plan_attack(None, &combat, &player, Armament::Unarmed, &classes),
            Err(CombatError::MissingMontage)
        );
    }

    #[test]
    fn test_weapon_tag_errors() {
        let owner = Entity::from_raw(1);
        let weapon_entity = Entity::from_raw(2);
        let class = sword_class();
        let classes = registry(class.clone());
        let player = MontagePlayer::default();
        let combat = fighter();

        let mut untagged = Weapon::from_class(owner, &class);
        untagged.tag = "".into();
        let armament = Armament::Armed { entity: weapon_entity, weapon: &untagged };
        assert_eq!(
            plan_attack(None, &combat, &player, armament, &classes),
            Err(CombatError::EmptyWeaponTag)
        );

        let mut axe = Weapon::from_class(owner, &class);
        axe.tag = "weapon.axe".into();
        let armament = Armament::Armed { entity: weapon_entity, weapon: &axe };
        assert_eq!(
            plan_attack(None, &combat, &player, armament, &classes),
            Err(CombatError::NoAttackForTag("weapon.axe".into()))
        );

        let sword = Weapon::from_class(owner, &class);
        let armament = Armament::Armed { entity: weapon_entity, weapon: &sword };
        assert_eq!(
            plan_attack(None, &combat, &player, armament, &WeaponClasses::default()),
            Err(CombatError::UnknownWeaponClass("sword".into()))
        );

        assert_eq!(
            plan_attack(None, &combat, &player, Armament::Missing(weapon_entity), &classes),
            Err(CombatError::MissingWeapon(weapon_entity))
        );
    }

    #[test]
    fn test_weapon_params_kept_without_override() {
        let class = sword_class();
        let classes = registry(class.clone());
        let weapon_entity = Entity::from_raw(2);
        let sword = Weapon::from_class(Entity::from_raw(1), &class);

        let plan = plan_attack(
            None,
            &fighter(),
            &MontagePlayer::default(),
            Armament::Armed { entity: weapon_entity, weapon: &sword },
            &classes,
        )
        .expect("weapon attack");

        assert_eq!(plan.attack.source, AttackSource::Weapon(weapon_entity));
        assert_eq!(plan.attack.collision, class.collision);
        assert_eq!(plan.attack.final_damage(), 50.0);
    }

    #[test]
    fn test_override_replaces_collision_and_damage() {
        let mut class = sword_class();
        class.attacks[0].override_collision_params = true;
        let classes = registry(class.clone());
        let sword = Weapon::from_class(Entity::from_raw(1), &class);

        let plan = plan_attack(
            None,
            &fighter(),
            &MontagePlayer::default(),
            Armament::Armed { entity: Entity::from_raw(2), weapon: &sword },
            &classes,
        )
        .expect("weapon attack");

        assert!(plan.attack.collision.uses_forward_ray);
        assert_eq!(plan.attack.final_damage(), 99.0);
    }

    #[test]
    fn test_socket_path_weapon_sweeps_two_segments() {
        let class = sword_class();
        let owner = Entity::from_raw(1);
        let target = Entity::from_raw(9);
        let sword = Weapon::from_class(owner, &class);

        let weapon_world = Transform::from_xyz(0.0, 1.0, 0.0);
        let points = class
            .sockets
            .resolve(&weapon_world, &sword.collision.sockets)
            .expect("sockets exist");
        assert_eq!(points.len(), 3);

        let mut window = crate::combat::window::AttackWindowState::default();
        window.on_begin(CollisionPart::None, sword.collision.sockets.clone());

        let trace = FixedTrace::new(target);
        let diagnostics = RecordingDiagnostics::new();
        let request = WindowSweep {
            frame: 1,
            instigator: SweepInstigator {
                entity: owner,
                position: Vec3::ZERO,
                forward: Vec3::NEG_Z,
            },
            points: &points,
            params: &sword.collision,
            filter: Group::ALL,
            ignore: &[owner],
        };
        let hits = sweep_window(&mut window, &request, &trace, &diagnostics);

        // Оба сегмента нашли target, но урон один
        assert_eq!(hits.len(), 1);
        let segments = trace.segments.borrow();
        assert_eq!(segments.len(), 2);
        assert!(segments[1].end.distance(Vec3::new(0.0, 1.0, -1.3)) < 1e-5);
    }

    #[test]
    fn test_window_sweep_idempotent_per_frame_and_deduplicated() {
        let target = Entity::from_raw(9);
        let trace = FixedTrace::new(target);
        let diagnostics = RecordingDiagnostics::new();
        let params = CollisionParams::forward_ray(1.5, 0.3);
        let mut window = crate::combat::window::AttackWindowState::default();
        window.on_begin(CollisionPart::None, Vec::new());

        let mut applied = 0;
        for frame in [1, 1, 2, 3] {
            let request = WindowSweep {
                frame,
                instigator: SweepInstigator {
                    entity: Entity::from_raw(1),
                    position: Vec3::ZERO,
                    forward: Vec3::NEG_Z,
                },
                points: &[],
                params: &params,
                filter: Group::ALL,
                ignore: &[],
            };
            applied += sweep_window(&mut window, &request, &trace, &diagnostics).len();
        }

        assert_eq!(applied, 1);
        // Frame 1 дважды → sweep только один раз
        assert_eq!(trace.segments.borrow().len(), 3);
    }

    #[test]
    fn test_commit_plays_montage_and_schedules_strike() {
        let mut combat = MeleeCombat::default().with_unarmed_attack(jab().with_strike_delay(0.2));
        let mut player = MontagePlayer::default();
        let mut effects = ScheduledEffects::default();

        let plan = plan_attack(None, &combat, &player, Armament::Unarmed, &WeaponClasses::default())
            .expect("unarmed attack");
        match &plan.strike {
            Some((delay, DelayedEffect::ForwardStrike { collision, .. })) => {
                assert_eq!(*delay, 0.2);
                assert!(collision.uses_forward_ray);
            }
            other => panic!("unexpected strike: {:?}", other),
        }

        commit_attack(plan, &mut combat, &mut player, &mut effects);

        assert!(player.is_any_montage_playing());
        let handle = combat
            .active_attack
            .as_ref()
            .and_then(|attack| attack.strike)
            .expect("strike scheduled");
        assert!(effects.is_scheduled(handle));

        // Interrupt/death отменяет attack-bound strike
        assert_eq!(effects.cancel_attack_bound(), 1);
    }

    #[test]
    fn test_non_finite_strike_delay_is_configuration_error() {
        let combat = MeleeCombat::default().with_unarmed_attack(jab().with_strike_delay(f32::INFINITY));

        let err = plan_attack(None, &combat, &MontagePlayer::default(), Armament::Unarmed, &WeaponClasses::default());
        assert_eq!(err, Err(CombatError::InvalidDelay(f32::INFINITY)));
        assert!(!CombatError::InvalidDelay(f32::INFINITY).is_precondition());
    }

    #[test]
    fn test_window_routing() {
        let class = sword_class();
        let owner = Entity::from_raw(1);
        let mut combat = fighter();
        let mut player = MontagePlayer::default();
        let mut effects = ScheduledEffects::default();

        let plan = plan_attack(None, &combat, &player, Armament::Unarmed, &WeaponClasses::default())
            .expect("unarmed attack");
        commit_attack(plan, &mut combat, &mut player, &mut effects);

        open_attack_window(&mut combat, None, CollisionPart::RightHand);
        assert!(combat.attacking_with_hands);
        assert!(combat.window.is_open());

        close_attack_window(&mut combat, None);
        assert!(!combat.attacking_with_hands);
        assert!(!combat.window.is_open());

        // Weapon атака: окно открывается у оружия
        let mut sword = Weapon::from_class(owner, &class);
        let plan = plan_attack(
            None,
            &combat,
            &MontagePlayer::default(),
            Armament::Armed { entity: Entity::from_raw(2), weapon: &sword },
            &registry(class.clone()),
        )
        .expect("weapon attack");
        commit_attack(plan, &mut combat, &mut MontagePlayer::default(), &mut effects);

        open_attack_window(&mut combat, Some(&mut sword), CollisionPart::None);
        assert!(sword.collision_active);
        assert!(sword.window.is_open());
        assert_eq!(sword.window.socket_path().len(), 3);
        assert!(!combat.attacking_with_hands);

        close_attack_window(&mut combat, Some(&mut sword));
        assert!(!sword.collision_active);
        assert!(!sword.window.is_open());
    }

    #[test]
    fn test_report_error_levels() {
        let diagnostics = RecordingDiagnostics::new();
        let entity = Entity::from_raw(3);

        report_error(&diagnostics, entity, "Attack", &CombatError::MontagePlaying);
        report_error(&diagnostics, entity, "Attack", &CombatError::EmptyWeaponTag);

        assert_eq!(diagnostics.traces().len(), 1);
        assert_eq!(diagnostics.warnings().len(), 1);
        assert!(diagnostics.warnings()[0].contains("empty tag"));
    }
}
