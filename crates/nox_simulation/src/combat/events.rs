//! Combat events (intents in, results out).

use bevy::prelude::*;

use crate::combat::components::WeaponClassId;
use crate::combat::schedule::{DelayedEffect, EffectHandle};

/// Intent: entity хочет атаковать (input / AI)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AttackIntent {
    pub entity: Entity,
}

/// Intent: достать оружие (`class: None` → EquipSettings::default_class)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EquipWeaponIntent {
    pub entity: Entity,
    pub class: Option<WeaponClassId>,
}

/// Intent: убрать оружие
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct UnequipWeaponIntent {
    pub entity: Entity,
}

/// Событие: scheduled effect сработал
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DelayedEffectFired {
    pub entity: Entity,
    pub handle: EffectHandle,
    pub effect: DelayedEffect,
}

/// Событие: оружие заспавнено и прикреплено
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct WeaponEquipped {
    pub owner: Entity,
    pub weapon: Entity,
}

/// Событие: оружие уничтожено
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct WeaponUnequipped {
    pub owner: Entity,
    pub weapon: Entity,
}

/// Событие: sweep нашёл новую цель в открытом окне
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct MeleeHit {
    pub attacker: Entity,
    pub target: Entity,
    /// Hurtbox, в который попали
    pub component: Entity,
    pub point: Vec3,
    pub damage: f32,
}

/// Событие: урон нанесен
///
/// `applied` = 0, если цель не принимает урон.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub requested: f32,
    pub applied: f32,
    pub point: Vec3,
}

/// Событие: entity умер (первый переход health <= 0)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}
