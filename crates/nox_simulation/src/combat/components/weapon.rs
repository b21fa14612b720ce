//! Weapon components: classes (authoring data) и carried weapon instance.

use std::collections::HashMap;
use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::damage::DamageParams;
use crate::combat::sweep::{CollisionParams, CollisionPointSource};
use crate::combat::window::AttackWindowState;
use crate::components::SocketSet;

use super::attack::AttackDefinition;

// ============================================================================
// Identifiers
// ============================================================================

/// Tag matched against `AttackDefinition::tag` (например "weapon.sword").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WeaponTag(pub String);

impl WeaponTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Empty or whitespace-only tags are invalid.
    pub fn is_valid(&self) -> bool {
        !self.0.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WeaponTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl fmt::Display for WeaponTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key in `WeaponClasses`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeaponClassId(pub String);

impl WeaponClassId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl From<&str> for WeaponClassId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for WeaponClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Weapon Class (authoring data)
// ============================================================================

/// Blade volume: capsule from the grip along local -Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlapVolume {
    pub length: f32,
    pub radius: f32,
}

impl OverlapVolume {
    /// World positions of the two axis ends (grip, tip).
    pub fn axis_points(&self, weapon_world: &Transform) -> [Vec3; 2] {
        [
            weapon_world.transform_point(Vec3::ZERO),
            weapon_world.transform_point(Vec3::NEG_Z * self.length),
        ]
    }
}

/// Everything needed to spawn and swing one kind of weapon.
#[derive(Debug, Clone)]
pub struct WeaponClass {
    pub id: WeaponClassId,
    pub tag: WeaponTag,
    pub base_damage: f32,
    /// Default damage modifiers (до override из AttackDefinition)
    pub damage: DamageParams,
    /// Default collision params (до override из AttackDefinition)
    pub collision: CollisionParams,
    /// Ordered; first exact tag match wins
    pub attacks: Vec<AttackDefinition>,
    pub sockets: SocketSet,
    pub overlap_volume: Option<OverlapVolume>,
}

impl WeaponClass {
    pub fn new(id: impl Into<WeaponClassId>, tag: impl Into<WeaponTag>, base_damage: f32) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            base_damage,
            damage: DamageParams::default(),
            collision: CollisionParams::default(),
            attacks: Vec::new(),
            sockets: SocketSet::default(),
            overlap_volume: None,
        }
    }

    /// First attack whose tag exactly equals `tag`.
    pub fn find_attack(&self, tag: &WeaponTag) -> Option<&AttackDefinition> {
        self.attacks.iter().find(|attack| attack.tag.as_ref() == Some(tag))
    }
}

/// Registry of weapon classes.
#[derive(Resource, Debug, Clone, Default)]
pub struct WeaponClasses {
    classes: HashMap<WeaponClassId, WeaponClass>,
}

impl WeaponClasses {
    pub fn register(&mut self, class: WeaponClass) -> &mut Self {
        self.classes.insert(class.id.clone(), class);
        self
    }

    pub fn get(&self, id: &WeaponClassId) -> Option<&WeaponClass> {
        self.classes.get(id)
    }
}

// ============================================================================
// Carried weapon
// ============================================================================

/// Weapon flavour as seen by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponVariant {
    Unarmed,
    MeleeOverlap,
    MeleeSocketPath,
}

impl WeaponVariant {
    pub fn resolve(weapon_equipped: bool, source: CollisionPointSource) -> Self {
        match (weapon_equipped, source) {
            (false, _) => WeaponVariant::Unarmed,
            (true, CollisionPointSource::ByVolumeOverlap) => WeaponVariant::MeleeOverlap,
            (true, CollisionPointSource::BySocketPath) => WeaponVariant::MeleeSocketPath,
        }
    }
}

/// Spawned weapon instance, exclusively owned by `owner`.
///
/// Transform is local to the owner (attached at the grip socket).
#[derive(Component, Debug, Clone)]
pub struct Weapon {
    pub owner: Entity,
    pub class: WeaponClassId,
    pub tag: WeaponTag,
    pub base_damage: f32,
    pub damage: DamageParams,
    pub collision: CollisionParams,
    pub overlap_volume: Option<OverlapVolume>,
    /// Own damage window (independent of the owner's unarmed window)
    pub window: AttackWindowState,
    /// Per-frame collision включена между window begin и end
    pub collision_active: bool,
}

impl Weapon {
    pub fn from_class(owner: Entity, class: &WeaponClass) -> Self {
        Self {
            owner,
            class: class.id.clone(),
            tag: class.tag.clone(),
            base_damage: class.base_damage,
            damage: class.damage,
            collision: class.collision.clone(),
            overlap_volume: class.overlap_volume,
            window: AttackWindowState::default(),
            collision_active: false,
        }
    }

    /// Stops per-frame collision and closes the window.
    pub fn end_window(&mut self) {
        self.window.on_end();
        self.collision_active = false;
    }
}

/// Owner → weapon relationship (zero or one).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquippedWeapon(pub Entity);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Montage;

    #[test]
    fn test_tag_validity() {
        assert!(WeaponTag::new("weapon.sword").is_valid());
        assert!(!WeaponTag::new("").is_valid());
        assert!(!WeaponTag::new("   ").is_valid());
    }

    #[test]
    fn test_find_attack_exact_match_first_wins() {
        let mut class = WeaponClass::new("sword", "weapon.sword", 40.0);
        class.attacks = vec![
            AttackDefinition::for_weapon("weapon.sword.heavy", Montage::new("heavy", 1.0)),
            AttackDefinition::for_weapon("weapon.sword", Montage::new("slash", 0.8)),
            AttackDefinition::for_weapon("weapon.sword", Montage::new("stab", 0.6)),
        ];

        let found = class.find_attack(&WeaponTag::new("weapon.sword")).expect("match");
        assert_eq!(found.montage.as_ref().map(|m| m.name.as_str()), Some("slash"));

        // Префикс не считается совпадением
        assert!(class.find_attack(&WeaponTag::new("weapon")).is_none());
    }

    #[test]
    fn test_variant_resolution() {
        assert_eq!(
            WeaponVariant::resolve(false, CollisionPointSource::ByVolumeOverlap),
            WeaponVariant::Unarmed
        );
        assert_eq!(
            WeaponVariant::resolve(true, CollisionPointSource::ByVolumeOverlap),
            WeaponVariant::MeleeOverlap
        );
        assert_eq!(
            WeaponVariant::resolve(true, CollisionPointSource::BySocketPath),
            WeaponVariant::MeleeSocketPath
        );
    }

    #[test]
    fn test_overlap_volume_axis() {
        let volume = OverlapVolume { length: 1.2, radius: 0.1 };
        let [grip, tip] = volume.axis_points(&Transform::from_xyz(0.0, 1.0, 0.0));

        assert_eq!(grip, Vec3::new(0.0, 1.0, 0.0));
        assert!((tip - Vec3::new(0.0, 1.0, -1.2)).length() < 1e-6);
    }
}
