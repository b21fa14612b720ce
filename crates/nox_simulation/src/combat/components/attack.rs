//! Melee combat component + attack definitions.
//!
//! `MeleeCombat` живёт на персонаже: unarmed атаки, unarmed window,
//! активная атака (unarmed или через оружие).

use bevy::prelude::*;
use bevy_rapier3d::prelude::Group;
use serde::{Deserialize, Serialize};

use crate::animation::{CollisionPart, Montage, MontagePlayer};
use crate::combat::collision;
use crate::combat::damage::{resolve_damage, DamageParams};
use crate::combat::schedule::{EffectHandle, ScheduledEffects};
use crate::combat::sweep::CollisionParams;
use crate::combat::window::AttackWindowState;
use crate::components::{SocketId, SocketSet};

use super::weapon::WeaponTag;

// ============================================================================
// Attack Definition (authoring data)
// ============================================================================

/// One performable attack. Immutable once authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackDefinition {
    pub montage: Option<Montage>,
    pub damage: DamageParams,
    pub collision: CollisionParams,
    /// Только для weapon атак: сравнивается с tag оружия
    pub tag: Option<WeaponTag>,
    /// Weapon атака: заменить collision + damage params оружия своими
    pub override_collision_params: bool,
    /// Forward strike через N секунд после старта montage
    pub strike_delay: Option<f32>,
}

impl AttackDefinition {
    pub fn unarmed(montage: Montage) -> Self {
        Self {
            montage: Some(montage),
            damage: DamageParams::default(),
            collision: CollisionParams::default(),
            tag: None,
            override_collision_params: false,
            strike_delay: None,
        }
    }

    pub fn for_weapon(tag: impl Into<WeaponTag>, montage: Montage) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Self::unarmed(montage)
        }
    }

    pub fn with_damage(mut self, damage: DamageParams) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_collision(mut self, collision: CollisionParams) -> Self {
        self.collision = collision;
        self
    }

    /// Opt into replacing the weapon's own params.
    pub fn overriding_weapon_params(mut self) -> Self {
        self.override_collision_params = true;
        self
    }

    pub fn with_strike_delay(mut self, delay: f32) -> Self {
        self.strike_delay = Some(delay);
        self
    }
}

// ============================================================================
// Active attack
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackSource {
    Unarmed,
    Weapon(Entity),
}

/// Attack in progress with its params already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveAttack {
    pub montage: String,
    pub source: AttackSource,
    pub base_damage: f32,
    pub damage: DamageParams,
    pub collision: CollisionParams,
    /// Scheduled forward strike (если есть)
    pub strike: Option<EffectHandle>,
}

impl ActiveAttack {
    pub fn final_damage(&self) -> f32 {
        resolve_damage(self.base_damage, &self.damage)
    }
}

// ============================================================================
// Melee Combat Component
// ============================================================================

/// Socket chains of the character's limbs (root → tip).
#[derive(Debug, Clone, Default)]
pub struct LimbSockets {
    pub right_hand: Vec<SocketId>,
    pub left_hand: Vec<SocketId>,
}

impl LimbSockets {
    pub fn for_part(&self, part: CollisionPart) -> Option<&[SocketId]> {
        match part {
            CollisionPart::None => None,
            CollisionPart::RightHand => Some(self.right_hand.as_slice()),
            CollisionPart::LeftHand => Some(self.left_hand.as_slice()),
        }
    }
}

/// Melee capability of a character.
#[derive(Component, Debug, Clone)]
#[require(MontagePlayer, ScheduledEffects, SocketSet)]
pub struct MeleeCombat {
    /// Base damage для unarmed атак
    pub base_damage: f32,
    pub unarmed_attacks: Vec<AttackDefinition>,
    /// Какая unarmed атака играется
    pub unarmed_index: usize,
    pub can_attack: bool,
    /// Per-frame sweep руками (между window begin и end)
    pub attacking_with_hands: bool,
    /// Unarmed window (оружие держит своё)
    pub window: AttackWindowState,
    pub active_attack: Option<ActiveAttack>,
    pub limbs: LimbSockets,
    pub object_filter: Group,
}

impl Default for MeleeCombat {
    fn default() -> Self {
        Self {
            base_damage: 25.0,
            unarmed_attacks: Vec::new(),
            unarmed_index: 0,
            can_attack: true,
            attacking_with_hands: false,
            window: AttackWindowState::default(),
            active_attack: None,
            limbs: LimbSockets::default(),
            object_filter: collision::default_sweep_filter(),
        }
    }
}

impl MeleeCombat {
    pub fn with_unarmed_attack(mut self, attack: AttackDefinition) -> Self {
        self.unarmed_attacks.push(attack);
        self
    }

    /// Socket path for an unarmed window of `part`.
    ///
    /// `None` part (или пустая limb chain) → сокеты активной атаки.
    pub fn unarmed_socket_path(&self, part: CollisionPart) -> Vec<SocketId> {
        match self.limbs.for_part(part) {
            Some(chain) if !chain.is_empty() => chain.to_vec(),
            _ => self
                .active_attack
                .as_ref()
                .map(|attack| attack.collision.sockets.clone())
                .unwrap_or_default(),
        }
    }

    /// Forced end of the unarmed window (interrupt, death, montage end).
    pub fn end_window(&mut self) {
        self.window.on_end();
        self.attacking_with_hands = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combat_with_sockets() -> MeleeCombat {
        let mut combat = MeleeCombat::default();
        combat.limbs.right_hand = vec!["upperarm_r".into(), "hand_r".into()];
        combat.active_attack = Some(ActiveAttack {
            montage: "kick".into(),
            source: AttackSource::Unarmed,
            base_damage: 25.0,
            damage: DamageParams::additional(5.0),
            collision: CollisionParams::socket_path(["thigh_l", "foot_l"], 0.2),
            strike: None,
        });
        combat
    }

    #[test]
    fn test_unarmed_socket_path_by_part() {
        let combat = combat_with_sockets();

        assert_eq!(
            combat.unarmed_socket_path(CollisionPart::RightHand),
            vec![SocketId::from("upperarm_r"), SocketId::from("hand_r")]
        );
        assert_eq!(
            combat.unarmed_socket_path(CollisionPart::None),
            vec![SocketId::from("thigh_l"), SocketId::from("foot_l")]
        );
        // Пустая левая рука → сокеты из атаки
        assert_eq!(combat.unarmed_socket_path(CollisionPart::LeftHand).len(), 2);
    }

    #[test]
    fn test_final_damage_uses_resolver() {
        let combat = combat_with_sockets();
        let attack = combat.active_attack.as_ref().expect("active");
        assert_eq!(attack.final_damage(), 30.0);
    }

    #[test]
    fn test_end_window_clears_hand_flag() {
        let mut combat = MeleeCombat::default();
        combat.window.on_begin(CollisionPart::RightHand, Vec::new());
        combat.attacking_with_hands = true;

        combat.end_window();
        assert!(!combat.window.is_open());
        assert!(!combat.attacking_with_hands);
    }
}
