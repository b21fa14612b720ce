//! Equip / unequip настройки персонажа.

use bevy::prelude::*;

use crate::animation::Montage;
use crate::components::SocketId;

use super::weapon::WeaponClassId;

/// How a character draws and holsters weapons.
///
/// Spawn/destroy happens `*_delay` seconds after the montage starts;
/// a delay of 0 runs it synchronously at request time.
#[derive(Component, Debug, Clone)]
pub struct EquipSettings {
    /// Класс для `EquipWeaponIntent { class: None }`
    pub default_class: Option<WeaponClassId>,
    pub grip_socket: SocketId,
    pub equip_montage: Option<Montage>,
    pub unequip_montage: Option<Montage>,
    pub equip_delay: f32,
    pub unequip_delay: f32,
}

impl Default for EquipSettings {
    fn default() -> Self {
        Self {
            default_class: None,
            grip_socket: SocketId::from("hand_r_grip"),
            equip_montage: None,
            unequip_montage: None,
            equip_delay: 0.0,
            unequip_delay: 0.0,
        }
    }
}

impl EquipSettings {
    pub fn with_default_class(mut self, class: impl Into<WeaponClassId>) -> Self {
        self.default_class = Some(class.into());
        self
    }

    pub fn with_equip_montage(mut self, montage: Montage, delay: f32) -> Self {
        self.equip_montage = Some(montage);
        self.equip_delay = delay;
        self
    }

    pub fn with_unequip_montage(mut self, montage: Montage, delay: f32) -> Self {
        self.unequip_montage = Some(montage);
        self.unequip_delay = delay;
        self
    }
}
