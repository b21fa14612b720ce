//! Locomotion компоненты (движение выполняет внешний character controller)

use bevy::prelude::*;

/// Movement switch + speed for the external character controller.
///
/// Combat only toggles `enabled` (death transition).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Locomotion {
    pub enabled: bool,
    /// Скорость движения (m/s)
    pub speed: f32,
}

impl Default for Locomotion {
    fn default() -> Self {
        Self {
            enabled: true,
            speed: 5.0,
        }
    }
}

impl Locomotion {
    /// Effective speed; zero while disabled.
    pub fn effective_speed(&self) -> f32 {
        if self.enabled {
            self.speed
        } else {
            0.0
        }
    }
}
