//! Damage parameter resolver.
//!
//! Base damage (attacker или weapon) + модификаторы из AttackDefinition.
//! Отрицательный результат не обрабатывается особо: идёт дальше как есть.

use serde::{Deserialize, Serialize};

/// Damage modifiers of one attack (or of a weapon class).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DamageParams {
    /// Прибавка к base damage
    pub additional_damage: f32,
    /// Если задан, побеждает base + additional
    pub override_damage: Option<f32>,
}

impl DamageParams {
    pub fn additional(amount: f32) -> Self {
        Self {
            additional_damage: amount,
            override_damage: None,
        }
    }

    pub fn overriding(amount: f32) -> Self {
        Self {
            additional_damage: 0.0,
            override_damage: Some(amount),
        }
    }
}

/// Final damage: override if present, otherwise `base + additional_damage`.
pub fn resolve_damage(base: f32, params: &DamageParams) -> f32 {
    match params.override_damage {
        Some(value) => value,
        None => base + params.additional_damage,
    }
}
