//! Combat error taxonomy.
//!
//! Две категории:
//! - precondition: нормальный control flow (атака во время атаки, мёртвый актор).
//!   Трейсится на debug уровне, не warning.
//! - configuration: данные собраны неправильно. Warning, операция отменяется,
//!   состояние не меняется.

use bevy::prelude::*;
use thiserror::Error;

use crate::combat::components::{WeaponClassId, WeaponTag};
use crate::components::SocketId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CombatError {
    // Preconditions
    #[error("actor is dead")]
    Dead,
    #[error("attacking is disabled for this actor")]
    AttackDisabled,
    #[error("another montage is already playing")]
    MontagePlaying,

    // Configuration
    #[error("attack definition has no montage")]
    MissingMontage,
    #[error("unarmed attack index {index} is out of range ({count} attacks configured)")]
    UnarmedAttackIndex { index: usize, count: usize },
    #[error("equipped weapon has an empty tag")]
    EmptyWeaponTag,
    #[error("no attack definition matches weapon tag '{0}'")]
    NoAttackForTag(WeaponTag),
    #[error("no weapon class requested and no default configured")]
    NoDefaultWeaponClass,
    #[error("weapon class '{0}' is not registered")]
    UnknownWeaponClass(WeaponClassId),
    #[error("delay {0} is not a finite number of seconds")]
    InvalidDelay(f32),
    #[error("sweep needs at least 2 collision points, got {0}")]
    NotEnoughCollisionPoints(usize),
    #[error("socket '{0}' not found")]
    UnknownSocket(SocketId),
    #[error("grip socket '{0}' not found on owner mesh")]
    MissingGripSocket(SocketId),
    #[error("equipped weapon {0:?} does not exist")]
    MissingWeapon(Entity),
}

impl CombatError {
    /// Precondition-not-met: silently ignored by callers.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            CombatError::Dead | CombatError::AttackDisabled | CombatError::MontagePlaying
        )
    }
}
