//! Combat configuration + frame counter resources.

use bevy::prelude::*;

use crate::components::Team;

/// Global combat tuning.
#[derive(Resource, Debug, Clone)]
pub struct CombatConfig {
    /// Fixed simulation rate (Time<Fixed>)
    pub tick_rate_hz: f64,
    /// Команда, в которую переходят мёртвые
    pub neutral_team: Team,
    /// Без `DeathSettings::selected`: случайный вариант (иначе первый)
    pub random_death_variant: bool,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60.0,
            neutral_team: Team::NEUTRAL,
            random_death_variant: true,
        }
    }
}

/// Index of the current fixed combat frame (starts at 1 on the first tick).
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombatFrame(pub u64);

/// Система: frame counter для per-frame идемпотентности sweeps
pub fn advance_combat_frame(mut frame: ResMut<CombatFrame>) {
    frame.0 += 1;
}
