//! AI perception hooks: stimuli source + floating status bar

use bevy::prelude::*;

/// Whether this actor emits stimuli for AI perception (sight/hearing).
///
/// Sensing configuration lives in the AI layer; combat only flips the switch.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PerceptionStimuli {
    pub enabled: bool,
}

impl Default for PerceptionStimuli {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Floating bar above the actor (rendered by the UI layer).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct FloatingStatusBar {
    pub visible: bool,
    pub health_percentage: f32,
    pub mana_percentage: f32,
}

impl Default for FloatingStatusBar {
    fn default() -> Self {
        Self {
            visible: true,
            health_percentage: 1.0,
            mana_percentage: 1.0,
        }
    }
}
