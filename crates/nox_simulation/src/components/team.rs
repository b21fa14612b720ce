//! Team affiliation and attitude between actors.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Team id. `255` is the neutral sentinel (not on any team).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct Team(pub u8);

impl Default for Team {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl Team {
    pub const NEUTRAL: Team = Team(255);

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }

    /// Attitude of `self` towards an actor of team `other`.
    pub fn attitude_towards(&self, other: Team) -> Attitude {
        if self.is_neutral() || other.is_neutral() {
            Attitude::Neutral
        } else if *self == other {
            Attitude::Friendly
        } else {
            Attitude::Hostile
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attitude {
    Friendly,
    Neutral,
    Hostile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attitudes() {
        let red = Team(1);
        let blue = Team(2);

        assert_eq!(red.attitude_towards(red), Attitude::Friendly);
        assert_eq!(red.attitude_towards(blue), Attitude::Hostile);
        assert_eq!(red.attitude_towards(Team::NEUTRAL), Attitude::Neutral);
        // Нейтральный актор ни с кем не воюет
        assert_eq!(Team::NEUTRAL.attitude_towards(blue), Attitude::Neutral);
        assert_eq!(Team::NEUTRAL.attitude_towards(Team::NEUTRAL), Attitude::Neutral);
        assert_eq!(Team::default(), Team::NEUTRAL);
    }
}
