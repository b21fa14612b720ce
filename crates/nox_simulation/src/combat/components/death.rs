//! Death components: death variants, Dead marker, ragdoll handoff.

use bevy::prelude::*;

use crate::animation::Montage;

/// Death animations of an actor.
///
/// Слот может быть пустым (`None`): тогда сразу ragdoll.
#[derive(Component, Debug, Clone, Default)]
pub struct DeathSettings {
    pub montages: Vec<Option<Montage>>,
    /// Фиксированный вариант; `None` = случайный (DeterministicRng)
    pub selected: Option<usize>,
}

impl DeathSettings {
    pub fn with_montage(mut self, montage: Montage) -> Self {
        self.montages.push(Some(montage));
        self
    }

    /// Montage for `index`, if that slot exists and is filled.
    pub fn montage_at(&self, index: usize) -> Option<&Montage> {
        self.montages.get(index).and_then(Option::as_ref)
    }
}

/// Компонент-маркер: entity мертв (death transition выполнен)
///
/// Трупы остаются на месте, деспавн не автоматический.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;

/// Компонент-маркер: физика забрала тело (нет death montage)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Ragdoll;
