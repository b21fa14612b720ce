//! NOX Simulation Core
//!
//! Melee combat + damage windows на Bevy 0.16 (FixedUpdate).
//!
//! Слои:
//! - components: актор, vitals, команды, сокеты
//! - animation: montage playback + attack window notifies
//! - combat: damage resolver, sweep builder, window state machine, dispatcher
//! - diagnostics / logger: warnings, traces, debug draw

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod animation;
pub mod combat;
pub mod components;
pub mod diagnostics;
pub mod logger;

// Re-export базовых типов для удобства
pub use animation::{AnimationPlayback, CollisionPart, Montage, MontagePlayer, NotifyWindow};
pub use combat::{
    AttackDefinition, AttackIntent, CombatConfig, CombatError, CombatPlugin, DamageDealt, DamageParams, Dead,
    EntityDied, EquipSettings, EquipWeaponIntent, Hurtbox, MeleeCombat, MeleeHit, UnequipWeaponIntent, Weapon,
    WeaponClass, WeaponClasses,
};
pub use components::*;
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};

/// Главный plugin симуляции
pub struct SimulationPlugin {
    pub seed: u64,
    pub config: CombatConfig,
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self {
            seed: 42,
            config: CombatConfig::default(),
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(self.config.tick_rate_hz))
            .insert_resource(self.config.clone())
            // Детерминистичный RNG (death variants)
            .insert_resource(DeterministicRng::new(self.seed))
            .add_plugins(CombatPlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигается вручную: каждый `app.update()` = ровно 1/60 s,
/// поэтому FixedUpdate тикает детерминированно (первый update без тика).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();

    let config = CombatConfig::default();
    let step = Duration::from_secs_f64(1.0 / config.tick_rate_hz);

    app.add_plugins(MinimalPlugins)
        .add_plugins(SimulationPlugin { seed, config })
        .insert_resource(TimeUpdateStrategy::ManualDuration(step));

    app
}
