//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: Actor marker, Vitals (health + mana)
//! - team: команда и отношение между акторами
//! - movement: Locomotion switch
//! - perception: AI stimuli + floating status bar
//! - sockets: именованные attachment points

pub mod actor;
pub mod movement;
pub mod perception;
pub mod sockets;
pub mod team;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
pub use perception::*;
pub use sockets::*;
pub use team::*;
