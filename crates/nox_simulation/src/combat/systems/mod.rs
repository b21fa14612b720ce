//! Combat systems (thin ECS layer над dispatcher)

pub mod attack;
pub mod death;
pub mod effects;
pub mod equipment;
pub mod hits;
pub mod windows;

// Re-export all systems
pub use attack::*;
pub use death::*;
pub use effects::*;
pub use equipment::*;
pub use hits::*;
pub use windows::*;
