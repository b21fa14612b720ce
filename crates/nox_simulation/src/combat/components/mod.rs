//! Combat components

pub mod attack;
pub mod death;
pub mod equipment;
pub mod weapon;

// Re-export all components
pub use attack::*;
pub use death::*;
pub use equipment::*;
pub use weapon::*;
