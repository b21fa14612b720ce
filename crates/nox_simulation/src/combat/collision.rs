//! Collision Layers Constants
//!
//! Rapier collision groups, centralised для всего combat.
//!
//! ## Архитектура:
//! - **Memberships:** на каком слое находится объект
//! - **Filters:** с какими слоями объект коллидирует
//!
//! ## Слои:
//! - Layer 1 (0b1): Pawns (живые акторы, их hurtboxes)
//! - Layer 2 (0b10): World dynamic (props, ragdolls)
//! - Layer 3 (0b100): Carried weapons
//! - Layer 4 (0b1000): Corpses

use bevy_rapier3d::prelude::{CollisionGroups, Group};

// ============================================================================
// Layer битовые маски
// ============================================================================

/// Layer 1: Pawns (players, NPCs)
pub const COLLISION_LAYER_PAWNS: u32 = 0b1;

/// Layer 2: World dynamic (physics props, ragdolls)
pub const COLLISION_LAYER_WORLD_DYNAMIC: u32 = 0b10;

/// Layer 3: Carried weapons (attached к grip socket)
pub const COLLISION_LAYER_CARRIED_WEAPONS: u32 = 0b100;

/// Layer 4: Corpses (мёртвые акторы, не блокируют живых)
pub const COLLISION_LAYER_CORPSES: u32 = 0b1000;

// ============================================================================
// Mask битовые маски
// ============================================================================

/// Pawns collide with pawns + world dynamic
pub const COLLISION_MASK_PAWNS: u32 = COLLISION_LAYER_PAWNS | COLLISION_LAYER_WORLD_DYNAMIC;

/// Default melee sweep filter: только pawns
pub const COLLISION_MASK_MELEE_SWEEP: u32 = COLLISION_LAYER_PAWNS;

/// Carried weapon ни с чем не коллидит (в том числе с владельцем)
pub const COLLISION_MASK_CARRIED_WEAPONS: u32 = 0;

/// Corpses collide with world dynamic only
pub const COLLISION_MASK_CORPSES: u32 = COLLISION_LAYER_WORLD_DYNAMIC;

pub fn group(bits: u32) -> Group {
    Group::from_bits_truncate(bits)
}

pub fn pawn_groups() -> CollisionGroups {
    CollisionGroups::new(group(COLLISION_LAYER_PAWNS), group(COLLISION_MASK_PAWNS))
}

pub fn carried_weapon_groups() -> CollisionGroups {
    CollisionGroups::new(
        group(COLLISION_LAYER_CARRIED_WEAPONS),
        group(COLLISION_MASK_CARRIED_WEAPONS),
    )
}

pub fn corpse_groups() -> CollisionGroups {
    CollisionGroups::new(group(COLLISION_LAYER_CORPSES), group(COLLISION_MASK_CORPSES))
}

/// Object-type filter used by melee sweeps.
pub fn default_sweep_filter() -> Group {
    group(COLLISION_MASK_MELEE_SWEEP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carried_weapon_never_collides() {
        let groups = carried_weapon_groups();
        assert_eq!(groups.filters, Group::NONE);
        assert!(!groups.memberships.intersects(group(COLLISION_MASK_PAWNS)));
    }

    #[test]
    fn test_sweep_filter_hits_pawns_not_corpses() {
        let filter = default_sweep_filter();
        assert!(filter.intersects(pawn_groups().memberships));
        assert!(!filter.intersects(corpse_groups().memberships));
    }
}
