//! Hurtbox система для combat
//!
//! Архитектура:
//! - Hurtbox = сфера на акторе (или отдельный proxy entity, синхронизированный
//!   skeleton сервисом) в world space
//! - `HurtboxSweep` = snapshot всех hurtboxes за frame, реализует `SweepTrace`
//! - Сфера радиуса r вдоль сегмента попадает в hurtbox радиуса R,
//!   если distance(segment, center) <= r + R

use bevy::prelude::*;
use bevy_rapier3d::prelude::Group;

use crate::combat::collision;
use crate::combat::sweep::{HitResult, SweepSegment, SweepTrace};

/// Damageable sphere.
#[derive(Component, Debug, Clone, Copy)]
pub struct Hurtbox {
    /// Радиус сферы (метры)
    pub radius: f32,
    /// Центр относительно Transform entity
    pub offset: Vec3,
    pub memberships: Group,
    /// Актор-владелец, если hurtbox живёт на отдельном proxy entity
    pub owner: Option<Entity>,
}

impl Default for Hurtbox {
    fn default() -> Self {
        Self {
            radius: 0.4,
            offset: Vec3::new(0.0, 1.0, 0.0),
            memberships: collision::group(collision::COLLISION_LAYER_PAWNS),
            owner: None,
        }
    }
}

impl Hurtbox {
    pub fn new(radius: f32, offset: Vec3) -> Self {
        Self {
            radius,
            offset,
            ..default()
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct HurtboxEntry {
    actor: Entity,
    component: Entity,
    center: Vec3,
    radius: f32,
    memberships: Group,
}

/// Frame snapshot of every hurtbox, queryable as a sweep primitive.
#[derive(Debug, Clone, Default)]
pub struct HurtboxSweep {
    entries: Vec<HurtboxEntry>,
}

impl HurtboxSweep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, component: Entity, hurtbox: &Hurtbox, transform: &Transform) {
        self.entries.push(HurtboxEntry {
            actor: hurtbox.owner.unwrap_or(component),
            component,
            center: transform.transform_point(hurtbox.offset),
            radius: hurtbox.radius,
            memberships: hurtbox.memberships,
        });
    }

    /// Snapshot in entity order (stable between runs).
    pub fn collect<'a>(hurtboxes: impl IntoIterator<Item = (Entity, &'a Hurtbox, &'a Transform)>) -> Self {
        let mut sweep = Self::new();
        for (entity, hurtbox, transform) in hurtboxes {
            sweep.insert(entity, hurtbox, transform);
        }
        sweep.entries.sort_by_key(|entry| entry.component.index());
        sweep
    }
}

impl SweepTrace for HurtboxSweep {
    fn sweep(&self, segment: &SweepSegment, radius: f32, filter: Group, ignore: &[Entity]) -> Vec<HitResult> {
        self.entries
            .iter()
            .filter(|entry| filter.intersects(entry.memberships))
            .filter(|entry| !ignore.contains(&entry.actor) && !ignore.contains(&entry.component))
            .filter_map(|entry| {
                let closest = segment.closest_point(entry.center);
                if closest.distance(entry.center) > radius + entry.radius {
                    return None;
                }
                // Точка удара на поверхности hurtbox (со стороны сегмента)
                let towards = (closest - entry.center).normalize_or_zero();
                Some(HitResult {
                    actor: entry.actor,
                    component: entry.component,
                    point: entry.center + towards * entry.radius,
                })
            })
            .collect()
    }
}
