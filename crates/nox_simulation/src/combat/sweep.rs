//! Collision sweep builder.
//!
//! Превращает collision points (socket path или forward ray) в набор
//! сегментов, прогоняет каждый через `SweepTrace` и склеивает результаты.
//!
//! # Policies
//!
//! - `uses_forward_ray`: один сегмент от instigator вдоль forward на `forward_range`,
//!   supplied points игнорируются.
//! - Socket path: пары `[p0,p1], [p1,p2], ...`; нужно минимум 2 точки.
//! - `use_uniform_height`: Y обоих концов каждого (не forward) сегмента
//!   = `instigator.y + height_offset`.
//! - `extra_range_at_tip`: последний сегмент удлиняется вдоль своего направления.
//!
//! Результаты НЕ дедуплицируются: это делает attack window.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Group;
use serde::{Deserialize, Serialize};

use crate::combat::CombatError;
use crate::components::SocketId;
use crate::diagnostics::DiagnosticsSink;

/// Where the path points come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionPointSource {
    /// Ends of the weapon's overlap volume axis
    ByVolumeOverlap,
    /// Ordered socket list resolved each frame
    #[default]
    BySocketPath,
}

/// Debug rendering of sweeps (visual aid only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DebugDrawMode {
    #[default]
    None,
    ForOneFrame,
    ForDuration,
    Persistent,
}

/// Sweep geometry and behavior of one attack or weapon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionParams {
    pub uses_forward_ray: bool,
    /// Длина forward сегмента (m)
    pub forward_range: f32,
    pub use_uniform_height: bool,
    pub height_offset: f32,
    /// Reach за последней точкой (m)
    pub extra_range_at_tip: f32,
    pub sweep_radius: f32,
    pub point_source: CollisionPointSource,
    /// Socket path для `BySocketPath` (минимум 2)
    pub sockets: Vec<SocketId>,
    pub debug_draw: DebugDrawMode,
}

impl Default for CollisionParams {
    fn default() -> Self {
        Self {
            uses_forward_ray: false,
            forward_range: 1.5,
            use_uniform_height: false,
            height_offset: 0.0,
            extra_range_at_tip: 0.0,
            sweep_radius: 0.2,
            point_source: CollisionPointSource::BySocketPath,
            sockets: Vec::new(),
            debug_draw: DebugDrawMode::None,
        }
    }
}

impl CollisionParams {
    pub fn forward_ray(range: f32, radius: f32) -> Self {
        Self {
            uses_forward_ray: true,
            forward_range: range,
            sweep_radius: radius,
            ..default()
        }
    }

    pub fn socket_path<I, S>(sockets: I, radius: f32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SocketId>,
    {
        Self {
            sockets: sockets.into_iter().map(Into::into).collect(),
            sweep_radius: radius,
            point_source: CollisionPointSource::BySocketPath,
            ..default()
        }
    }
}

/// One swept segment (capsule axis).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepSegment {
    pub start: Vec3,
    pub end: Vec3,
}

impl SweepSegment {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    pub fn direction(&self) -> Vec3 {
        (self.end - self.start).normalize_or_zero()
    }

    /// Closest point on the segment to `point`.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let axis = self.end - self.start;
        let len_sq = axis.length_squared();
        if len_sq <= f32::EPSILON {
            return self.start;
        }
        let t = ((point - self.start).dot(axis) / len_sq).clamp(0.0, 1.0);
        self.start + axis * t
    }
}

/// Who is sweeping: position + facing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepInstigator {
    pub entity: Entity,
    pub position: Vec3,
    pub forward: Vec3,
}

impl SweepInstigator {
    pub fn from_transform(entity: Entity, transform: &Transform) -> Self {
        Self {
            entity,
            position: transform.translation,
            forward: transform.forward().as_vec3(),
        }
    }
}

/// One intersecting collidable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    /// Актор, которому принадлежит collider
    pub actor: Entity,
    /// Конкретный collider (hurtbox) внутри актора
    pub component: Entity,
    pub point: Vec3,
}

/// Spatial sweep primitive (black box for the builder).
pub trait SweepTrace {
    /// Every collidable intersecting a sphere of `radius` moved along `segment`,
    /// matching `filter` and not owned by anything in `ignore`.
    fn sweep(&self, segment: &SweepSegment, radius: f32, filter: Group, ignore: &[Entity]) -> Vec<HitResult>;
}

/// Builds the segment list. Pure; no tracing.
pub fn build_segments(
    instigator: &SweepInstigator,
    points: &[Vec3],
    params: &CollisionParams,
) -> Result<Vec<SweepSegment>, CombatError> {
    if params.uses_forward_ray {
        let end = instigator.position + instigator.forward.normalize_or_zero() * params.forward_range;
        return Ok(vec![SweepSegment::new(instigator.position, end)]);
    }

    if points.len() < 2 {
        return Err(CombatError::NotEnoughCollisionPoints(points.len()));
    }

    let mut segments: Vec<SweepSegment> = points
        .windows(2)
        .map(|pair| SweepSegment::new(pair[0], pair[1]))
        .collect();

    if params.use_uniform_height {
        let height = instigator.position.y + params.height_offset;
        for segment in segments.iter_mut() {
            segment.start.y = height;
            segment.end.y = height;
        }
    }

    if params.extra_range_at_tip > 0.0 {
        if let Some(last) = segments.last_mut() {
            last.end += last.direction() * params.extra_range_at_tip;
        }
    }

    Ok(segments)
}

/// Builds segments, sweeps each one and concatenates the hits.
///
/// Configuration errors are reported through `diagnostics` and yield an
/// empty list without touching `trace`.
pub fn build_and_execute_sweep(
    instigator: &SweepInstigator,
    points: &[Vec3],
    params: &CollisionParams,
    filter: Group,
    ignore: &[Entity],
    trace: &dyn SweepTrace,
    diagnostics: &dyn DiagnosticsSink,
) -> Vec<HitResult> {
    let segments = match build_segments(instigator, points, params) {
        Ok(segments) => segments,
        Err(err) => {
            diagnostics.warn(&format!(
                "⚠️ Sweep for {:?} aborted: {}",
                instigator.entity, err
            ));
            return Vec::new();
        }
    };

    let mut hits = Vec::new();
    for segment in &segments {
        let segment_hits = trace.sweep(segment, params.sweep_radius, filter, ignore);
        diagnostics.draw_sweep(segment, params.sweep_radius, params.debug_draw, !segment_hits.is_empty());
        hits.extend(segment_hits);
    }

    hits
}
