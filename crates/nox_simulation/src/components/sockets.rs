//! Sockets: named attachment points on a skeletal mesh.
//!
//! Skeleton owner (animation service) keeps local offsets up to date;
//! combat resolves them to world positions at query time.

use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::CombatError;

/// Socket name (например "hand_r", "blade_tip")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SocketId(pub String);

impl SocketId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SocketId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl std::fmt::Display for SocketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Local-space socket offsets of one mesh.
#[derive(Component, Debug, Clone, Default)]
pub struct SocketSet {
    sockets: HashMap<SocketId, Vec3>,
}

impl SocketSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_socket(mut self, id: impl Into<SocketId>, local: Vec3) -> Self {
        self.set(id, local);
        self
    }

    pub fn set(&mut self, id: impl Into<SocketId>, local: Vec3) {
        self.sockets.insert(id.into(), local);
    }

    pub fn local(&self, id: &SocketId) -> Option<Vec3> {
        self.sockets.get(id).copied()
    }

    /// Resolves `path` to world positions, in order.
    pub fn resolve(&self, world: &Transform, path: &[SocketId]) -> Result<Vec<Vec3>, CombatError> {
        path.iter()
            .map(|id| {
                self.local(id)
                    .map(|local| world.transform_point(local))
                    .ok_or_else(|| CombatError::UnknownSocket(id.clone()))
            })
            .collect()
    }
}

impl From<HashMap<SocketId, Vec3>> for SocketSet {
    fn from(sockets: HashMap<SocketId, Vec3>) -> Self {
        Self { sockets }
    }
}
