//! Attack window state machine + per-swing deduplicator.
//!
//! `Closed → Open → Closed`, driven by window begin / tick / end signals.
//! Struck-target set живёт ровно одно окно: очищается на begin и на end.

use std::collections::HashSet;

use bevy::prelude::*;

use crate::animation::CollisionPart;
use crate::components::SocketId;

/// Damage window of one attacker (character or weapon).
#[derive(Debug, Clone, Default)]
pub struct AttackWindowState {
    open: bool,
    struck: HashSet<Entity>,
    socket_path: Vec<SocketId>,
    part: CollisionPart,
    /// Последний frame, в котором окно уже делало sweep
    last_swept_frame: Option<u64>,
}

impl AttackWindowState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn part(&self) -> CollisionPart {
        self.part
    }

    pub fn socket_path(&self) -> &[SocketId] {
        &self.socket_path
    }

    pub fn struck_count(&self) -> usize {
        self.struck.len()
    }

    /// Opens the window. A begin while already open resets it.
    pub fn on_begin(&mut self, part: CollisionPart, socket_path: Vec<SocketId>) {
        self.open = true;
        self.struck.clear();
        self.socket_path = socket_path;
        self.part = part;
        self.last_swept_frame = None;
    }

    /// Closes the window. Safe to call at any time (interrupt, death).
    pub fn on_end(&mut self) {
        self.open = false;
        self.struck.clear();
        self.socket_path.clear();
        self.part = CollisionPart::None;
        self.last_swept_frame = None;
    }

    /// Claims `frame` for a sweep. False if closed or this frame was already swept.
    pub fn claim_frame(&mut self, frame: u64) -> bool {
        if !self.open || self.last_swept_frame == Some(frame) {
            return false;
        }
        self.last_swept_frame = Some(frame);
        true
    }

    /// True if `target` was not struck yet in this window.
    pub fn should_damage(&self, target: Entity) -> bool {
        self.open && !self.struck.contains(&target)
    }

    pub fn mark_damaged(&mut self, target: Entity) {
        self.struck.insert(target);
    }

    /// `should_damage` + `mark_damaged` in one step.
    pub fn try_strike(&mut self, target: Entity) -> bool {
        self.open && self.struck.insert(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut window = AttackWindowState::default();
        assert!(!window.is_open());

        window.on_begin(CollisionPart::RightHand, vec!["hand_r".into(), "fist_r".into()]);
        assert!(window.is_open());
        assert_eq!(window.part(), CollisionPart::RightHand);
        assert_eq!(window.socket_path().len(), 2);

        window.on_end();
        assert!(!window.is_open());
        assert!(window.socket_path().is_empty());
        assert_eq!(window.part(), CollisionPart::None);
    }

    #[test]
    fn test_three_ticks_damage_once() {
        let target = Entity::from_raw(5);
        let mut window = AttackWindowState::default();
        window.on_begin(CollisionPart::None, Vec::new());

        let mut applications = 0;
        for _tick in 0..3 {
            // Каждый tick заново находит того же target
            if window.should_damage(target) {
                window.mark_damaged(target);
                applications += 1;
            }
        }

        assert_eq!(applications, 1);
        assert_eq!(window.struck_count(), 1);
    }

    #[test]
    fn test_begin_and_end_reset_struck_set() {
        let target = Entity::from_raw(5);
        let mut window = AttackWindowState::default();

        window.on_begin(CollisionPart::None, Vec::new());
        assert!(window.try_strike(target));
        assert!(!window.try_strike(target));

        // Повторный begin без end = reset
        window.on_begin(CollisionPart::LeftHand, Vec::new());
        assert!(window.should_damage(target));
        assert!(window.try_strike(target));

        window.on_end();
        window.on_begin(CollisionPart::None, Vec::new());
        assert!(window.try_strike(target));
    }

    #[test]
    fn test_closed_window_never_damages() {
        let mut window = AttackWindowState::default();
        assert!(!window.should_damage(Entity::from_raw(1)));
        assert!(!window.try_strike(Entity::from_raw(1)));

        // Forced end на закрытом окне: no-op
        window.on_end();
        window.on_end();
        assert!(!window.is_open());
    }

    #[test]
    fn test_claim_frame_is_idempotent() {
        let mut window = AttackWindowState::default();
        assert!(!window.claim_frame(1));

        window.on_begin(CollisionPart::None, Vec::new());
        assert!(window.claim_frame(1));
        assert!(!window.claim_frame(1));
        assert!(window.claim_frame(2));
    }
}
