//! Montage playback: один montage на актора, notify windows по времени.
//!
//! Порядок сигналов для окна: `Begin` (+ `Tick` в тот же frame) → `Tick`* → `End`.
//! `End` никогда не приходит в frame начала окна, кроме случая, когда
//! montage заканчивается в этом же frame.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{AnimationPlayback, CollisionPart, PlaybackSignal};

/// Timed notify interval inside a montage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifyWindow {
    /// Начало окна (секунды от старта montage)
    pub start: f32,
    pub end: f32,
    pub part: CollisionPart,
}

/// Authored animation clip with damage windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Montage {
    pub name: String,
    /// Полная длительность (секунды)
    pub duration: f32,
    pub windows: Vec<NotifyWindow>,
}

impl Montage {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            windows: Vec::new(),
        }
    }

    pub fn with_window(mut self, start: f32, end: f32, part: CollisionPart) -> Self {
        self.windows.push(NotifyWindow { start, end, part });
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowProgress {
    Pending,
    Open,
    Done,
}

#[derive(Debug, Clone)]
struct ActiveMontage {
    montage: Montage,
    elapsed: f32,
    windows: Vec<WindowProgress>,
}

impl ActiveMontage {
    /// Closes every open window (montage ended or interrupted).
    fn close_open_windows(&mut self, signals: &mut Vec<PlaybackSignal>) {
        for (progress, window) in self.windows.iter_mut().zip(&self.montage.windows) {
            if *progress == WindowProgress::Open {
                signals.push(PlaybackSignal::WindowEnd { part: window.part });
            }
            *progress = WindowProgress::Done;
        }
    }
}

/// Per-actor montage player (in-process animation service).
#[derive(Component, Debug, Clone, Default)]
pub struct MontagePlayer {
    current: Option<ActiveMontage>,
    /// Сигналы от interrupt(), выдаются следующим advance()
    pending: Vec<PlaybackSignal>,
}

impl MontagePlayer {
    pub fn current_montage(&self) -> Option<&Montage> {
        self.current.as_ref().map(|active| &active.montage)
    }

    pub fn elapsed(&self) -> f32 {
        self.current.as_ref().map_or(0.0, |active| active.elapsed)
    }

    /// Advances playback by `delta` seconds and returns the signals fired.
    pub fn advance(&mut self, delta: f32) -> Vec<PlaybackSignal> {
        let mut signals = std::mem::take(&mut self.pending);

        let Some(active) = self.current.as_mut() else {
            return signals;
        };

        active.elapsed += delta;
        let elapsed = active.elapsed;

        for (progress, window) in active.windows.iter_mut().zip(&active.montage.windows) {
            match *progress {
                WindowProgress::Pending if elapsed >= window.start => {
                    *progress = WindowProgress::Open;
                    signals.push(PlaybackSignal::WindowBegin { part: window.part });
                    signals.push(PlaybackSignal::WindowTick { part: window.part });
                }
                WindowProgress::Open if elapsed >= window.end => {
                    *progress = WindowProgress::Done;
                    signals.push(PlaybackSignal::WindowEnd { part: window.part });
                }
                WindowProgress::Open => {
                    signals.push(PlaybackSignal::WindowTick { part: window.part });
                }
                _ => {}
            }
        }

        if elapsed >= active.montage.duration {
            active.close_open_windows(&mut signals);
            signals.push(PlaybackSignal::Ended { interrupted: false });
            self.current = None;
        }

        signals
    }
}

impl AnimationPlayback for MontagePlayer {
    fn is_any_montage_playing(&self) -> bool {
        self.current.is_some()
    }

    fn play(&mut self, montage: &Montage) -> f32 {
        self.interrupt();
        self.current = Some(ActiveMontage {
            windows: vec![WindowProgress::Pending; montage.windows.len()],
            montage: montage.clone(),
            elapsed: 0.0,
        });
        montage.duration
    }

    fn interrupt(&mut self) {
        let Some(mut active) = self.current.take() else {
            return;
        };
        active.close_open_windows(&mut self.pending);
        self.pending.push(PlaybackSignal::Ended { interrupted: true });
    }
}
