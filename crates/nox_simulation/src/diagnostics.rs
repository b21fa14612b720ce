//! Injected diagnostics sink for the combat core.
//!
//! Combat logic reports configuration warnings, traces and debug sweeps
//! through `DiagnosticsSink` instead of the global logger, so hosts and tests
//! can swap the output.

use std::sync::{Arc, Mutex};

use bevy::prelude::*;

use crate::combat::sweep::{DebugDrawMode, SweepSegment};

/// Output channel for combat warnings and debug visuals.
pub trait DiagnosticsSink: Send + Sync {
    /// Configuration problem (operation aborted, nothing mutated).
    fn warn(&self, message: &str);

    /// Normal control-flow information (rejected attacks, hits).
    fn trace(&self, message: &str);

    /// Visual aid for one swept segment. No functional effect.
    fn draw_sweep(&self, segment: &SweepSegment, radius: f32, mode: DebugDrawMode, hit: bool);
}

/// Forwards everything to `crate::logger`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl DiagnosticsSink for LogDiagnostics {
    fn warn(&self, message: &str) {
        crate::logger::log_warning(message);
    }

    fn trace(&self, message: &str) {
        crate::logger::log(message);
    }

    fn draw_sweep(&self, segment: &SweepSegment, radius: f32, mode: DebugDrawMode, hit: bool) {
        if mode == DebugDrawMode::None {
            return;
        }
        crate::logger::log(&format!(
            "🔍 sweep {:?} → {:?} r={:.2} hit={} ({:?})",
            segment.start, segment.end, radius, hit, mode
        ));
    }
}

/// A sweep captured by `RecordingDiagnostics`.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnSweep {
    pub segment: SweepSegment,
    pub radius: f32,
    pub mode: DebugDrawMode,
    pub hit: bool,
}

/// Keeps every message in memory (editor overlays, tests).
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    warnings: Mutex<Vec<String>>,
    traces: Mutex<Vec<String>>,
    sweeps: Mutex<Vec<DrawnSweep>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().map(|w| w.clone()).unwrap_or_default()
    }

    pub fn traces(&self) -> Vec<String> {
        self.traces.lock().map(|t| t.clone()).unwrap_or_default()
    }

    pub fn sweeps(&self) -> Vec<DrawnSweep> {
        self.sweeps.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl DiagnosticsSink for RecordingDiagnostics {
    fn warn(&self, message: &str) {
        if let Ok(mut warnings) = self.warnings.lock() {
            warnings.push(message.to_string());
        }
    }

    fn trace(&self, message: &str) {
        if let Ok(mut traces) = self.traces.lock() {
            traces.push(message.to_string());
        }
    }

    fn draw_sweep(&self, segment: &SweepSegment, radius: f32, mode: DebugDrawMode, hit: bool) {
        if mode == DebugDrawMode::None {
            return;
        }
        if let Ok(mut sweeps) = self.sweeps.lock() {
            sweeps.push(DrawnSweep {
                segment: *segment,
                radius,
                mode,
                hit,
            });
        }
    }
}

/// Diagnostics sink used by combat systems.
#[derive(Resource, Clone)]
pub struct CombatDiagnostics(pub Arc<dyn DiagnosticsSink>);

impl Default for CombatDiagnostics {
    fn default() -> Self {
        Self(Arc::new(LogDiagnostics))
    }
}

impl CombatDiagnostics {
    pub fn sink(&self) -> &dyn DiagnosticsSink {
        self.0.as_ref()
    }
}
