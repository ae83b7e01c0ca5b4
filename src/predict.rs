//! Decay prediction — first-order linear extrapolation of field coherence.
//!
//! Deliberately a straight line through the recent history, not a fitted
//! model: the projection must stay monotonic and explainable. Precision is
//! secondary to testable behaviour.
//!
//! # Invariants
//!
//! - **RFE-005**: fewer than [`SAMPLE_WINDOW`] history entries yields the
//!   well-defined no-trend prediction (`decay_rate = 0`,
//!   `time_to_threshold = +∞`) — never an error.
//! - `projected_coherence` is clamped to [0.0, 1.0]; `decay_rate ≥ 0`;
//!   `time_to_threshold ≥ 0` or `+∞`.

use crate::history::ResonanceLog;

/// Number of trailing coherence samples the trend is fitted over.
pub const SAMPLE_WINDOW: usize = 5;

/// Number of steps the trend is projected forward.
pub const PROJECTION_HORIZON: f32 = 5.0;

/// Coherence level whose crossing time is reported.
pub const COHERENCE_THRESHOLD: f32 = 0.5;

/// Projection of the field's short-term coherence trend.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecayPrediction {
    /// Coherence expected [`PROJECTION_HORIZON`] steps ahead, clamped [0, 1].
    pub projected_coherence: f32,
    /// Per-step coherence loss; 0 when the trend is flat or rising.
    pub decay_rate: f32,
    /// Steps until coherence crosses [`COHERENCE_THRESHOLD`] at the current
    /// decay rate; `+∞` when no decay is in progress.
    pub time_to_threshold: f32,
}

impl DecayPrediction {
    /// The no-trend prediction: coherence holds at its current value.
    pub fn flat(current_coherence: f32) -> Self {
        Self {
            projected_coherence: current_coherence.clamp(0.0, 1.0),
            decay_rate: 0.0,
            time_to_threshold: f32::INFINITY,
        }
    }
}

/// Extrapolate the recent coherence trend from `log`.
///
/// Takes the last [`SAMPLE_WINDOW`] coherence samples, computes their mean
/// per-step velocity, and projects `current_coherence` forward by
/// [`PROJECTION_HORIZON`] steps. Only a negative trend counts as decay.
pub fn predict(log: &ResonanceLog, current_coherence: f32) -> DecayPrediction {
    let samples = log.recent_coherence(SAMPLE_WINDOW);
    if samples.len() < SAMPLE_WINDOW {
        return DecayPrediction::flat(current_coherence);
    }

    let first = samples[0];
    let last = samples[samples.len() - 1];
    let velocity = (last - first) / (samples.len() as f32 - 1.0);

    let projected_coherence =
        (current_coherence + velocity * PROJECTION_HORIZON).clamp(0.0, 1.0);
    let decay_rate = (-velocity).max(0.0);
    let time_to_threshold = if decay_rate > 0.0 {
        ((current_coherence - COHERENCE_THRESHOLD) / decay_rate).max(0.0)
    } else {
        f32::INFINITY
    };

    DecayPrediction {
        projected_coherence,
        decay_rate,
        time_to_threshold,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
