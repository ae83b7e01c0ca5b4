//! Oscillatory stabilization — a hysteretic damper for sustained instability.
//!
//! The buffer is a two-state machine (inactive / active) with a Schmitt
//! trigger between the states: it engages above the activation threshold,
//! disengages only below the lower deactivation threshold, and holds in the
//! deadband. While engaged it derives an adaptive frequency from the field's
//! dissonance and the dominant symbol's harmonic modifier.
//!
//! # Invariants
//!
//! - **RFE-006**: `stabilization_factor` never exceeds [`MAX_STABILIZATION`].
//! - **RFE-008**: the harmonic map holds at most [`HARMONIC_CAPACITY`]
//!   entries; the 21st insert evicts the first-inserted (insertion order,
//!   not LRU-by-access).
//! - Activation edges reset `phase` to 0.

use heapless::Deque;

use alloc::string::String;
use alloc::vec::Vec;

use crate::signature::TrendSummary;

/// Hard ceiling on the stabilization factor (RFE-006).
pub const MAX_STABILIZATION: f32 = 0.8;

/// Maximum number of per-symbol harmonic modifiers (RFE-008).
pub const HARMONIC_CAPACITY: usize = 20;

// ─── BufferConfig ───────────────────────────────────────────────────────────

/// Thresholds and tuning for the stabilization buffer.
///
/// The *activation* threshold is higher than the *deactivation* threshold so
/// the buffer does not flap at a single boundary — dissonance hovering in the
/// deadband keeps whatever state the buffer is in.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BufferConfig {
    /// Dissonance above which an inactive buffer engages.
    pub activation_threshold: f32,
    /// Dissonance below which an active buffer disengages.
    pub deactivation_threshold: f32,
    /// Base oscillation frequency before dissonance and harmonic scaling.
    pub base_frequency: f32,
}

impl BufferConfig {
    /// Construct the standard configuration.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            activation_threshold: 0.5,
            deactivation_threshold: 0.3,
            base_frequency: 1.0,
        }
    }
}

// ─── OscillatoryState ───────────────────────────────────────────────────────

/// Point-in-time view of the buffer, exposed through the field snapshot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OscillatoryState {
    /// Whether the stabilizer is currently engaged.
    pub active: bool,
    /// Adaptive oscillation frequency (0 while inactive).
    pub frequency: f32,
    /// Oscillation amplitude, `dissonance × 0.5` while active.
    pub amplitude: f32,
    /// Oscillation phase; reset to 0 on every activation edge.
    pub phase: f32,
    /// Damping strength [0.0, [`MAX_STABILIZATION`]].
    pub stabilization_factor: f32,
    /// Per-symbol harmonic modifiers in insertion order.
    pub harmonics: Vec<(String, f32)>,
}

// ─── OscillatoryBuffer ──────────────────────────────────────────────────────

/// The hysteretic stabilization buffer.
#[derive(Clone, Debug, Default)]
pub struct OscillatoryBuffer {
    config: BufferConfig,
    active: bool,
    frequency: f32,
    amplitude: f32,
    phase: f32,
    stabilization_factor: f32,
    harmonics: Deque<(String, f32), HARMONIC_CAPACITY>,
}

impl OscillatoryBuffer {
    /// Construct an inactive buffer with the given configuration.
    pub fn new(config: BufferConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Evaluate the state machine against the current dissonance.
    ///
    /// Returns `true` only on the inactive→active edge. While active the
    /// frequency, amplitude and stabilization factor are recomputed every
    /// step so the damper tracks the field.
    pub fn evaluate(&mut self, dissonance: f32, trends: &TrendSummary) -> bool {
        let was_active = self.active;

        if !self.active {
            if dissonance > self.config.activation_threshold {
                self.active = true;
            }
        } else if dissonance < self.config.deactivation_threshold {
            self.disengage();
        }
        // In the deadband while active: hold, no edge.

        if self.active {
            if !was_active {
                self.phase = 0.0;
            }
            self.retune(dissonance, trends);
        }

        self.active && !was_active
    }

    /// Force the buffer on at the given dissonance level, bypassing the
    /// activation threshold. Used by the host's forced-stabilization path.
    pub fn force_activate(&mut self, dissonance: f32, trends: &TrendSummary) {
        self.active = true;
        self.phase = 0.0;
        self.retune(dissonance.clamp(0.0, 1.0), trends);
    }

    /// Insert or overwrite a per-symbol harmonic modifier.
    ///
    /// Overwriting keeps the symbol's insertion position. A new symbol past
    /// [`HARMONIC_CAPACITY`] evicts the first-inserted entry (RFE-008).
    pub fn update_harmonic(&mut self, symbol: impl Into<String>, factor: f32) {
        let symbol = symbol.into();
        if let Some(slot) = self.harmonics.iter_mut().find(|(s, _)| *s == symbol) {
            slot.1 = factor;
            return;
        }
        if self.harmonics.is_full() {
            self.harmonics.pop_front();
        }
        let _ = self.harmonics.push_back((symbol, factor));
    }

    /// Look up the harmonic modifier for a symbol.
    pub fn harmonic(&self, symbol: &str) -> Option<f32> {
        self.harmonics
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, f)| *f)
    }

    /// Number of stored harmonic modifiers.
    pub fn harmonic_len(&self) -> usize {
        self.harmonics.len()
    }

    /// Whether the stabilizer is engaged.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current adaptive frequency (0 while inactive).
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Current damping strength.
    pub fn stabilization_factor(&self) -> f32 {
        self.stabilization_factor
    }

    /// Clone out a point-in-time view for the field snapshot.
    pub fn state(&self) -> OscillatoryState {
        OscillatoryState {
            active: self.active,
            frequency: self.frequency,
            amplitude: self.amplitude,
            phase: self.phase,
            stabilization_factor: self.stabilization_factor,
            harmonics: self.harmonics.iter().cloned().collect(),
        }
    }

    /// Recompute the adaptive parameters from the field's dissonance and the
    /// dominant symbol's trend.
    fn retune(&mut self, dissonance: f32, trends: &TrendSummary) {
        let base = if dissonance > f32::EPSILON {
            self.config.base_frequency / (dissonance * 2.0)
        } else {
            self.config.base_frequency
        };
        let modifier = trends
            .dominant
            .as_ref()
            .and_then(|(symbol, _)| self.harmonic(symbol))
            .unwrap_or(1.0);
        self.frequency = base * modifier;
        self.amplitude = dissonance * 0.5;
        self.stabilization_factor =
            (dissonance * (1.0 + trends.strength)).min(MAX_STABILIZATION);
    }

    fn disengage(&mut self) {
        self.active = false;
        self.frequency = 0.0;
        self.amplitude = 0.0;
        self.stabilization_factor = 0.0;
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
