//! The scalar field state and clamped impact application.
//!
//! # Invariants
//!
//! - **RFE-001**: `coherence` and `dissonance` are in [0.0, 1.0] after every
//!   mutation. Clamping is the designed behaviour for absorbing out-of-range
//!   collaborator output, not an error path.
//! - **RFE-007**: non-finite impact deltas are rejected with
//!   [`FieldError::InvalidDelta`] and leave the state untouched.

/// Starting coherence for a fresh field — mildly coherent.
pub const DEFAULT_COHERENCE: f32 = 0.7;

/// Starting dissonance for a fresh field — low tension.
pub const DEFAULT_DISSONANCE: f32 = 0.1;

// ─── FieldState ─────────────────────────────────────────────────────────────

/// The resonance field's scalar state.
///
/// Coherence and dissonance are complementary measures of stability and
/// instability. They do not sum to 1 — an intent can raise or lower them
/// independently — but each is always clamped to [0.0, 1.0] (RFE-001).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldState {
    /// Field stability [0.0, 1.0].
    pub coherence: f32,
    /// Field instability [0.0, 1.0].
    pub dissonance: f32,
}

impl FieldState {
    /// Construct a field state, clamping both components into [0.0, 1.0].
    pub fn new(coherence: f32, dissonance: f32) -> Self {
        Self {
            coherence: coherence.clamp(0.0, 1.0),
            dissonance: dissonance.clamp(0.0, 1.0),
        }
    }

    /// Apply an impact delta, returning the new clamped state.
    ///
    /// Non-finite deltas (NaN or ±∞) are rejected with
    /// [`FieldError::InvalidDelta`]; `self` is not modified on either path —
    /// the caller commits the returned state.
    pub fn apply(&self, delta: ImpactDelta) -> Result<FieldState, FieldError> {
        if !delta.is_finite() {
            return Err(FieldError::InvalidDelta {
                coherence_delta: delta.coherence_delta,
                dissonance_delta: delta.dissonance_delta,
            });
        }
        Ok(FieldState::new(
            self.coherence + delta.coherence_delta,
            self.dissonance + delta.dissonance_delta,
        ))
    }
}

impl Default for FieldState {
    fn default() -> Self {
        Self {
            coherence: DEFAULT_COHERENCE,
            dissonance: DEFAULT_DISSONANCE,
        }
    }
}

// ─── ImpactDelta ────────────────────────────────────────────────────────────

/// A coherence/dissonance delta computed by the host's impact calculator.
///
/// Deltas may be any finite value, positive or negative — the field clamps
/// the result. Non-finite components fail [`FieldState::apply`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImpactDelta {
    /// Change to apply to field coherence.
    pub coherence_delta: f32,
    /// Change to apply to field dissonance.
    pub dissonance_delta: f32,
}

impl ImpactDelta {
    /// Construct an impact delta.
    pub fn new(coherence_delta: f32, dissonance_delta: f32) -> Self {
        Self {
            coherence_delta,
            dissonance_delta,
        }
    }

    /// `true` when both components are finite (not NaN, not ±∞).
    pub fn is_finite(&self) -> bool {
        self.coherence_delta.is_finite() && self.dissonance_delta.is_finite()
    }
}

// ─── FieldError ─────────────────────────────────────────────────────────────

/// Errors produced by field state mutation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldError {
    /// An impact delta contained a NaN or infinite component (RFE-007).
    /// The field state was left unchanged.
    InvalidDelta {
        /// The offending coherence delta.
        coherence_delta: f32,
        /// The offending dissonance delta.
        dissonance_delta: f32,
    },
}

impl core::fmt::Display for FieldError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FieldError::InvalidDelta {
                coherence_delta,
                dissonance_delta,
            } => write!(
                f,
                "invalid impact delta: coherence_delta={coherence_delta}, dissonance_delta={dissonance_delta} (both must be finite)"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FieldError {}

// ─── Tests ──────────────────────────────────────────────────────────────────
