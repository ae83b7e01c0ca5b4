//! Interference scoring between an external agent state and the field.
//!
//! Pure pairwise comparison, no state. Coupling only engages once alignment
//! is already high — a deliberate nonlinearity modelling resonance lock-in:
//! two weakly aligned states do not couple at all.

use crate::field::FieldState;

/// Alignment above which harmonic coupling engages.
pub const COUPLING_GATE: f32 = 0.8;

/// Coupling above which the pattern classifies as [`InterferencePhase::Resonant`].
pub const RESONANT_THRESHOLD: f32 = 0.7;

/// Interference above which the pattern classifies as [`InterferencePhase::Dissonant`].
pub const DISSONANT_THRESHOLD: f32 = 0.7;

/// An external agent's coherence/dissonance snapshot, as supplied by the
/// caller. Values are clamped into [0.0, 1.0] on scoring.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentState {
    /// The agent's own coherence [0.0, 1.0].
    pub coherence: f32,
    /// The agent's own dissonance [0.0, 1.0].
    pub dissonance: f32,
}

impl AgentState {
    /// Construct an agent state, clamping both components into [0.0, 1.0].
    pub fn new(coherence: f32, dissonance: f32) -> Self {
        Self {
            coherence: coherence.clamp(0.0, 1.0),
            dissonance: dissonance.clamp(0.0, 1.0),
        }
    }
}

/// Classification of an interference pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterferencePhase {
    /// Strong coupling: the agent and field reinforce each other.
    Resonant,
    /// Strong interference: the agent disturbs the field.
    Dissonant,
    /// Neither coupling nor interference dominates.
    Neutral,
}

/// Comparative score between an agent's state and the field's.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterferencePattern {
    /// Coherence agreement: `1 − |agent − field|`, in [0.0, 1.0].
    pub alignment: f32,
    /// Dissonance disagreement: `|agent − field|`, in [0.0, 1.0].
    pub interference: f32,
    /// `alignment × (1 − interference)` once alignment clears
    /// [`COUPLING_GATE`], otherwise 0.
    pub coupling: f32,
    /// Phase classification of this pattern.
    pub phase: InterferencePhase,
}

/// Score the interference between `agent` and `field`.
pub fn score(agent: &AgentState, field: &FieldState) -> InterferencePattern {
    let agent_coherence = agent.coherence.clamp(0.0, 1.0);
    let agent_dissonance = agent.dissonance.clamp(0.0, 1.0);

    let alignment = 1.0 - (agent_coherence - field.coherence).abs();
    let interference = (agent_dissonance - field.dissonance).abs();
    let coupling = if alignment > COUPLING_GATE {
        alignment * (1.0 - interference)
    } else {
        0.0
    };

    let phase = if coupling > RESONANT_THRESHOLD {
        InterferencePhase::Resonant
    } else if interference > DISSONANT_THRESHOLD {
        InterferencePhase::Dissonant
    } else {
        InterferencePhase::Neutral
    };

    InterferencePattern {
        alignment,
        interference,
        coupling,
        phase,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
