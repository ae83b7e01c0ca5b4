//! The field engine façade — per-intent orchestration and the snapshot API.
//!
//! The engine owns all mutable core state (field scalars, signature tracker,
//! history log, stabilization buffer, tick counter). Collaborators never
//! mutate it directly: [`FieldEngine::process_intent`] is the sole mutation
//! entry point, and all reads go through [`FieldEngine::snapshot`] or the
//! returned [`ProcessOutcome`].
//!
//! There is no event emitter. Consumers (an ethics-threshold adapter, a
//! persona self-tuner, a security monitor) poll the snapshot or react to the
//! outcome returned from each processed intent — no hidden listener state.
//!
//! # Concurrency
//!
//! One engine per logical agent/session; mutation is not internally
//! synchronised. Wrap the engine in a mutex or actor if it must be shared.

use alloc::string::String;
use alloc::vec::Vec;

use crate::buffer::{BufferConfig, OscillatoryBuffer, OscillatoryState};
use crate::capability::{ImpactCalculator, Intent, MarkerExtractor, MemoryStore};
use crate::field::{FieldError, FieldState, ImpactDelta};
use crate::history::{ResonanceHistoryEntry, ResonanceLog};
use crate::interference::{self, AgentState, InterferencePattern};
use crate::predict::{predict, DecayPrediction};
use crate::signature::{SignatureEntry, SignatureShift, SignatureTracker, SymbolicMarker};

// ─── Errors ─────────────────────────────────────────────────────────────────

/// Failure of a [`FieldEngine::process_intent`] / `process_with` call.
#[derive(Clone, Debug, PartialEq)]
pub enum ProcessError<E> {
    /// The impact delta was invalid; field state was left unchanged.
    Field(FieldError),
    /// A collaborator failed. Field state may already be committed (store
    /// failures happen after the commit) — the payload is the collaborator's
    /// error, passed through unmodified.
    Collaborator(E),
}

impl<E> From<FieldError> for ProcessError<E> {
    fn from(err: FieldError) -> Self {
        ProcessError::Field(err)
    }
}

impl<E: core::fmt::Display> core::fmt::Display for ProcessError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ProcessError::Field(err) => write!(f, "{err}"),
            ProcessError::Collaborator(err) => write!(f, "collaborator failure: {err}"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: std::error::Error> std::error::Error for ProcessError<E> {}

// ─── Outcome & snapshot ─────────────────────────────────────────────────────

/// Composite result of one processed intent.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessOutcome {
    /// Field state after the impact was committed.
    pub state: FieldState,
    /// Signature entries whose trend changed this step.
    pub shifts: Vec<SignatureShift>,
    /// `true` when this intent tipped the stabilization buffer from
    /// inactive to active.
    pub buffer_activated: bool,
    /// Decay projection over the updated history.
    pub prediction: DecayPrediction,
}

/// Read-only point-in-time view of all core state.
///
/// Two snapshots taken with no intervening `process_intent` compare equal —
/// the read is idempotent and mutates nothing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldSnapshot {
    /// Field coherence [0.0, 1.0].
    pub coherence: f32,
    /// Field dissonance [0.0, 1.0].
    pub dissonance: f32,
    /// Engine tick at snapshot time.
    pub tick: u64,
    /// Tracked symbolic signature, sorted by symbol for determinism.
    pub symbolic_signature: Vec<(String, SignatureEntry)>,
    /// Stabilization buffer state.
    pub oscillatory: OscillatoryState,
    /// Decay projection over the current history.
    pub decay: DecayPrediction,
}

// ─── FieldEngine ────────────────────────────────────────────────────────────

/// The coherence field engine.
///
/// Generic over the host-supplied [`MarkerExtractor`] and [`MemoryStore`]
/// capabilities; the impact calculator is passed per call (see
/// [`FieldEngine::process_with`]) since the host may rotate calculators with
/// its ethical state.
#[derive(Debug)]
pub struct FieldEngine<M, S> {
    state: FieldState,
    tick: u64,
    tracker: SignatureTracker,
    log: ResonanceLog,
    buffer: OscillatoryBuffer,
    extractor: M,
    store: S,
}

impl<M, S> FieldEngine<M, S>
where
    M: MarkerExtractor,
    S: MemoryStore,
{
    /// Construct an engine with the default field state and buffer config.
    pub fn new(extractor: M, store: S) -> Self {
        Self::with_config(extractor, store, FieldState::default(), BufferConfig::default())
    }

    /// Construct an engine with explicit starting state and buffer tuning.
    pub fn with_config(
        extractor: M,
        store: S,
        state: FieldState,
        buffer_config: BufferConfig,
    ) -> Self {
        Self {
            state,
            tick: 0,
            tracker: SignatureTracker::new(),
            log: ResonanceLog::new(),
            buffer: OscillatoryBuffer::new(buffer_config),
            extractor,
            store,
        }
    }

    /// Process one intent against an externally computed impact.
    ///
    /// Pipeline: commit the clamped impact → advance the tick → extract and
    /// normalise markers → update the signature tracker → record the history
    /// entry → evaluate the stabilization buffer → project decay → store the
    /// imprint. An invalid delta rejects the whole call with the state
    /// untouched; a store failure propagates *after* the field state and
    /// history are committed.
    pub fn process_intent(
        &mut self,
        intent: &Intent,
        impact: ImpactDelta,
    ) -> Result<ProcessOutcome, ProcessError<S::Error>> {
        let state = self.state.apply(impact)?;
        self.state = state;
        self.tick += 1;

        let mut markers = self.extractor.extract(&intent.text);
        if markers.is_empty() {
            markers.push(SymbolicMarker::neutral());
        }
        let shifts = self.tracker.update(&markers, self.tick);

        let entry = ResonanceHistoryEntry {
            tick: self.tick,
            intent_signature: intent.signature.clone(),
            coherence_impact: impact.coherence_delta,
            dissonance_impact: impact.dissonance_delta,
            field_state: state,
            markers,
        };
        self.log.record(entry.clone());

        let trends = self.tracker.dominant_trend();
        let buffer_activated = self.buffer.evaluate(state.dissonance, &trends);
        let prediction = predict(&self.log, state.coherence);

        self.store
            .store_imprint(&entry)
            .map_err(ProcessError::Collaborator)?;

        Ok(ProcessOutcome {
            state,
            shifts,
            buffer_activated,
            prediction,
        })
    }

    /// Compute the impact through `calculator`, then process the intent.
    ///
    /// The calculator's failure propagates unmodified (converted into the
    /// store's error type, which the host typically shares across its
    /// collaborators).
    pub fn process_with<C>(
        &mut self,
        intent: &Intent,
        calculator: &C,
    ) -> Result<ProcessOutcome, ProcessError<S::Error>>
    where
        C: ImpactCalculator,
        S::Error: From<C::Error>,
    {
        let impact = calculator
            .compute_impact(intent)
            .map_err(|e| ProcessError::Collaborator(S::Error::from(e)))?;
        self.process_intent(intent, impact)
    }

    /// Read-only view of all core state. Idempotent; mutates nothing.
    pub fn snapshot(&self) -> FieldSnapshot {
        let mut symbolic_signature: Vec<(String, SignatureEntry)> = self
            .tracker
            .iter()
            .map(|(symbol, entry)| (symbol.clone(), *entry))
            .collect();
        symbolic_signature.sort_by(|a, b| a.0.cmp(&b.0));

        FieldSnapshot {
            coherence: self.state.coherence,
            dissonance: self.state.dissonance,
            tick: self.tick,
            symbolic_signature,
            oscillatory: self.buffer.state(),
            decay: predict(&self.log, self.state.coherence),
        }
    }

    /// Score interference between an external agent state and the field.
    pub fn interference(&self, agent: &AgentState) -> InterferencePattern {
        interference::score(agent, &self.state)
    }

    /// Force the stabilization buffer on at `dissonance_level`, bypassing
    /// the activation threshold. Manual control for the host's
    /// forced-stabilization path and for tests.
    pub fn activate_buffer(&mut self, dissonance_level: f32) {
        let trends = self.tracker.dominant_trend();
        self.buffer.force_activate(dissonance_level, &trends);
    }

    /// Insert or overwrite a per-symbol harmonic modifier on the buffer.
    pub fn update_harmonic(&mut self, symbol: impl Into<String>, factor: f32) {
        self.buffer.update_harmonic(symbol, factor);
    }

    // ── Read accessors ─────────────────────────────────────────────────────

    /// Current field state.
    pub fn state(&self) -> FieldState {
        self.state
    }

    /// Engine tick (number of processed intents).
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// The bounded history log.
    pub fn history(&self) -> &ResonanceLog {
        &self.log
    }

    /// The signature tracker.
    pub fn tracker(&self) -> &SignatureTracker {
        &self.tracker
    }

    /// The stabilization buffer.
    pub fn buffer(&self) -> &OscillatoryBuffer {
        &self.buffer
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
