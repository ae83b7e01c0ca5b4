//! Resonance history — a bounded FIFO of past intent impacts.
//!
//! Pure bookkeeping: the log stores what each processed intent did to the
//! field and is consumed by the decay predictor and the audit-trail store.
//!
//! # Invariants
//!
//! - **RFE-004**: at most [`HISTORY_CAPACITY`] entries; the oldest entry is
//!   dropped first on overflow. The capacity is encoded in the deque type.

use heapless::Deque;

use alloc::string::String;
use alloc::vec::Vec;

use crate::field::FieldState;
use crate::signature::SymbolicMarker;

/// Maximum number of retained history entries (RFE-004).
pub const HISTORY_CAPACITY: usize = 100;

/// One processed intent's footprint on the field.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResonanceHistoryEntry {
    /// Engine tick at which the intent was processed.
    pub tick: u64,
    /// Opaque identifier of the intent, for the audit trail.
    pub intent_signature: String,
    /// Coherence delta that was applied.
    pub coherence_impact: f32,
    /// Dissonance delta that was applied.
    pub dissonance_impact: f32,
    /// Field state immediately after the impact was committed.
    pub field_state: FieldState,
    /// Symbolic markers the intent carried.
    pub markers: Vec<SymbolicMarker>,
}

/// Bounded FIFO log of [`ResonanceHistoryEntry`] values, oldest first.
#[derive(Clone, Debug, Default)]
pub struct ResonanceLog {
    entries: Deque<ResonanceHistoryEntry, HISTORY_CAPACITY>,
}

impl ResonanceLog {
    /// Construct an empty log.
    pub fn new() -> Self {
        Self {
            entries: Deque::new(),
        }
    }

    /// Append an entry, evicting the oldest when at capacity.
    pub fn record(&mut self, entry: ResonanceHistoryEntry) {
        if self.entries.is_full() {
            self.entries.pop_front();
        }
        // Cannot fail: a slot was freed above if the deque was full.
        let _ = self.entries.push_back(entry);
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in chronological order (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &ResonanceHistoryEntry> {
        self.entries.iter()
    }

    /// The most recent entry, if any.
    pub fn latest(&self) -> Option<&ResonanceHistoryEntry> {
        self.entries.back()
    }

    /// Coherence values of the last `n` entries, oldest first.
    ///
    /// Returns fewer than `n` values when the log is shorter.
    pub fn recent_coherence(&self, n: usize) -> Vec<f32> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries
            .iter()
            .skip(skip)
            .map(|e| e.field_state.coherence)
            .collect()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
