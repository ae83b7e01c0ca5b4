//! Symbolic signature tracking — a bounded, decaying map of symbol strengths.
//!
//! The tracker is an asymmetric EMA over the symbols carried by processed
//! intents: new evidence is weighted lightly (×0.2) so the signature is
//! sticky, while silence decays slowly (2% per step) so stale themes fade
//! over tens of interactions rather than disappearing abruptly.
//!
//! # Invariants
//!
//! - **RFE-002**: entries whose strength drops below [`PRUNE_FLOOR`] are
//!   removed, never retained at zero.
//! - **RFE-003**: at most [`MAX_SYMBOLS`] entries; inserting past capacity
//!   evicts the entry with the stalest `last_update`.

use hashbrown::HashMap;

use alloc::string::String;
use alloc::vec::Vec;

/// Weight of the existing strength when blending an observed symbol.
pub const BLEND_RETAIN: f32 = 0.8;

/// Weight of the observed strength when blending an observed symbol.
pub const BLEND_OBSERVE: f32 = 0.2;

/// Per-step decay multiplier for tracked symbols absent from the marker set.
pub const ABSENT_DECAY: f32 = 0.98;

/// Strength below which a decayed entry is pruned (RFE-002).
pub const PRUNE_FLOOR: f32 = 0.05;

/// Maximum number of tracked symbols. Stalest entry is evicted when full.
pub const MAX_SYMBOLS: usize = 64;

/// Symbol tag emitted when an intent carries no extractable markers.
pub const NEUTRAL_SYMBOL: &str = "neutral";

/// Strength of the neutral fallback marker.
pub const NEUTRAL_STRENGTH: f32 = 0.3;

// ─── SymbolicMarker ─────────────────────────────────────────────────────────

/// A lightweight tag extracted from intent content — which "theme" the
/// intent touches and how strongly.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymbolicMarker {
    /// Theme tag, e.g. `"creation"` or `"conflict"`.
    pub symbol: String,
    /// Observation strength [0.0, 1.0]; clamped on ingestion.
    pub strength: f32,
}

impl SymbolicMarker {
    /// Construct a marker.
    pub fn new(symbol: impl Into<String>, strength: f32) -> Self {
        Self {
            symbol: symbol.into(),
            strength,
        }
    }

    /// The fallback marker used when extraction yields nothing, so the
    /// tracker always has a signal to decay toward.
    pub fn neutral() -> Self {
        Self::new(NEUTRAL_SYMBOL, NEUTRAL_STRENGTH)
    }
}

// ─── Trend ──────────────────────────────────────────────────────────────────

/// Direction of a tracked symbol's strength since the previous update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Trend {
    /// Blended strength rose.
    Increasing,
    /// Blended or decayed strength fell.
    Decreasing,
    /// Strength unchanged.
    Stable,
    /// First observation of this symbol.
    Emerging,
}

// ─── SignatureEntry ─────────────────────────────────────────────────────────

/// Tracked state for one symbol.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignatureEntry {
    /// Blended strength [0.0, 1.0].
    pub strength: f32,
    /// Direction of the last change.
    pub trend: Trend,
    /// Tick of the most recent *observation* (decay does not refresh this,
    /// so eviction targets symbols that have gone quiet).
    pub last_update: u64,
}

/// A symbol whose trend is not [`Trend::Stable`] after an update — the
/// "shift" set returned by [`SignatureTracker::update`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignatureShift {
    /// The shifted symbol.
    pub symbol: String,
    /// Strength after the update.
    pub strength: f32,
    /// Direction of the shift.
    pub trend: Trend,
}

/// Summary of the tracked signature: the strongest symbol plus the rising
/// and falling partitions.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct TrendSummary {
    /// Max-strength entry, or `None` when nothing is tracked.
    pub dominant: Option<(String, f32)>,
    /// Symbols trending up ([`Trend::Increasing`] or [`Trend::Emerging`]).
    pub rising: Vec<String>,
    /// Symbols trending down.
    pub falling: Vec<String>,
    /// Strength of the dominant entry, 0.0 when empty.
    pub strength: f32,
}

// ─── SignatureTracker ───────────────────────────────────────────────────────

/// Bounded map from symbol to [`SignatureEntry`], blending observations
/// with exponential decay.
#[derive(Clone, Debug, Default)]
pub struct SignatureTracker {
    entries: HashMap<String, SignatureEntry>,
}

impl SignatureTracker {
    /// Construct an empty tracker.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Fold a marker set into the signature at `tick`.
    ///
    /// Observed symbols blend `BLEND_RETAIN × old + BLEND_OBSERVE × observed`
    /// and take their trend from the comparison; unseen symbols insert as
    /// [`Trend::Emerging`]. Every tracked symbol absent from `markers` decays
    /// by [`ABSENT_DECAY`] and is pruned below [`PRUNE_FLOOR`] (RFE-002).
    ///
    /// Returns the shift set: all surviving entries whose trend is not
    /// [`Trend::Stable`].
    pub fn update(&mut self, markers: &[SymbolicMarker], tick: u64) -> Vec<SignatureShift> {
        for marker in markers {
            let observed = marker.strength.clamp(0.0, 1.0);
            match self.entries.get_mut(&marker.symbol) {
                Some(entry) => {
                    let blended = BLEND_RETAIN * entry.strength + BLEND_OBSERVE * observed;
                    entry.trend = if blended > entry.strength {
                        Trend::Increasing
                    } else if blended < entry.strength {
                        Trend::Decreasing
                    } else {
                        Trend::Stable
                    };
                    entry.strength = blended.clamp(0.0, 1.0);
                    entry.last_update = tick;
                }
                None => {
                    if self.entries.len() >= MAX_SYMBOLS {
                        self.evict_stalest();
                    }
                    self.entries.insert(
                        marker.symbol.clone(),
                        SignatureEntry {
                            strength: observed,
                            trend: Trend::Emerging,
                            last_update: tick,
                        },
                    );
                }
            }
        }

        // Decay everything the current marker set did not touch.
        let mut pruned: Vec<String> = Vec::new();
        for (symbol, entry) in self.entries.iter_mut() {
            if markers.iter().any(|m| &m.symbol == symbol) {
                continue;
            }
            entry.strength *= ABSENT_DECAY;
            if entry.strength < PRUNE_FLOOR {
                pruned.push(symbol.clone());
            } else {
                entry.trend = Trend::Decreasing;
            }
        }
        for symbol in pruned {
            self.entries.remove(&symbol);
        }

        let mut shifts: Vec<SignatureShift> = self
            .entries
            .iter()
            .filter(|(_, e)| e.trend != Trend::Stable)
            .map(|(symbol, e)| SignatureShift {
                symbol: symbol.clone(),
                strength: e.strength,
                trend: e.trend,
            })
            .collect();
        shifts.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        shifts
    }

    /// Summarise the signature: linear scan for the max-strength entry plus
    /// a partition of symbols by trend direction.
    pub fn dominant_trend(&self) -> TrendSummary {
        let mut summary = TrendSummary::default();
        for (symbol, entry) in self.entries.iter() {
            match entry.trend {
                Trend::Increasing | Trend::Emerging => summary.rising.push(symbol.clone()),
                Trend::Decreasing => summary.falling.push(symbol.clone()),
                Trend::Stable => {}
            }
            let stronger = match &summary.dominant {
                Some((_, s)) => entry.strength > *s,
                None => true,
            };
            if stronger {
                summary.dominant = Some((symbol.clone(), entry.strength));
                summary.strength = entry.strength;
            }
        }
        summary.rising.sort();
        summary.falling.sort();
        summary
    }

    /// Look up a tracked symbol.
    pub fn get(&self, symbol: &str) -> Option<&SignatureEntry> {
        self.entries.get(symbol)
    }

    /// Number of tracked symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all (symbol, entry) pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SignatureEntry)> {
        self.entries.iter()
    }

    /// Remove the entry with the oldest observation tick to make room.
    fn evict_stalest(&mut self) {
        if let Some(stalest) = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_update)
            .map(|(symbol, _)| symbol.clone())
        {
            self.entries.remove(&stalest);
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
