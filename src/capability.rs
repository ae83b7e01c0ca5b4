//! Collaborator capabilities injected into the engine.
//!
//! The engine does not subclass a host agent; it *composes* with it. The
//! host supplies three capabilities at construction and the engine stays
//! generic over them:
//!
//! - [`ImpactCalculator`] — converts an intent into a coherence/dissonance
//!   delta. May be arbitrarily expensive; its failures propagate to the
//!   caller of `process_with` unmodified, with no internal retry.
//! - [`MarkerExtractor`] — pulls symbolic markers out of intent content.
//!   Pure and infallible; an empty result is normalised by the engine to a
//!   single neutral marker so the tracker always has a signal to decay
//!   toward.
//! - [`MemoryStore`] — audit-trail persistence of history entries. Called
//!   after field state is committed; a failure propagates but never rolls
//!   back the field.

use alloc::string::String;
use alloc::vec::Vec;

use crate::field::ImpactDelta;
use crate::history::ResonanceHistoryEntry;
use crate::signature::SymbolicMarker;

/// The engine's view of an incoming intent: content for marker extraction
/// and an opaque signature for the audit log.
#[derive(Clone, Debug, PartialEq)]
pub struct Intent {
    /// Intent content handed to the marker extractor.
    pub text: String,
    /// Opaque identifier recorded in history entries.
    pub signature: String,
}

impl Intent {
    /// Construct an intent.
    pub fn new(text: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            signature: signature.into(),
        }
    }
}

/// Converts an intent into a field impact. Supplied by the host.
pub trait ImpactCalculator {
    /// Failure type surfaced unmodified to the engine caller.
    type Error;

    /// Compute the coherence/dissonance delta for `intent`.
    fn compute_impact(&self, intent: &Intent) -> Result<ImpactDelta, Self::Error>;
}

/// Extracts symbolic markers from intent content. Supplied by the host.
pub trait MarkerExtractor {
    /// Extract the markers carried by `text`.
    ///
    /// May return an empty vector — the engine substitutes
    /// [`SymbolicMarker::neutral`] in that case.
    fn extract(&self, text: &str) -> Vec<SymbolicMarker>;
}

/// Persists history entries for the audit trail. Supplied by the host.
pub trait MemoryStore {
    /// Failure type surfaced unmodified to the engine caller.
    type Error;

    /// Store one imprint. Field state is already committed when this runs.
    fn store_imprint(&mut self, entry: &ResonanceHistoryEntry) -> Result<(), Self::Error>;
}

/// A [`MemoryStore`] that drops every imprint. For hosts without an audit
/// trail, and for tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullStore;

impl MemoryStore for NullStore {
    type Error = core::convert::Infallible;

    fn store_imprint(&mut self, _entry: &ResonanceHistoryEntry) -> Result<(), Self::Error> {
        Ok(())
    }
}
