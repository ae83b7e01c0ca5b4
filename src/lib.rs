//! # cfe-core
//!
//! Coherence field engine — a bounded, self-stabilising resonance state for
//! agent runtimes.
//!
//! An agent owns one field: a pair of clamped scalars (coherence and
//! dissonance) that every processed intent perturbs and that the engine
//! damps back toward stability. Around that pair sit four bounded
//! structures: a decaying map of symbolic signal strengths, a FIFO history
//! of past impacts, a hysteretic stabilization buffer, and a linear decay
//! projector. External collaborators never mutate any of it — they supply
//! capabilities at the seams and read through the snapshot.
//!
//! ## The pipeline
//!
//! ```text
//! Intent ──► impact (host) ──► FieldState ──► ResonanceLog ──► predict
//!                │                  │
//!         MarkerExtractor    OscillatoryBuffer (hysteresis)
//!                │
//!         SignatureTracker (asymmetric EMA)
//! ```
//!
//! Per intent: the externally computed impact is clamped into the field, a
//! history entry is appended, the intent's symbolic markers are folded into
//! the tracker (absent symbols decay), the stabilization buffer is evaluated
//! against the new dissonance, and a decay projection is computed. On
//! request the engine scores interference against an external agent state.
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`field`] | [`field::FieldState`], [`field::ImpactDelta`] | Clamped scalar state and impact application |
//! | [`signature`] | [`signature::SignatureTracker`] | Bounded decaying symbol map with trend partition |
//! | [`history`] | [`history::ResonanceLog`] | FIFO impact log, ≤ 100 entries |
//! | [`predict`] | [`predict::DecayPrediction`] | First-order coherence trend extrapolation |
//! | [`buffer`] | [`buffer::OscillatoryBuffer`] | Hysteretic stabilizer with bounded harmonic map |
//! | [`interference`] | [`interference::InterferencePattern`] | Agent-vs-field alignment scoring |
//! | [`capability`] | [`capability::ImpactCalculator`] | Host-supplied collaborator traits |
//! | [`engine`] | [`engine::FieldEngine`] | Per-intent orchestration and snapshot API |
//!
//! ## Invariants
//!
//! - **RFE-001** — field coherence and dissonance in [0.0, 1.0] after every
//!   mutation; clamping is designed behaviour, not an error path.
//! - **RFE-002** — signature entries below strength 0.05 are pruned, never
//!   retained at zero.
//! - **RFE-003** — at most 64 tracked symbols; stalest-observation eviction.
//! - **RFE-004** — history holds at most 100 entries, oldest dropped first.
//! - **RFE-005** — fewer than 5 history samples yields the no-trend
//!   prediction, never an error.
//! - **RFE-006** — stabilization factor capped at 0.8.
//! - **RFE-007** — non-finite impact deltas are rejected with the state left
//!   unchanged.
//! - **RFE-008** — harmonic map holds at most 20 entries, first-inserted
//!   evicted first.
//!
//! ## Concurrency
//!
//! A [`engine::FieldEngine`] is owned by exactly one logical agent/session;
//! all mutation goes through `&mut self` and is not internally synchronised.
//! Snapshots are cheap clones taken through `&self`.
//!
//! ## `no_std`
//!
//! `no_std` by default (with `alloc`). Enable the `std` feature for
//! `std::error::Error` impls, and the `serde` feature for serialisation of
//! snapshot and history types.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod buffer;
pub mod capability;
pub mod engine;
pub mod field;
pub mod history;
pub mod interference;
pub mod predict;
pub mod signature;
