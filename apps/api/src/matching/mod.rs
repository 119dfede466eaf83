// Matching Engine
//
// Pipeline (per request):
//   1. Extract   — transcript → NeedsProfile (extractor.rs)
//   2. Filter    — drop out-of-area, ineligible and non-public resources (filter.rs)
//   3. Score     — additive keyword scoring over the survivors (scorer.rs)
//   4. Rank      — safety override, stable sort, top 3, justifications (ranking.rs)
//   5. Questions — explicit or inferred category, rapport gate, cap (questions.rs)
//
// All stages are synchronous and read only the shared catalog snapshot and
// vocabulary.

pub mod engine;
pub mod extractor;
pub mod filter;
pub mod handlers;
pub mod profile;
pub mod questions;
pub mod ranking;
pub mod scorer;
pub mod vocabulary;

// Re-export the public API consumed by state and handlers.
pub use engine::MatchingEngine;
pub use vocabulary::Vocabulary;
