//! Agent Runtime - collaborator adapters and recommendation orchestration
//!
//! This crate connects the pure pipeline stages in `planora-core` to the
//! outside world:
//! - Asks a text-generation service for candidate places (`llm`)
//! - Resolves place names and the trip center to coordinates (`geocoder`)
//! - Runs the per-category loop and category balancing (`runtime`)
//!
//! # Architecture
//!
//! For each requested category the runtime runs:
//! 1. **Prompt** - `planora_core::recommendations::build_prompt`
//! 2. **Generation** (`llm`) - `TextGenerator` returns delimited text
//! 3. **Parsing** - text → `Candidate`s
//! 4. **Geocoding** (`geocoder`) - 1:1, with a center-point fallback
//! 5. **Ranking** - filters, score, ordering
//!
//! then balances the per-category lists into one response.
//!
//! # Failure Principle
//!
//! Collaborators are best-effort. A failed category yields no candidates and a
//! failed geocode yields an approximate location; only missing credentials and
//! an unresolvable trip center fail the request.

pub mod geocoder;
pub mod llm;
pub mod runtime;
