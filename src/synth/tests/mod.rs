//! Synthesizer test modules.
//!
//! - `core`: statement shapes and parameter numbering on postgres
//! - `dialects`: per-dialect placeholders, generated keys, upserts and calls

mod core;
mod dialects;
