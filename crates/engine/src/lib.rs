//! `entlink-engine` — blocking-based fuzzy record linkage engine.
//!
//! Pure engine crate: receives pre-loaded records from two datasets, returns
//! accepted left↔right matches plus run counters. No CLI dependencies.
//!
//! Pipeline: normalized records → blocking keys → per-dataset block index →
//! common-block enumeration → per-block best-match selection under a
//! configurable similarity scorer and threshold.

pub mod block;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod normalize;
pub mod scorer;
pub mod selector;
pub mod summary;

pub use config::LinkConfig;
pub use engine::run;
pub use error::LinkError;
pub use model::{LinkInput, LinkResult, MatchResult, Record};
pub use scorer::{ScorerKind, SimilarityScorer};
