//! Server crate for the ReelRecs recommendation engine.
//!
//! This crate wires the pieces of a session together: configuration,
//! the artifact cache, and the orchestrator that turns a selected title
//! into display-ready recommendations.

pub mod artifacts;
pub mod config;
pub mod orchestrator;

pub use artifacts::{Artifact, ArtifactStore};
pub use config::AppConfig;
pub use orchestrator::{MovieRecommendation, RecommendationOrchestrator, metadata_provider};
