//! Layer management and installation for the Erlang buildpack
//!
//! Provides:
//! - CNB layer acquisition, reset and persistence
//! - Cache records and the reuse/rebuild decision
//! - Archive download and unpacking
//! - Build orchestration

pub mod build;
pub mod cache;
pub mod installer;
pub mod layer;

pub use build::{build, format_duration, BuildContext, BuildOutcome, BuildResult};
pub use cache::{CacheDecision, CacheRecord};
pub use installer::{unpack_stripped, HttpArchiveInstaller, Installer};
pub use layer::{Layer, LayerEnv, Layers};
