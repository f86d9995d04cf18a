//! Common test infrastructure for otp-resolver tests
//!
//! - `constants`: manifest bodies, platform segments
//! - `mock_server`: wiremock setup helpers for builds manifests

#![allow(dead_code)]

pub mod constants;
pub mod mock_server;

pub use constants::*;
pub use mock_server::*;
