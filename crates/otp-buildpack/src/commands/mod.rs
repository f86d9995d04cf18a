//! Buildpack phase commands

pub mod build;
pub mod detect;
