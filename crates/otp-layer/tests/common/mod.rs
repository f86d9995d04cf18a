//! Common test infrastructure for otp-layer tests
//!
//! - `archive`: in-memory OTP release archives
//! - `fakes`: recording `Installer` and `ManifestTransport` implementations

#![allow(dead_code)]

pub mod archive;
pub mod fakes;

pub use archive::*;
pub use fakes::*;

use std::fs;
use std::path::Path;

pub const JAMMY_STACK: &str = "io.buildpacks.stacks.jammy";
pub const NOBLE_STACK: &str = "io.buildpacks.stacks.noble";
pub const BUILDS_URL: &str = "https://builds.hex.pm/builds/otp";

/// Write a previous build's `erlang.toml` into `layers_dir`
pub fn write_prior_descriptor(layers_dir: &Path, version: &str, arch: &str, ubuntu_version: &str) {
    fs::create_dir_all(layers_dir.join("erlang")).unwrap();
    fs::write(
        layers_dir.join("erlang.toml"),
        format!(
            "[types]\nbuild = true\ncache = true\nlaunch = true\n\n\
             [metadata]\nversion = \"{}\"\narch = \"{}\"\nubuntu-version = \"{}\"\n",
            version, arch, ubuntu_version
        ),
    )
    .unwrap();
}
