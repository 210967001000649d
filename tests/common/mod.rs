//! Common test utilities for adcirc-tiles.
//!
//! Staging directories, fakes for the external tools, and assertion helpers.
#![allow(dead_code)]

pub mod assertions;
pub mod fakes;
pub mod image_utils;
pub mod staging;
