//! git-recap crate
//!
//! This crate is an implementation detail of the `git-recap` tool. This crate's API is fluid and may change without warning
//! and in a semver-incompatible way.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

#[doc(hidden)]
pub mod commands;

#[doc(hidden)]
pub mod config;

#[doc(hidden)]
pub mod facts;

#[doc(hidden)]
pub mod misc;

#[doc(hidden)]
pub mod pipeline;

#[doc(hidden)]
pub mod reports;

pub use crate::commands::{Host, run};
