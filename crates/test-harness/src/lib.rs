//! Test harness for scripted bolt builds.
//!
//! Drives the same dispatch path the host command uses, against the mock
//! kernel, and checks the result at the report and topology level.
//!
//! # Key Components
//!
//! - [`BoltHarness`]: Fluent API for setting inputs and running builds
//! - [`assertions`]: Assertion helpers returning [`HarnessError`] with context

pub mod assertions;
pub mod helpers;

pub use helpers::{BoltHarness, HarnessError};
