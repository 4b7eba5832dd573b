//! # nutz testkit
//!
//! Test utilities for nutz.
//!
//! This crate provides:
//! - Temporary store fixtures and scenario helpers
//! - Property-based test generators using proptest
//! - A model harness that mirrors operations in memory and checks the store
//!
//! ## Usage
//!
//! ```rust
//! use nutz_testkit::prelude::*;
//!
//! with_temp_store(|session| {
//!     let created = session.create("base", "k", b"v", &["a"]);
//!     assert!(created.is_ok());
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
