//! # depsentry-trusty
//!
//! Trust-score (package reputation) client (§4.D): given a dependency,
//! returns a normalized [`depsentry_core::TrustyReport`].

pub mod client;
pub mod components;
pub mod error;
pub mod wire;

pub use client::TrustyClient;
pub use error::{Result, TrustyError};
