//! kactor runtime library.
//!
//! This crate ships the `actor-runtime` binary, and exposes its building
//! blocks so actor types can be hosted by other binaries and tested in
//! isolation.

pub mod actor;
pub mod api;
pub mod config;
pub mod registry;
pub mod state;
