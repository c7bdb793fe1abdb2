//! AgroLink Core - Shared types library.
//!
//! This crate provides common types used across the AgroLink admin client
//! components:
//! - `client` - Headless admin API client (sessions, lists, workflows)
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, roles, and decisions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
