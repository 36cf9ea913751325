//! Maplewood Core - Shared types library.
//!
//! This crate provides the common types used by the Maplewood Clinic site:
//! type-safe IDs, prices, emails, order statuses, and the session cart rules.
//!
//! # Architecture
//!
//! The core crate contains only types and pure domain rules - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and
//!   order statuses, plus the session [`Cart`] mutation rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
