//! Caseforge Core - Shared types library.
//!
//! This crate provides the domain types shared across Caseforge components:
//! - `checkout` - Checkout service (pricing, orders, Stripe hand-off)
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Case option enums and currency codes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
