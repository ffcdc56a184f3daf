//! Core types for Caseforge.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod currency;
pub mod options;

pub use currency::CurrencyCode;
pub use options::{Finish, Material, ParseOptionError};
