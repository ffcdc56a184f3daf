//! Business logic services for the checkout flow.
//!
//! # Services
//!
//! - `checkout` - Payment session orchestration (the whole purchase flow)

pub mod checkout;

pub use checkout::{CheckoutService, CheckoutSettings};
