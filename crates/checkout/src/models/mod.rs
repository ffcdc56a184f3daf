//! Domain models for the checkout service.

pub mod configuration;
pub mod order;
pub mod session;
pub mod user;

pub use configuration::Configuration;
pub use order::Order;
pub use session::{CurrentUser, keys};
pub use user::User;
