//! Saved case configuration.

use serde::{Deserialize, Serialize};

use caseforge_core::{Finish, Material};

/// A saved case customization a user wants to purchase.
///
/// Configurations are created by the design flow (a separate service) and
/// are strictly read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configuration {
    /// Unique configuration id, assigned by the design flow.
    pub id: String,
    /// Chosen surface finish.
    pub finish: Finish,
    /// Chosen shell material.
    pub material: Material,
    /// URL of the rendered case artwork, passed to the payment provider.
    pub image_url: String,
}
