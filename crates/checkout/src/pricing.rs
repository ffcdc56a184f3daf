//! Pricing engine for saved case configurations.
//!
//! A quote is `base + surcharge(finish) + surcharge(material)`, all in
//! integer cents. The table is injected from configuration at startup, so
//! re-quoting the same options always yields the same figure. Note that
//! existing orders keep the amount they were created with; the ledger never
//! re-prices them (see `OrderStore::get_or_create`).

use rust_decimal::Decimal;

use caseforge_core::{Finish, Material};

/// Pricing rule table, in integer minor currency units (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceTable {
    /// Price of a plain silicone case.
    pub base_cents: i64,
    /// Surcharge for a textured finish.
    pub textured_finish_cents: i64,
    /// Surcharge for a polycarbonate shell.
    pub polycarbonate_material_cents: i64,
}

impl PriceTable {
    /// Quote a configuration's price in cents.
    #[must_use]
    pub const fn quote(&self, finish: Finish, material: Material) -> i64 {
        self.base_cents + self.finish_surcharge(finish) + self.material_surcharge(material)
    }

    const fn finish_surcharge(&self, finish: Finish) -> i64 {
        match finish {
            Finish::Plain => 0,
            Finish::Textured => self.textured_finish_cents,
        }
    }

    const fn material_surcharge(&self, material: Material) -> i64 {
        match material {
            Material::Silicone => 0,
            Material::Polycarbonate => self.polycarbonate_material_cents,
        }
    }
}

/// Convert a price in cents to an order amount in currency units.
#[must_use]
pub fn amount_from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
