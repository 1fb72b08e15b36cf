//! Price feed types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single observed price for a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdate {
    /// Product identifier
    pub product_id: String,
    /// Observed price
    pub price: Decimal,
    /// Local timestamp when the update was produced
    pub timestamp: DateTime<Utc>,
}

impl PriceUpdate {
    pub fn new(product_id: impl Into<String>, price: Decimal) -> Self {
        Self {
            product_id: product_id.into(),
            price,
            timestamp: Utc::now(),
        }
    }
}
