// ============================================================
// Layer 3 - PredictionResult Domain Type
// ============================================================
// What one estimate produces. Created per call and handed to
// the caller; the engine keeps no copy. Turning it into JSON,
// an HTTP body, or a file on disk is the host application's
// business, which is why it derives Serialize/Deserialize.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// Lower bound for every predicted price
pub const MIN_PRICE: u32 = 500;
/// Upper bound for every predicted price
pub const MAX_PRICE: u32 = 50_000;
/// Lower bound for the confidence value
pub const MIN_CONFIDENCE: f64 = 60.0;
/// Upper bound for the confidence value
pub const MAX_CONFIDENCE: f64 = 95.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Whole currency units, always within [MIN_PRICE, MAX_PRICE]
    pub predicted_price: u32,

    /// Heuristic score within [MIN_CONFIDENCE, MAX_CONFIDENCE],
    /// rounded to one decimal place. Not a probability.
    pub confidence: f64,

    /// The location text exactly as the caller supplied it
    pub location: String,

    /// The country text exactly as the caller supplied it
    pub country: String,
}

impl PredictionResult {
    pub fn new(
        predicted_price: u32,
        confidence:      f64,
        location:        impl Into<String>,
        country:         impl Into<String>,
    ) -> Self {
        Self {
            predicted_price,
            confidence,
            location: location.into(),
            country:  country.into(),
        }
    }

    /// True when both numeric fields sit inside their bounds
    pub fn is_within_bounds(&self) -> bool {
        (MIN_PRICE..=MAX_PRICE).contains(&self.predicted_price)
            && (MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&self.confidence)
    }
}
