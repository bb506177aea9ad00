// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits rather
// than concrete types, so an alternative encoder or estimator
// can be dropped in without touching the callers.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::{features::FeatureVector, prediction::PredictionResult};

// ─── TextEncoder ──────────────────────────────────────────────────────────────
/// Any component that turns free text into a fixed-slot vector.
///
/// Implementations:
///   - FeatureEncoder → lexical counts and indicator flags
pub trait TextEncoder {
    /// Must be total: every string, including "", maps to a vector.
    fn encode(&self, text: &str) -> FeatureVector;
}

// ─── PriceEstimator ───────────────────────────────────────────────────────────
/// Any component that can price a listing from an image and
/// its location/country text.
///
/// The image representation is left to the implementation so
/// this layer stays free of tensor types.
///
/// Implementations:
///   - PriceEstimateUseCase → CNN forward pass + price heuristic
pub trait PriceEstimator {
    type Image;

    fn estimate(
        &self,
        image:    &Self::Image,
        location: &str,
        country:  &str,
    ) -> Result<PredictionResult>;
}
