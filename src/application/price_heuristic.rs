// ============================================================
// Layer 2 - Price Heuristic
// ============================================================
// Turns an image and two feature vectors into a bounded price
// and a bounded confidence value:
//
//   luxury   = mean(image) · 1000
//   loc_mult = 1 + 0.1  · Σ location features
//   ct_mult  = 1 + 0.05 · Σ country features
//   raw      = (2000 + luxury) · loc_mult · ct_mult
//   price    = clamp(raw · (1 + N(0, 0.1)), 500, 50000), truncated
//   conf     = clamp(80 + N(0, 10), 60, 95), one decimal
//
// The constants are demo values with no calibration behind
// them. They are kept exactly as they are so estimates stay
// comparable with earlier runs.
//
// The two normal draws are the only nondeterminism in the
// whole engine. They come from the generator the caller passes
// in, price noise first, confidence noise second.
//
// Reference: rand_distr documentation (StandardNormal)

use rand::Rng;
use rand_distr::StandardNormal;

use crate::domain::features::FeatureVector;
use crate::domain::prediction::{MAX_CONFIDENCE, MAX_PRICE, MIN_CONFIDENCE, MIN_PRICE};
use crate::ml::tensor::Tensor4;

pub const BASE_PRICE:           f64 = 2000.0;
pub const LUXURY_SCALE:         f64 = 1000.0;
pub const LOCATION_WEIGHT:      f64 = 0.1;
pub const COUNTRY_WEIGHT:       f64 = 0.05;
/// Standard deviation of the multiplicative price noise
pub const PRICE_NOISE_STD:      f64 = 0.1;
pub const CONFIDENCE_CENTER:    f64 = 80.0;
pub const CONFIDENCE_NOISE_STD: f64 = 10.0;

/// The numeric half of a PredictionResult
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    pub predicted_price: u32,
    pub confidence:      f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PriceHeuristic;

impl PriceHeuristic {
    pub fn new() -> Self {
        Self
    }

    /// Everything up to step 4: the price before noise and clamping.
    pub fn base_price(
        &self,
        image_mean: f64,
        location:   &FeatureVector,
        country:    &FeatureVector,
    ) -> f64 {
        let luxury   = image_mean * LUXURY_SCALE;
        let loc_mult = 1.0 + LOCATION_WEIGHT * location.sum();
        let ct_mult  = 1.0 + COUNTRY_WEIGHT * country.sum();
        (BASE_PRICE + luxury) * loc_mult * ct_mult
    }

    /// Never fails. Non-finite intermediate values end up on
    /// one of the clamp bounds.
    pub fn predict<R: Rng>(
        &self,
        image:    &Tensor4,
        location: &FeatureVector,
        country:  &FeatureVector,
        rng:      &mut R,
    ) -> PriceQuote {
        let raw = self.base_price(image.mean(), location, country);

        let noise: f64 = rng.sample::<f64, _>(StandardNormal) * PRICE_NOISE_STD;
        let predicted_price = clamp_price(raw * (1.0 + noise));

        let jitter: f64 = rng.sample::<f64, _>(StandardNormal) * CONFIDENCE_NOISE_STD;
        let confidence = round_confidence(CONFIDENCE_CENTER + jitter);

        tracing::debug!(
            "Heuristic: raw={:.2} noise={:+.4} → price={} confidence={}",
            raw, noise, predicted_price, confidence,
        );

        PriceQuote { predicted_price, confidence }
    }
}

/// Clamp into [MIN_PRICE, MAX_PRICE] and truncate toward zero.
fn clamp_price(value: f64) -> u32 {
    if value.is_nan() {
        return MIN_PRICE;
    }
    value.clamp(MIN_PRICE as f64, MAX_PRICE as f64) as u32
}

/// Clamp into [MIN_CONFIDENCE, MAX_CONFIDENCE], one decimal place.
/// Exact halves round to the even neighbour (77.25 → 77.2).
fn round_confidence(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_CONFIDENCE;
    }
    let clamped = value.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);
    (clamped * 10.0).round_ties_even() / 10.0
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::feature_encoder::FeatureEncoder;
    use rand::{rngs::StdRng, SeedableRng};

    fn gray() -> Tensor4 {
        Tensor4::filled([1, 64, 64, 3], 0.5)
    }

    #[test]
    fn test_base_price_for_mumbai() {
        // "mumbai, maharashtra": 19 chars + 2 words + 7 vowels + 12 others = 40
        // "india":                5 chars + 1 word  + 3 vowels +  2 others = 11
        // (2000 + 500) · (1 + 4.0) · (1 + 0.55) = 19375
        let enc = FeatureEncoder::new();
        let loc = enc.encode("Mumbai, Maharashtra");
        let ct  = enc.encode("India");
        assert_eq!(loc.sum(), 40.0);
        assert_eq!(ct.sum(), 11.0);
        let raw = PriceHeuristic::new().base_price(gray().mean(), &loc, &ct);
        assert!((raw - 19375.0).abs() < 1e-6, "raw = {raw}");
    }

    #[test]
    fn test_empty_inputs_give_base_price() {
        let zero = FeatureVector::zeros();
        let raw  = PriceHeuristic::new().base_price(0.0, &zero, &zero);
        assert_eq!(raw, BASE_PRICE);
    }

    #[test]
    fn test_same_seed_same_quote() {
        let enc = FeatureEncoder::new();
        let (loc, ct) = (enc.encode("Goa Beach Resort"), enc.encode("India"));
        let h = PriceHeuristic::new();
        let a = h.predict(&gray(), &loc, &ct, &mut StdRng::seed_from_u64(99));
        let b = h.predict(&gray(), &loc, &ct, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_noise_moves_price_within_bounds() {
        let enc = FeatureEncoder::new();
        let (loc, ct) = (enc.encode("Mumbai, Maharashtra"), enc.encode("India"));
        let h = PriceHeuristic::new();

        let prices: Vec<u32> = (0..50)
            .map(|seed| h.predict(&gray(), &loc, &ct, &mut StdRng::seed_from_u64(seed)))
            .inspect(|q| {
                assert!((MIN_PRICE..=MAX_PRICE).contains(&q.predicted_price));
                assert!((MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&q.confidence));
            })
            .map(|q| q.predicted_price)
            .collect();

        let first = prices[0];
        assert!(prices.iter().any(|&p| p != first), "noise never changed the price");
    }

    #[test]
    fn test_extreme_inputs_stay_clamped() {
        let enc  = FeatureEncoder::new();
        let long = "mountain valley resort village ".repeat(200);
        let h    = PriceHeuristic::new();
        let mut rng = StdRng::seed_from_u64(1);

        let huge = h.predict(&Tensor4::filled([1, 64, 64, 3], 1.0),
            &enc.encode(&long), &enc.encode(&long), &mut rng);
        assert_eq!(huge.predicted_price, MAX_PRICE);

        let zero = FeatureVector::zeros();
        let tiny = h.predict(&Tensor4::filled([1, 64, 64, 3], -100.0), &zero, &zero, &mut rng);
        assert_eq!(tiny.predicted_price, MIN_PRICE);
    }

    #[test]
    fn test_clamp_price_truncates() {
        assert_eq!(clamp_price(1234.99), 1234);
        assert_eq!(clamp_price(1e12), MAX_PRICE);
        assert_eq!(clamp_price(-3.0), MIN_PRICE);
        assert_eq!(clamp_price(f64::NAN), MIN_PRICE);
        assert_eq!(clamp_price(f64::INFINITY), MAX_PRICE);
    }

    #[test]
    fn test_round_confidence() {
        assert_eq!(round_confidence(77.46), 77.5);
        assert_eq!(round_confidence(77.25), 77.2);
        assert_eq!(round_confidence(77.75), 77.8);
        assert_eq!(round_confidence(120.0), MAX_CONFIDENCE);
        assert_eq!(round_confidence(12.0), MIN_CONFIDENCE);
        assert_eq!(round_confidence(f64::NAN), MIN_CONFIDENCE);
    }
}
