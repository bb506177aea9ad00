// ============================================================
// Layer 2 - PriceEstimateUseCase
// ============================================================
// Orchestrates one price estimate:
//
//   Step 1: Run the CNN forward pass    (Layer 5 - ml)
//   Step 2: Encode location and country (Layer 4 - data)
//   Step 3: Apply the price heuristic   (Layer 2 - price_heuristic)
//   Step 4: Package a PredictionResult  (Layer 3 - domain)
//
// A use case is built once and then shared. The weights sit
// behind an Arc and are only ever read. The default noise
// generator sits behind a Mutex that is held for the two
// normal draws and nothing else; callers that want to own the
// randomness call `estimate_with_rng` instead.
//
// Reference: Rust Book §16 (Shared-State Concurrency)

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::application::price_heuristic::{PriceHeuristic, PriceQuote};
use crate::data::feature_encoder::FeatureEncoder;
use crate::domain::error::EngineError;
use crate::domain::features::FeatureVector;
use crate::domain::prediction::PredictionResult;
use crate::domain::traits::PriceEstimator;
use crate::ml::model::PriceCnn;
use crate::ml::tensor::Tensor4;
use crate::ml::weights::{WeightStore, DEFAULT_WEIGHT_SCALE};

// ─── Engine Configuration ────────────────────────────────────────────────────
// The two random sources are seeded independently: fixing only
// `weight_seed` pins the network while leaving the noise free,
// fixing both makes every estimate reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for weight generation; None draws from OS entropy
    pub weight_seed:  Option<u64>,
    /// Seed for the price/confidence noise; None draws from OS entropy
    pub noise_seed:   Option<u64>,
    /// Multiplier applied to every standard-normal weight sample
    pub weight_scale: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weight_seed:  None,
            noise_seed:   None,
            weight_scale: DEFAULT_WEIGHT_SCALE,
        }
    }
}

impl EngineConfig {
    /// Fully reproducible configuration
    pub fn seeded(weight_seed: u64, noise_seed: u64) -> Self {
        Self {
            weight_seed: Some(weight_seed),
            noise_seed:  Some(noise_seed),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> std::result::Result<(), EngineError> {
        if !self.weight_scale.is_finite() || self.weight_scale <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "weight_scale must be a positive finite number, got {}",
                self.weight_scale
            )));
        }
        Ok(())
    }
}

// ─── PriceEstimateUseCase ─────────────────────────────────────────────────────
pub struct PriceEstimateUseCase {
    model:     PriceCnn,
    encoder:   FeatureEncoder,
    heuristic: PriceHeuristic,
    noise:     Mutex<StdRng>,
}

impl PriceEstimateUseCase {
    /// Generate the weights and noise source described by `config`.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        config.validate().context("Refusing to build the estimator")?;

        let weights = match config.weight_seed {
            Some(seed) => WeightStore::from_seed(seed, config.weight_scale),
            None => {
                tracing::info!("No weight seed configured; weights drawn from entropy");
                WeightStore::from_entropy(config.weight_scale)
            }
        };
        tracing::info!("Weight store ready: {} parameters", weights.parameter_count());

        Ok(Self::with_weights(Arc::new(weights), config.noise_seed))
    }

    /// Reuse an existing store, e.g. one shared by several estimators.
    pub fn with_weights(weights: Arc<WeightStore>, noise_seed: Option<u64>) -> Self {
        let noise = match noise_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        Self {
            model:     PriceCnn::new(weights),
            encoder:   FeatureEncoder::new(),
            heuristic: PriceHeuristic::new(),
            noise:     Mutex::new(noise),
        }
    }

    pub fn model(&self) -> &PriceCnn {
        &self.model
    }

    /// Same as `estimate`, drawing the noise from `rng`.
    pub fn estimate_with_rng<R: Rng>(
        &self,
        image:    &Tensor4,
        location: &str,
        country:  &str,
        rng:      &mut R,
    ) -> Result<PredictionResult> {
        let (loc, ct) = self.prepare(image, location, country)?;
        let quote = self.heuristic.predict(image, &loc, &ct, rng);
        Ok(finish(quote, location, country))
    }

    // ── Steps 1-2: forward pass and text encoding ────────────────────────────
    fn prepare(
        &self,
        image:    &Tensor4,
        location: &str,
        country:  &str,
    ) -> Result<(FeatureVector, FeatureVector)> {
        tracing::info!("Processing prediction for location: {}, country: {}", location, country);

        let score = self.model
            .score(image)
            .context("Image tensor rejected by the forward pass")?;
        tracing::debug!("Network score: {:.6}", score);

        Ok((self.encoder.encode(location), self.encoder.encode(country)))
    }
}

impl PriceEstimator for PriceEstimateUseCase {
    type Image = Tensor4;

    fn estimate(&self, image: &Tensor4, location: &str, country: &str) -> Result<PredictionResult> {
        let (loc, ct) = self.prepare(image, location, country)?;

        let quote = {
            // A poisoned lock only means another caller panicked
            // mid-draw; the generator state itself is still usable.
            let mut rng = self.noise.lock().unwrap_or_else(|p| p.into_inner());
            self.heuristic.predict(image, &loc, &ct, &mut *rng)
        };

        Ok(finish(quote, location, country))
    }
}

// ── Step 4: package the result ───────────────────────────────────────────────
fn finish(quote: PriceQuote, location: &str, country: &str) -> PredictionResult {
    tracing::info!(
        "Predicted price: {}, Confidence: {}%",
        quote.predicted_price,
        quote.confidence,
    );
    PredictionResult::new(quote.predicted_price, quote.confidence, location, country)
}
