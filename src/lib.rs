// ============================================================
// listing-price-engine
// ============================================================
// Estimates a nightly price for a listing from a photo and two
// pieces of text (location, country).
//
//   normalized image [1, 64, 64, 3]
//       │
//       ▼
//   PriceCnn (ml)           ← WeightStore, generated once
//       │
//   location / country ──► FeatureEncoder (data)
//       │                       │
//       ▼                       ▼
//   PriceHeuristic (application) ──► PredictionResult (domain)
//
// Layers, from the inside out:
//   domain       plain types, traits, errors
//   data         text → feature vectors
//   ml           tensors, kernels, weights, forward pass
//   application  pricing rules and the estimate workflow
//   infra        config files and logging setup
//
// Image decoding, HTTP/CLI front ends and storage of results
// belong to the host application.

pub mod application;
pub mod data;
pub mod domain;
pub mod infra;
pub mod ml;

pub use application::estimate_use_case::{EngineConfig, PriceEstimateUseCase};
pub use application::price_heuristic::{PriceHeuristic, PriceQuote};
pub use data::feature_encoder::FeatureEncoder;
pub use domain::error::{EngineError, EngineResult};
pub use domain::features::FeatureVector;
pub use domain::prediction::PredictionResult;
pub use domain::traits::{PriceEstimator, TextEncoder};
pub use ml::model::PriceCnn;
pub use ml::tensor::{Tensor2, Tensor4};
pub use ml::weights::WeightStore;
