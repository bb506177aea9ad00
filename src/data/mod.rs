// ============================================================
// Layer 4 - Input Encoding
// ============================================================
// Turns the caller's raw text inputs into numbers.
//
//   location / country strings
//       │
//       ▼
//   FeatureEncoder    → 11-slot FeatureVector per string
//
// The image side needs no work here: callers hand over a
// tensor that has already been decoded, resized to 64x64 and
// scaled into [0, 1].
//
// Reference: Rust Book §8 (Strings in Rust)

/// Lexical features of location and country text
pub mod feature_encoder;
