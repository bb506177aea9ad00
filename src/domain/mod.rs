// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust types and traits that name the concepts of the
// pricing engine. Nothing in here touches tensors, random
// number generators, or files.
//
// Rules for this layer:
//   - NO tensor arithmetic (that's Layer 5)
//   - NO file I/O (that's Layer 6)
//   - Only plain structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Typed errors raised by the engine
pub mod error;

// The fixed-slot lexical feature vector
pub mod features;

// The value handed back to callers for one estimate
pub mod prediction;

// Core abstractions (traits) that other layers implement
pub mod traits;
