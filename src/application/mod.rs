// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// This layer wires the other layers together to produce one
// price estimate.
//
// Rules for this layer:
//   - No tensor kernels here (that's Layer 5)
//   - No file access here (that's Layer 6)
//   - Workflow coordination plus the pricing rules themselves
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The estimate workflow and its configuration
pub mod estimate_use_case;

// Image statistic + text features → bounded price and confidence
pub mod price_heuristic;
