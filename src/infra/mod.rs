// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong to any business
// layer:
//
//   config_store.rs - EngineConfig as a JSON file on disk.
//                     Lets a host pin the weight and noise
//                     seeds without recompiling.
//
//   telemetry.rs    - tracing subscriber setup for hosts that
//                     don't bring their own.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// EngineConfig JSON persistence
pub mod config_store;

/// tracing-subscriber initialisation
pub mod telemetry;
