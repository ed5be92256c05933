/// Lazy, invalidation-aware orchestrator.
pub mod cache;
/// Stage dependency graph and per-stage validity.
pub mod stage;
