/// Concatenation of generated scenes with the closing clip.
pub mod assemble;
/// Stable content hash of an assembled clip.
pub mod fingerprint;
/// Scene sequence produced by the compositor.
pub mod scene;
