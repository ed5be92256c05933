/// Persistent raster canvas with line drawing.
pub mod canvas;
/// Reveal, transition and morph scene generation.
pub mod compositor;
/// Frame buffer type.
pub mod frame;
