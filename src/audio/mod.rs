/// Sample-accurate scheduling and mixing of timeline audio.
pub mod mix;
/// Decoded PCM buffers.
pub mod pcm;
