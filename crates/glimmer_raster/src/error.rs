use thiserror::Error;

/// Errors surfaced by the rasterization pipeline.
#[derive(Debug, Error, PartialEq)]
pub enum RasterError {
    /// A vertex colour component was outside [0, 255].
    #[error("invalid color component {value} (expected 0..=255)")]
    InvalidColor { value: f32 },

    /// `draw` was called with a buffer id this rasterizer never issued.
    #[error("unknown {kind} buffer id {id}")]
    InvalidBuffer { kind: &'static str, id: u32 },
}
