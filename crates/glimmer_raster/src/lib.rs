//! Glimmer rasterizer - software triangle rasterization.
//!
//! The pipeline: vertex buffers -> MVP -> homogeneous divide -> viewport
//! -> coverage and depth test -> framebuffer, with optional NxN
//! super-sampled anti-aliasing.

pub mod bezier;
mod error;
mod rasterizer;
mod triangle;

pub use error::RasterError;
pub use rasterizer::{Buffers, ColBufId, IndBufId, PosBufId, Primitive, Rasterizer};
pub use triangle::Triangle;
