//! Screen-space triangle record carried through the rasterizer.

use crate::RasterError;
use glimmer_math::{Vec2, Vec3, Vec4};

/// A triangle with per-vertex attributes.
///
/// Vertices v0, v1, v2 are in counter-clockwise order. Colours are stored
/// normalized to [0, 1]; the setter accepts [0, 255] input and rejects
/// anything outside that range.
#[derive(Clone, Debug)]
pub struct Triangle {
    /// Vertex positions (homogeneous; w carries the clip-space depth)
    pub v: [Vec4; 3],
    /// Colour at each vertex, in [0, 1]
    pub color: [Vec3; 3],
    /// Texture u,v at each vertex
    pub tex_coords: [Vec2; 3],
    /// Normal at each vertex
    pub normal: [Vec3; 3],
}

impl Default for Triangle {
    fn default() -> Self {
        Self {
            v: [Vec4::new(0.0, 0.0, 0.0, 1.0); 3],
            color: [Vec3::ZERO; 3],
            tex_coords: [Vec2::ZERO; 3],
            normal: [Vec3::ZERO; 3],
        }
    }
}

impl Triangle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the i-th vertex position.
    pub fn set_vertex(&mut self, ind: usize, ver: Vec4) {
        self.v[ind] = ver;
    }

    /// Set the i-th vertex normal.
    pub fn set_normal(&mut self, ind: usize, n: Vec3) {
        self.normal[ind] = n;
    }

    /// Set the i-th vertex colour from [0, 255] components.
    ///
    /// Components outside [0, 255] reject the write with
    /// [`RasterError::InvalidColor`].
    pub fn set_color(&mut self, ind: usize, r: f32, g: f32, b: f32) -> Result<(), RasterError> {
        for value in [r, g, b] {
            if !(0.0..=255.0).contains(&value) {
                return Err(RasterError::InvalidColor { value });
            }
        }
        self.color[ind] = Vec3::new(r / 255.0, g / 255.0, b / 255.0);
        Ok(())
    }

    /// Set the i-th vertex texture coordinate.
    pub fn set_tex_coord(&mut self, ind: usize, uv: Vec2) {
        self.tex_coords[ind] = uv;
    }

    /// The triangle's flat colour (one colour per triangle).
    pub fn flat_color(&self) -> Vec3 {
        self.color[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_color_normalizes() {
        let mut t = Triangle::new();
        t.set_color(0, 255.0, 0.0, 127.5).unwrap();
        assert_eq!(t.color[0], Vec3::new(1.0, 0.0, 0.5));
    }

    #[test]
    fn test_set_color_rejects_out_of_range() {
        let mut t = Triangle::new();
        assert_eq!(
            t.set_color(0, -1.0, 0.0, 0.0),
            Err(RasterError::InvalidColor { value: -1.0 })
        );
        assert_eq!(
            t.set_color(1, 0.0, 256.0, 0.0),
            Err(RasterError::InvalidColor { value: 256.0 })
        );
        // rejected writes leave the colour untouched
        assert_eq!(t.color[0], Vec3::ZERO);
    }

    #[test]
    fn test_default_positions_are_homogeneous() {
        let t = Triangle::new();
        for vert in t.v {
            assert_eq!(vert.w, 1.0);
        }
    }
}
