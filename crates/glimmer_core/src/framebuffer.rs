//! Colour framebuffer shared by the rasterizer and the ray tracer.

use glimmer_math::Vec3;

/// Dense row-major colour buffer with a top-left origin in memory.
///
/// `set_pixel`/`get_pixel` take coordinates with y pointing up (screen
/// space as the rasterizer produces it) and flip the row internally, so
/// the pixel slice is already in image order for the exporters.
#[derive(Clone)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<Vec3>,
}

impl Framebuffer {
    /// Create a framebuffer cleared to black.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec3::ZERO; width * height],
        }
    }


    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Linear index of pixel (x, y), flipping y to a top-left origin.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        (self.height - 1 - y) * self.width + x
    }

    /// Write a pixel. Out-of-bounds coordinates are rejected (the write
    /// is skipped), never clamped onto a neighbour.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Vec3) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }

    /// Accumulate into a pixel (used by splatting). Same bounds policy
    /// as `set_pixel`.
    pub fn add_pixel(&mut self, x: usize, y: usize, color: Vec3) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = self.index(x, y);
        self.pixels[idx] += color;
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Vec3 {
        self.pixels[self.index(x, y)]
    }

    /// Reset every pixel to (0, 0, 0).
    pub fn clear(&mut self) {
        self.pixels.fill(Vec3::ZERO);
    }

    /// Pixels in image order (top row first).
    pub fn pixels(&self) -> &[Vec3] {
        &self.pixels
    }

    /// Mutable pixel storage in image order. Chunking this by `width`
    /// yields disjoint rows that can go to worker threads in parallel.
    pub fn pixels_mut(&mut self) -> &mut [Vec3] {
        &mut self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_black() {
        let fb = Framebuffer::new(4, 3);
        assert!(fb.pixels().iter().all(|&p| p == Vec3::ZERO));
    }

    #[test]
    fn test_clear_resets_to_black() {
        let mut fb = Framebuffer::new(4, 3);
        fb.set_pixel(1, 1, Vec3::ONE);
        fb.clear();
        assert!(fb.pixels().iter().all(|&p| p == Vec3::ZERO));
    }

    #[test]
    fn test_top_left_origin() {
        let mut fb = Framebuffer::new(2, 2);
        // y = height-1 is the top row of the image
        fb.set_pixel(0, 1, Vec3::X);
        assert_eq!(fb.pixels()[0], Vec3::X);

        fb.set_pixel(1, 0, Vec3::Y);
        assert_eq!(fb.pixels()[3], Vec3::Y);
    }

    #[test]
    fn test_out_of_bounds_write_is_rejected() {
        let mut fb = Framebuffer::new(2, 2);
        fb.set_pixel(2, 0, Vec3::ONE);
        fb.set_pixel(0, 2, Vec3::ONE);
        assert!(fb.pixels().iter().all(|&p| p == Vec3::ZERO));
    }

    #[test]
    fn test_pixels_mut_rows_are_image_order() {
        let mut fb = Framebuffer::new(3, 2);
        let width = fb.width();
        for (j, row) in fb.pixels_mut().chunks_mut(width).enumerate() {
            for p in row {
                *p = Vec3::splat(j as f32);
            }
        }
        assert_eq!(fb.pixels()[0], Vec3::splat(0.0));
        assert_eq!(fb.pixels()[3], Vec3::splat(1.0));
    }
}
