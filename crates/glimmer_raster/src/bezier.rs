//! De Casteljau Bézier curve demo.
//!
//! Samples the curve at a fixed parameter step and splats each sample
//! into the framebuffer with a small exp(-distance) kernel.

use std::collections::HashSet;

use glimmer_core::Framebuffer;
use glimmer_math::{Vec2, Vec3};

/// Parameter step used by [`draw_curve`].
const T_STEP: f32 = 0.001;

/// Splat kernel radius in pixels.
const KERNEL_RADIUS: f32 = 2.0;

/// Evaluate the curve at parameter t by de Casteljau's recursion:
/// lerp every adjacent control-point pair until one point remains.
pub fn de_casteljau(control_points: &[Vec2], t: f32) -> Vec2 {
    if control_points.len() == 1 {
        return control_points[0];
    }

    let reduced: Vec<Vec2> = control_points
        .windows(2)
        .map(|pair| pair[0].lerp(pair[1], t))
        .collect();
    de_casteljau(&reduced, t)
}

/// Draw the full curve over t in [0, 1], splatting every sample.
pub fn draw_curve(fb: &mut Framebuffer, control_points: &[Vec2], color: Vec3) {
    if control_points.is_empty() {
        return;
    }

    let mut t = 0.0f32;
    while t <= 1.0 {
        let point = de_casteljau(control_points, t);
        splat(fb, point, color);
        t += T_STEP;
    }
}

/// Accumulate `color` into the square of pixels around `point`, each
/// weighted by exp(-distance) to the sample. Pixels are visited once
/// per splat even when the fractional sweep lands on them twice.
fn splat(fb: &mut Framebuffer, point: Vec2, color: Vec3) {
    let mut visited = HashSet::new();

    let mut y = point.y - KERNEL_RADIUS;
    while y <= point.y + KERNEL_RADIUS {
        let mut x = point.x - KERNEL_RADIUS;
        while x <= point.x + KERNEL_RADIUS {
            let cell = (x as i64, y as i64);
            if visited.insert(cell) && cell.0 >= 0 && cell.1 >= 0 {
                let dist = (Vec2::new(x, y) - point).length();
                fb.add_pixel(cell.0 as usize, cell.1 as usize, color * (-dist).exp());
            }
            x += 1.0;
        }
        y += 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_points() -> Vec<Vec2> {
        vec![
            Vec2::new(100.0, 100.0),
            Vec2::new(200.0, 500.0),
            Vec2::new(500.0, 500.0),
            Vec2::new(600.0, 100.0),
        ]
    }

    #[test]
    fn test_endpoints() {
        let pts = demo_points();
        assert_eq!(de_casteljau(&pts, 0.0), pts[0]);
        assert_eq!(de_casteljau(&pts, 1.0), pts[3]);
    }

    #[test]
    fn test_midpoint() {
        // B(1/2) = (p0 + 3 p1 + 3 p2 + p3) / 8
        let mid = de_casteljau(&demo_points(), 0.5);
        assert!((mid.x - 350.0).abs() < 1.0);
        assert!((mid.y - 400.0).abs() < 1.0);
    }

    #[test]
    fn test_matches_bernstein_cubic() {
        let pts = demo_points();
        for &t in &[0.1f32, 0.33, 0.5, 0.77, 0.9] {
            let s = 1.0 - t;
            let bernstein = pts[0] * s * s * s
                + pts[1] * 3.0 * s * s * t
                + pts[2] * 3.0 * s * t * t
                + pts[3] * t * t * t;
            let dc = de_casteljau(&pts, t);
            assert!((dc - bernstein).length() < 1e-3, "t={t}: {dc:?} vs {bernstein:?}");
        }
    }

    #[test]
    fn test_draw_curve_splats() {
        let mut fb = Framebuffer::new(700, 700);
        draw_curve(&mut fb, &demo_points(), Vec3::new(0.0, 1.0, 0.0));

        // the curve passes through (350, 400); the splat kernel leaves
        // energy at and around it
        let p = fb.get_pixel(350, 400);
        assert!(p.y > 0.0);
        // far corner untouched
        assert_eq!(fb.get_pixel(10, 650), Vec3::ZERO);
    }
}
