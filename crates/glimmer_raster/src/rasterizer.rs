//! Screen-space triangle rasterization with depth buffering.
//!
//! The pipeline per draw call: indexed vertices -> MVP -> homogeneous
//! divide -> viewport -> per-pixel coverage and depth test. With
//! super-sampling enabled the depth/colour tests run on an NxN
//! sub-sample grid per pixel and the framebuffer receives the average.

use std::collections::HashMap;

use glimmer_core::Framebuffer;
use glimmer_math::{transform, Mat4, UVec3, Vec3, Vec4};

use crate::{RasterError, Triangle};

/// Buffer selection mask for [`Rasterizer::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Buffers(u32);

impl Buffers {
    pub const COLOR: Buffers = Buffers(1);
    pub const DEPTH: Buffers = Buffers(2);

    pub fn contains(self, other: Buffers) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Buffers {
    type Output = Buffers;

    fn bitor(self, rhs: Buffers) -> Buffers {
        Buffers(self.0 | rhs.0)
    }
}

/// Primitive topology for [`Rasterizer::draw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Line,
    Triangle,
}

// Ids are type-tagged so a position id can't be passed where an index
// id belongs; the compiler refuses the mix-up.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosBufId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndBufId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColBufId(u32);

/// Software rasterizer owning its framebuffer and depth buffer.
///
/// `super_sample = 0` disables anti-aliasing; `super_sample = N` keeps
/// NxN depth and colour samples per pixel and resolves by averaging.
pub struct Rasterizer {
    width: usize,
    height: usize,
    super_sample: usize,

    model: Mat4,
    view: Mat4,
    projection: Mat4,

    pos_buf: HashMap<u32, Vec<Vec3>>,
    ind_buf: HashMap<u32, Vec<UVec3>>,
    col_buf: HashMap<u32, Vec<Vec3>>,

    frame: Framebuffer,
    depth_buf: Vec<f32>,
    color_buf: Vec<Vec3>,

    next_id: u32,
}

impl Rasterizer {
    pub fn new(width: usize, height: usize, super_sample: usize) -> Self {
        let samples = if super_sample == 0 {
            width * height
        } else {
            width * super_sample * height * super_sample
        };
        Self {
            width,
            height,
            super_sample,
            model: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            pos_buf: HashMap::new(),
            ind_buf: HashMap::new(),
            col_buf: HashMap::new(),
            frame: Framebuffer::new(width, height),
            depth_buf: vec![f32::INFINITY; samples],
            color_buf: if super_sample == 0 {
                Vec::new()
            } else {
                vec![Vec3::ZERO; samples]
            },
            next_id: 0,
        }
    }

    fn get_next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn load_positions(&mut self, positions: Vec<Vec3>) -> PosBufId {
        let id = self.get_next_id();
        self.pos_buf.insert(id, positions);
        PosBufId(id)
    }

    pub fn load_indices(&mut self, indices: Vec<UVec3>) -> IndBufId {
        let id = self.get_next_id();
        self.ind_buf.insert(id, indices);
        IndBufId(id)
    }

    pub fn load_colors(&mut self, colors: Vec<Vec3>) -> ColBufId {
        let id = self.get_next_id();
        self.col_buf.insert(id, colors);
        ColBufId(id)
    }

    pub fn set_model(&mut self, m: Mat4) {
        self.model = m;
    }

    pub fn set_view(&mut self, v: Mat4) {
        self.view = v;
    }

    pub fn set_projection(&mut self, p: Mat4) {
        self.projection = p;
    }

    /// Reset the selected buffers: colour to black, depth to infinity.
    pub fn clear(&mut self, buffers: Buffers) {
        if buffers.contains(Buffers::COLOR) {
            self.frame.clear();
            self.color_buf.fill(Vec3::ZERO);
        }
        if buffers.contains(Buffers::DEPTH) {
            self.depth_buf.fill(f32::INFINITY);
        }
    }

    pub fn frame_buffer(&self) -> &Framebuffer {
        &self.frame
    }

    /// Depth value at pixel (x, y). With super-sampling enabled this is
    /// the first sub-sample of the pixel.
    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        let ss = self.super_sample.max(1);
        self.depth_buf[self.sample_index(x * ss, y * ss)]
    }

    /// Draw every primitive of an indexed vertex stream.
    pub fn draw(
        &mut self,
        pos_buffer: PosBufId,
        ind_buffer: IndBufId,
        col_buffer: ColBufId,
        primitive: Primitive,
    ) -> Result<(), RasterError> {
        let buf = self
            .pos_buf
            .get(&pos_buffer.0)
            .ok_or(RasterError::InvalidBuffer { kind: "position", id: pos_buffer.0 })?;
        let ind = self
            .ind_buf
            .get(&ind_buffer.0)
            .ok_or(RasterError::InvalidBuffer { kind: "index", id: ind_buffer.0 })?;
        let col = self
            .col_buf
            .get(&col_buffer.0)
            .ok_or(RasterError::InvalidBuffer { kind: "color", id: col_buffer.0 })?;

        let mvp = self.projection * self.view * self.model;
        let (width, height) = (self.width as f32, self.height as f32);

        let mut triangles = Vec::with_capacity(ind.len());
        for i in ind {
            let mut v = [
                mvp * buf[i.x as usize].extend(1.0),
                mvp * buf[i.y as usize].extend(1.0),
                mvp * buf[i.z as usize].extend(1.0),
            ];

            // Homogeneous divide; w is kept for perspective-correct depth.
            for vert in &mut v {
                let w = vert.w;
                vert.x /= w;
                vert.y /= w;
                vert.z /= w;
            }
            // Viewport transformation
            for vert in &mut v {
                *vert = transform::viewport_transform(*vert, width, height);
            }

            let mut t = Triangle::new();
            for (j, vert) in v.iter().enumerate() {
                t.set_vertex(j, *vert);
            }
            for (j, &idx) in [i.x, i.y, i.z].iter().enumerate() {
                let c = col[idx as usize];
                t.set_color(j, c.x, c.y, c.z)?;
            }
            triangles.push(t);
        }

        for t in &triangles {
            match primitive {
                Primitive::Triangle => self.rasterize_triangle(t),
                Primitive::Line => self.rasterize_wireframe(t),
            }
        }
        Ok(())
    }

    /// Index into the depth/colour sample buffers. With super-sampling
    /// the grid is (width*ss) x (height*ss); either way rows are flipped
    /// so the buffers match the framebuffer's top-left origin.
    fn sample_index(&self, x: usize, y: usize) -> usize {
        let ss = self.super_sample.max(1);
        let (sw, sh) = (self.width * ss, self.height * ss);
        let x = x.min(sw - 1);
        let y = y.min(sh - 1);
        (sh - 1 - y) * sw + x
    }

    fn rasterize_triangle(&mut self, t: &Triangle) {
        let v = &t.v;

        // Degenerate (zero-area) triangles are skipped outright so the
        // barycentric denominators below stay finite.
        let e1 = (v[1] - v[0]).truncate();
        let e2 = (v[2] - v[0]).truncate();
        if (e1.x * e2.y - e1.y * e2.x).abs() < 1e-12 {
            return;
        }

        // Bounding box of the projected triangle, clamped to the screen.
        let (mut min_x, mut min_y) = (v[0].x, v[0].y);
        let (mut max_x, mut max_y) = (v[0].x, v[0].y);
        for vert in v {
            min_x = min_x.min(vert.x);
            min_y = min_y.min(vert.y);
            max_x = max_x.max(vert.x);
            max_y = max_y.max(vert.y);
        }
        let x0 = (min_x.floor().max(0.0)) as usize;
        let y0 = (min_y.floor().max(0.0)) as usize;
        let x1 = (max_x.ceil() as usize).min(self.width - 1);
        let y1 = (max_y.ceil() as usize).min(self.height - 1);

        for x in x0..=x1 {
            for y in y0..=y1 {
                if self.super_sample > 0 {
                    self.shade_pixel_super_sampled(t, x, y);
                } else {
                    self.shade_pixel(t, x, y);
                }
            }
        }
    }

    fn shade_pixel(&mut self, t: &Triangle, x: usize, y: usize) {
        if !inside_triangle(x as f32 + 0.5, y as f32 + 0.5, &t.v) {
            return;
        }
        let z = interpolate_depth(x as f32, y as f32, &t.v);
        let id = self.sample_index(x, y);
        if z < self.depth_buf[id] {
            self.depth_buf[id] = z;
            self.frame.set_pixel(x, y, t.flat_color());
        }
    }

    fn shade_pixel_super_sampled(&mut self, t: &Triangle, x: usize, y: usize) {
        let ss = self.super_sample;
        let step = 1.0 / ss as f32;
        let half = 0.5 * step;

        let mut color = Vec3::ZERO;
        for i in 0..ss {
            let xx = x as f32 + step * i as f32;
            for j in 0..ss {
                let yy = y as f32 + step * j as f32;
                let id = self.sample_index(
                    (xx * ss as f32).round() as usize,
                    (yy * ss as f32).round() as usize,
                );
                if inside_triangle(xx + half, yy + half, &t.v) {
                    let z = interpolate_depth(xx, yy, &t.v);
                    if z < self.depth_buf[id] {
                        self.depth_buf[id] = z;
                        self.color_buf[id] = t.flat_color();
                    }
                }
                // Accumulate whatever the sub-sample holds, covered or
                // not, so edges blend with previously drawn geometry.
                color += self.color_buf[id];
            }
        }
        self.frame.set_pixel(x, y, color / (ss * ss) as f32);
    }

    fn rasterize_wireframe(&mut self, t: &Triangle) {
        self.draw_line(t.v[0], t.v[1]);
        self.draw_line(t.v[1], t.v[2]);
        self.draw_line(t.v[2], t.v[0]);
    }

    /// Bresenham line rasterization in screen space.
    fn draw_line(&mut self, begin: Vec4, end: Vec4) {
        let line_color = Vec3::ONE;

        let (mut x0, mut y0) = (begin.x.round() as i64, begin.y.round() as i64);
        let (x1, y1) = (end.x.round() as i64, end.y.round() as i64);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if x0 >= 0 && y0 >= 0 {
                self.frame.set_pixel(x0 as usize, y0 as usize, line_color);
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

/// Sign-consistent cross-product coverage test, with the vertices
/// promoted to z = 1. Points exactly on an edge are a don't-care.
fn inside_triangle(x: f32, y: f32, v: &[Vec4; 3]) -> bool {
    let a = Vec3::new(v[0].x, v[0].y, 1.0);
    let b = Vec3::new(v[1].x, v[1].y, 1.0);
    let c = Vec3::new(v[2].x, v[2].y, 1.0);

    let f0 = b.cross(a);
    let f1 = c.cross(b);
    let f2 = a.cross(c);
    let p = Vec3::new(x, y, 1.0);

    p.dot(f0) * f0.dot(c) > 0.0 && p.dot(f1) * f1.dot(a) > 0.0 && p.dot(f2) * f2.dot(b) > 0.0
}

/// Screen-space barycentric coordinates of (x, y) in triangle v.
fn barycentric(x: f32, y: f32, v: &[Vec4; 3]) -> (f32, f32, f32) {
    let c1 = (x * (v[1].y - v[2].y) + (v[2].x - v[1].x) * y + v[1].x * v[2].y - v[2].x * v[1].y)
        / (v[0].x * (v[1].y - v[2].y) + (v[2].x - v[1].x) * v[0].y + v[1].x * v[2].y
            - v[2].x * v[1].y);
    let c2 = (x * (v[2].y - v[0].y) + (v[0].x - v[2].x) * y + v[2].x * v[0].y - v[0].x * v[2].y)
        / (v[1].x * (v[2].y - v[0].y) + (v[0].x - v[2].x) * v[1].y + v[2].x * v[0].y
            - v[0].x * v[2].y);
    let c3 = (x * (v[0].y - v[1].y) + (v[1].x - v[0].x) * y + v[0].x * v[1].y - v[1].x * v[0].y)
        / (v[2].x * (v[0].y - v[1].y) + (v[1].x - v[0].x) * v[2].y + v[0].x * v[1].y
            - v[1].x * v[0].y);
    (c1, c2, c3)
}

/// Perspective-corrected depth at (x, y): interpolate z/w, then divide
/// by the interpolated reciprocal w.
fn interpolate_depth(x: f32, y: f32, v: &[Vec4; 3]) -> f32 {
    let (alpha, beta, gamma) = barycentric(x, y, v);
    let w_reciprocal = 1.0 / (alpha / v[0].w + beta / v[1].w + gamma / v[2].w);
    let z = alpha * v[0].z / v[0].w + beta * v[1].z / v[1].w + gamma * v[2].z / v[2].w;
    z * w_reciprocal
}
