//! The built-in demo scenes.

use std::sync::Arc;

use glimmer_core::{Framebuffer, Mesh};
use glimmer_math::{transform, UVec3, Vec2, Vec3};
use glimmer_raster::{Buffers, Primitive, Rasterizer};
use glimmer_trace::{Light, Material, MaterialKind, MeshTriangle, Scene, Sphere};

/// Two overlapping triangles at different depths, rasterized.
pub fn render_triangles(
    width: usize,
    height: usize,
    super_sample: usize,
) -> Result<Framebuffer, glimmer_raster::RasterError> {
    let mut r = Rasterizer::new(width, height, super_sample);

    let pos = r.load_positions(vec![
        Vec3::new(2.0, 0.0, -2.0),
        Vec3::new(0.0, 2.0, -2.0),
        Vec3::new(-2.0, 0.0, -2.0),
        Vec3::new(3.5, -1.0, -5.0),
        Vec3::new(2.5, 1.5, -5.0),
        Vec3::new(-1.0, 0.5, -5.0),
    ]);
    let ind = r.load_indices(vec![UVec3::new(0, 1, 2), UVec3::new(3, 4, 5)]);
    let col = r.load_colors(vec![
        Vec3::new(217.0, 238.0, 185.0),
        Vec3::new(217.0, 238.0, 185.0),
        Vec3::new(217.0, 238.0, 185.0),
        Vec3::new(185.0, 217.0, 238.0),
        Vec3::new(185.0, 217.0, 238.0),
        Vec3::new(185.0, 217.0, 238.0),
    ]);

    r.set_model(transform::model_matrix(0.0));
    r.set_view(transform::view_matrix(Vec3::new(0.0, 0.0, 5.0)));
    r.set_projection(transform::projection_matrix(
        45.0,
        1.0,
        transform::Z_NEAR,
        transform::Z_FAR,
    ));

    r.clear(Buffers::COLOR | Buffers::DEPTH);
    r.draw(pos, ind, col, Primitive::Triangle)?;
    Ok(r.frame_buffer().clone())
}

/// Two spheres over a checkerboard floor, for the Whitted integrator.
pub fn whitted_spheres(width: u32, height: u32) -> Scene {
    let mut scene = Scene::new(width, height);
    scene.fov = 90.0;

    scene.add_object(Arc::new(
        Sphere::new(
            Vec3::new(-1.0, 0.0, -12.0),
            2.0,
            Arc::new(Material::new(MaterialKind::Diffuse, Vec3::ZERO)),
        )
        .with_diffuse_color(Vec3::new(0.6, 0.7, 0.8)),
    ));
    scene.add_object(Arc::new(Sphere::new(
        Vec3::new(0.5, -0.5, -8.0),
        1.5,
        Arc::new(
            Material::new(MaterialKind::ReflectionAndRefraction, Vec3::ZERO).with_ior(1.5),
        ),
    )));

    // checkerboard floor
    let floor = Mesh::with_uvs(
        vec![
            Vec3::new(-5.0, -3.0, -6.0),
            Vec3::new(5.0, -3.0, -6.0),
            Vec3::new(5.0, -3.0, -16.0),
            Vec3::new(-5.0, -3.0, -16.0),
        ],
        vec![0, 1, 3, 1, 2, 3],
        None,
        Some(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]),
    );
    scene.add_object(Arc::new(MeshTriangle::from_mesh(
        &floor,
        Arc::new(Material::new(MaterialKind::Diffuse, Vec3::ZERO)),
    )));

    scene.add_light(Light::point(Vec3::new(-20.0, 70.0, 20.0), Vec3::splat(0.5)));
    scene.add_light(Light::point(Vec3::new(30.0, 50.0, -12.0), Vec3::splat(0.5)));

    scene.build_bvh();
    scene
}

/// The Cornell box, for the path integrator.
pub fn cornell_box(width: u32, height: u32) -> Scene {
    let mut scene = Scene::new(width, height);
    scene.fov = 40.0;
    scene.background_color = Vec3::ZERO;

    let red = Arc::new(Material::diffuse(Vec3::new(0.63, 0.065, 0.05)));
    let green = Arc::new(Material::diffuse(Vec3::new(0.14, 0.45, 0.091)));
    let white = Arc::new(Material::diffuse(Vec3::new(0.725, 0.71, 0.68)));
    let light = Arc::new(Material::emissive(
        Vec3::splat(0.65),
        8.0 * Vec3::new(0.747 + 0.058, 0.747 + 0.258, 0.747)
            + 15.6 * Vec3::new(0.740 + 0.287, 0.740 + 0.160, 0.740)
            + 18.4 * Vec3::new(0.737 + 0.642, 0.737 + 0.159, 0.737),
    ));

    // room shell; every face winds toward the interior
    let floor = [
        Vec3::new(552.8, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 559.2),
        Vec3::new(549.6, 0.0, 559.2),
    ];
    let ceiling = [
        Vec3::new(556.0, 548.8, 0.0),
        Vec3::new(556.0, 548.8, 559.2),
        Vec3::new(0.0, 548.8, 559.2),
        Vec3::new(0.0, 548.8, 0.0),
    ];
    let back_wall = [
        Vec3::new(549.6, 0.0, 559.2),
        Vec3::new(0.0, 0.0, 559.2),
        Vec3::new(0.0, 548.8, 559.2),
        Vec3::new(556.0, 548.8, 559.2),
    ];
    let green_wall = [
        Vec3::new(0.0, 0.0, 559.2),
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 548.8, 0.0),
        Vec3::new(0.0, 548.8, 559.2),
    ];
    let red_wall = [
        Vec3::new(552.8, 0.0, 0.0),
        Vec3::new(549.6, 0.0, 559.2),
        Vec3::new(556.0, 548.8, 559.2),
        Vec3::new(556.0, 548.8, 0.0),
    ];
    // just below the ceiling so the two quads never z-fight
    let lamp = [
        Vec3::new(343.0, 548.75, 227.0),
        Vec3::new(343.0, 548.75, 332.0),
        Vec3::new(213.0, 548.75, 332.0),
        Vec3::new(213.0, 548.75, 227.0),
    ];

    scene.add_object(quad(&floor, white.clone()));
    scene.add_object(quad(&ceiling, white.clone()));
    scene.add_object(quad(&back_wall, white.clone()));
    scene.add_object(quad(&green_wall, green));
    scene.add_object(quad(&red_wall, red));
    scene.add_object(quad(&lamp, light));

    // the two boxes
    scene.add_object(prism(
        &[
            [130.0, 165.0, 65.0],
            [82.0, 165.0, 225.0],
            [240.0, 165.0, 272.0],
            [290.0, 165.0, 114.0],
        ],
        white.clone(),
    ));
    scene.add_object(prism(
        &[
            [423.0, 330.0, 247.0],
            [265.0, 330.0, 296.0],
            [314.0, 330.0, 456.0],
            [472.0, 330.0, 406.0],
        ],
        white,
    ));

    scene.build_bvh();
    scene
}

/// A quad as a two-triangle mesh, wound (v0, v1, v2), (v0, v2, v3).
fn quad(corners: &[Vec3; 4], material: Arc<Material>) -> Arc<MeshTriangle> {
    Arc::new(MeshTriangle::new(corners, &[0, 1, 2, 0, 2, 3], material))
}

/// A box standing on the floor, described by its top face (counter-
/// clockwise seen from above).
fn prism(top: &[[f32; 3]; 4], material: Arc<Material>) -> Arc<MeshTriangle> {
    let top: Vec<Vec3> = top.iter().map(|c| Vec3::from_array(*c)).collect();
    let bottom: Vec<Vec3> = top.iter().map(|c| Vec3::new(c.x, 0.0, c.z)).collect();

    let mut positions = top.clone();
    positions.extend_from_slice(&bottom);

    let mut indices: Vec<u32> = vec![0, 1, 2, 0, 2, 3]; // top
    for i in 0..4u32 {
        // each side quad: top edge (i, i+1), bottom edge (i+4, i+5)
        let j = (i + 1) % 4;
        indices.extend_from_slice(&[i + 4, j + 4, j, i + 4, j, i]);
    }

    Arc::new(MeshTriangle::new(&positions, &indices, material))
}
