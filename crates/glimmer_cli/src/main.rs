//! glimmer - software rasterizer and path tracer demos.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use glimmer_core::{exporter, Framebuffer};
use glimmer_math::{Vec2, Vec3};
use glimmer_trace::{render_path, render_path_parallel, render_whitted};

mod scenes;

#[derive(Parser)]
#[command(name = "glimmer")]
#[command(about = "Software rasterizer and ray/path tracer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rasterize two overlapping triangles with depth testing
    Raster {
        /// Output width in pixels
        width: usize,
        /// Output height in pixels
        height: usize,
        /// Super-sampling factor (0 disables anti-aliasing)
        #[arg(long, default_value_t = 0)]
        ss: usize,
        /// Output image path
        #[arg(short, long, default_value = "output.ppm")]
        output: PathBuf,
    },
    /// Ray trace two spheres with Whitted reflection/refraction
    Whitted {
        width: u32,
        height: u32,
        #[arg(short, long, default_value = "output.ppm")]
        output: PathBuf,
    },
    /// Path trace the Cornell box
    Path {
        width: u32,
        height: u32,
        /// Samples per pixel
        #[arg(long, default_value_t = 16)]
        spp: u32,
        /// Worker threads (defaults to single-threaded)
        #[arg(long)]
        workers: Option<usize>,
        #[arg(short, long, default_value = "output.ppm")]
        output: PathBuf,
    },
    /// Draw a de Casteljau Bézier curve
    Bezier {
        #[arg(short, long, default_value = "output.ppm")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let start = Instant::now();
    match cli.command {
        Commands::Raster {
            width,
            height,
            ss,
            output,
        } => {
            let fb = scenes::render_triangles(width, height, ss)?;
            exporter::save_ppm(&fb, &output, 1.0)?;
        }
        Commands::Whitted {
            width,
            height,
            output,
        } => {
            let scene = scenes::whitted_spheres(width, height);
            let fb = render_whitted(&scene, Vec3::new(-1.0, 5.0, 10.0));
            exporter::save_ppm(&fb, &output, 1.0)?;
        }
        Commands::Path {
            width,
            height,
            spp,
            workers,
            output,
        } => {
            log::info!("path tracing {width}x{height} at {spp} spp");
            let scene = scenes::cornell_box(width, height);
            let eye = Vec3::new(278.0, 273.0, -800.0);
            let fb = match workers {
                Some(n) => render_path_parallel(&scene, spp, eye, n)?,
                None => render_path(&scene, spp, eye),
            };
            exporter::save_ppm(&fb, &output, 0.6)?;
        }
        Commands::Bezier { output } => {
            let mut fb = Framebuffer::new(700, 700);
            let control_points = [
                Vec2::new(100.0, 100.0),
                Vec2::new(200.0, 500.0),
                Vec2::new(500.0, 500.0),
                Vec2::new(600.0, 100.0),
            ];
            glimmer_raster::bezier::draw_curve(
                &mut fb,
                &control_points,
                Vec3::new(0.0, 1.0, 0.0),
            );
            exporter::save_ppm(&fb, &output, 1.0)?;
        }
    }
    log::info!("finished in {:?}", start.elapsed());

    Ok(())
}
