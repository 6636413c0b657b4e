use surface_classifier::grid::PinholeIntrinsics;
use surface_classifier::image::ImageF32;
use surface_classifier::{GridPointBuffer, PipelineParams, SurfaceDetector};

fn main() {
    env_logger::init();

    // Demo scene: a wall at 1.5 m, a box face at 1.0 m and a ball resting in
    // front of the wall, seen by a small pinhole camera.
    let (w, h) = (96usize, 72usize);
    let intrinsics = PinholeIntrinsics::centered(w, h, 90.0);
    let mut depth = ImageF32::new(w, h);
    for v in 0..h {
        for u in 0..w {
            let mut z = 1.5f32;
            if (8..32).contains(&u) && (20..60).contains(&v) {
                z = 1.0;
            }
            // Ball of radius 0.2 m centred 1.3 m ahead, right of centre.
            let (cx, cz, r) = (0.25f32, 1.3f32, 0.2f32);
            let ray_x = (u as f32 - intrinsics.cx) / intrinsics.fx;
            let ray_y = (v as f32 - intrinsics.cy) / intrinsics.fy;
            let a = ray_x * ray_x + ray_y * ray_y + 1.0;
            let b = -2.0 * (ray_x * cx + cz);
            let c = cx * cx + cz * cz - r * r;
            let disc = b * b - 4.0 * a * c;
            if disc >= 0.0 {
                let t = (-b - disc.sqrt()) / (2.0 * a);
                z = z.min(t);
            }
            depth.set(u, v, z);
        }
    }
    let grid = GridPointBuffer::from_depth(&depth, &intrinsics);

    let mut detector = SurfaceDetector::new(PipelineParams::default());
    match detector.process(&grid) {
        Ok(output) => {
            println!("{}", output.trace.summary_line());
            for cluster in &output.classifications {
                println!(
                    "  {} {} px={} H={:+.3}",
                    cluster.id, cluster.surface, cluster.pixel_count, cluster.mean_curvature
                );
            }
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
