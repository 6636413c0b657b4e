mod common;

use common::synthetic_grid::rotated_plane;
use nalgebra::{Rotation3, Unit, Vector3};
use surface_classifier::edges::{compute_depth_edges, EdgeOptions};
use surface_classifier::normals::{estimate_normals, NeighborMask, NormalOptions};
use surface_classifier::segmentation::PixelLabel;

#[test]
fn normals_follow_rigid_rotation_about_sensor() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (w, h) = (24usize, 20usize);
    let options = NormalOptions::default();
    let mask = NeighborMask::new(w, options.radius, options.pixel_step);

    let identity = Rotation3::identity();
    let axis = Unit::new_normalize(Vector3::new(0.3, 1.0, 0.2));
    let rotation = Rotation3::from_axis_angle(&axis, 0.25);

    let base = rotated_plane(w, h, 0.002, &identity);
    let turned = rotated_plane(w, h, 0.002, &rotation);
    let (n_base, l_base) = estimate_normals(&base, None, &options, &mask);
    let (n_turned, l_turned) = estimate_normals(&turned, None, &options, &mask);

    let expected = Vector3::new(0.2f32, 0.0, -1.0).normalize();
    for idx in 0..base.len() {
        assert_eq!(l_base.get(idx), PixelLabel::Valid, "pixel {idx}");
        assert_eq!(l_turned.get(idx), PixelLabel::Valid, "pixel {idx}");
        let a = n_base.normal(idx);
        let b = n_turned.normal(idx);
        assert!(a.dot(&expected) > 0.9999, "base normal {a:?} at {idx}");
        let rotated = rotation * a;
        assert!(
            rotated.dot(&b) > 0.9999,
            "pixel {idx}: rotated {rotated:?} vs estimated {b:?}"
        );
        // Both frames face the sensor.
        assert!(b.dot(&turned.point(idx).expect("valid point")) < 0.0);
    }
}

#[test]
fn edge_aware_normals_ignore_the_far_side_of_a_jump() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (w, h) = (16usize, 12usize);
    // Near half tilted, far half flat and 0.4 m behind.
    let points = surface_classifier::build_grid_from_depth_source(w, h, |x, y| {
        let px = x as f32 * 0.005;
        let py = y as f32 * 0.005;
        let z = if x < 8 { 1.0 + 0.3 * px } else { 1.4 };
        Some(Vector3::new(px, py, z))
    });
    let edge_options = EdgeOptions::default();
    let edges = compute_depth_edges(&points.depth_map(), &points, &edge_options);
    let options = NormalOptions {
        skip_distance: 1.0,
        ..NormalOptions::default()
    };
    let mask = NeighborMask::new(w, options.radius, options.pixel_step);
    let (normals, labels) = estimate_normals(&points, Some(&edges), &options, &mask);

    let tilted = Vector3::new(0.3f32, 0.0, -1.0).normalize();
    for y in 0..h {
        // Column 5 sees the far plane within its radius; the barrier at
        // column 7 must keep it out of the fit.
        let idx = points.index(5, y);
        assert_eq!(labels.get(idx), PixelLabel::Valid);
        assert!(normals.normal(idx).dot(&tilted) > 0.999, "row {y}");
        assert_eq!(labels.get(points.index(7, y)), PixelLabel::Edge);
    }
}
