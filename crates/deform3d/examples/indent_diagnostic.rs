//! Deformation core diagnostic - exercises the full submit/drain cycle.
//!
//! PASS CRITERIA:
//! 1. Every submitted batch must drain exactly once
//! 2. Contact vertices must rest at exactly -force after drain
//! 3. Vertices outside every contact's reach must stay at y = 0
//! 4. Normals must stay unit length after every drain
//!
//! Run with: cargo run --example indent_diagnostic -p deform3d --release

use deform3d::{DeformableSurface, SurfaceParams, Vec3};

fn main() {
    env_logger::init();

    println!("=== DEFORMABLE SURFACE DIAGNOSTIC ===\n");

    let params = SurfaceParams {
        width: 32,
        height: 32,
        force: 0.3,
        radius: 1.5,
    };
    let mut surface = DeformableSurface::new(params).expect("valid params");

    println!(
        "Grid: {}x{} cells = {} vertices, {} triangles",
        params.width,
        params.height,
        surface.vertex_count(),
        surface.triangle_count()
    );
    let bounds = surface.bounds();
    println!(
        "Bounds: ({:.0},{:.0},{:.0}) .. ({:.0},{:.0},{:.0})\n",
        bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z
    );

    // A walker crossing the field diagonally, two contacts per tick
    // (left and right foot).
    let ticks = 24;
    let mut total_submitted = 0;
    let mut total_drained = 0;

    for tick in 0..ticks {
        let t = tick as f32;
        let feet = [
            Vec3::new(4.0 + t, 0.0, 4.0 + t),
            Vec3::new(4.6 + t, 0.0, 3.4 + t),
        ];
        if surface.handle_contacts(&feet).is_some() {
            total_submitted += 1;
        }

        let merged = surface.drain_ready();
        total_drained += merged;

        if tick % 6 == 0 {
            let displaced = surface
                .positions()
                .iter()
                .filter(|v| v.y < 0.0)
                .count();
            println!(
                "tick {tick:2}: merged {merged}, displaced vertices so far: {displaced}"
            );
        }
    }

    println!("\n--- RESULTS ---");
    let displaced: Vec<&Vec3> = surface.positions().iter().filter(|v| v.y < 0.0).collect();
    let min_y = surface
        .positions()
        .iter()
        .map(|v| v.y)
        .fold(f32::INFINITY, f32::min);

    println!("Batches submitted: {total_submitted}, drained: {total_drained}");
    println!("Displaced vertices: {}", displaced.len());
    println!("Deepest point: {min_y:.3} (expected {:.3})", -params.force);

    let mut pass = true;

    if total_submitted != total_drained {
        println!("FAIL: {total_submitted} submitted but {total_drained} drained");
        pass = false;
    }

    if (min_y + params.force).abs() > 1e-6 {
        println!("FAIL: deepest point {min_y} != -force {}", -params.force);
        pass = false;
    }

    let bad_depths = displaced
        .iter()
        .filter(|v| (v.y + params.force).abs() > 1e-6)
        .count();
    if bad_depths > 0 {
        println!("FAIL: {bad_depths} displaced vertices at a depth other than -force");
        pass = false;
    }

    let bad_normals = surface
        .normals()
        .iter()
        .filter(|n| (n.length() - 1.0).abs() > 1e-4)
        .count();
    if bad_normals > 0 {
        println!("FAIL: {bad_normals} non-unit normals");
        pass = false;
    }

    println!("\n{}", if pass { "ALL CHECKS PASSED" } else { "DIAGNOSTIC FAILED" });
}
