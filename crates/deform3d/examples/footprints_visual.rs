//! Visual Footprint Demo (Terminal)
//!
//! Shows a walker indenting a snow field, rendered as ASCII depth shading.
//! Run: cargo run -p deform3d --example footprints_visual

use deform3d::{DeformableSurface, SurfaceParams, Vec3};
use std::{thread, time::Duration};

const WIDTH: u32 = 40;
const HEIGHT: u32 = 20;

fn render(surface: &DeformableSurface) {
    let stride = (WIDTH + 1) as usize;
    for row in 0..=HEIGHT as usize {
        let line: String = (0..=WIDTH as usize)
            .map(|x| {
                if surface.positions()[row * stride + x].y < 0.0 {
                    '#'
                } else {
                    '.'
                }
            })
            .collect();
        println!("{line}");
    }
}

fn main() {
    let params = SurfaceParams {
        width: WIDTH,
        height: HEIGHT,
        force: 0.4,
        radius: 1.2,
    };
    let mut surface = DeformableSurface::new(params).expect("valid params");

    println!("=== FOOTPRINTS IN SNOW ===");
    println!("'.' untouched   '#' indented\n");

    // Stride across the field with alternating feet.
    for step in 0..16 {
        let t = step as f32 * 2.2;
        let side = if step % 2 == 0 { -1.0 } else { 1.0 };
        let foot = Vec3::new(3.0 + t, 0.0, HEIGHT as f32 / 2.0 + side * 1.5);

        surface.handle_contacts(&[foot]);
        surface.drain_ready();

        print!("\x1B[2J\x1B[H");
        println!("step {step}: foot at ({:.1}, {:.1})\n", foot.x, foot.z);
        render(&surface);

        thread::sleep(Duration::from_millis(120));
    }

    let displaced = surface.positions().iter().filter(|v| v.y < 0.0).count();
    println!("\n{displaced} vertices displaced across the walk");
}
