//! Lattice inspection command

use anyhow::Result;
use glam::Vec2;
use glyphwall_particles::lattice::grid_step;
use glyphwall_particles::rand::ParticleRng;
use glyphwall_particles::{build_lattice, LatticeParams};
use serde::Serialize;

pub struct LatticeArgs {
    pub width: f32,
    pub height: f32,
    pub density: f32,
    pub font_scale: f32,
    pub center_y: f32,
    pub format: String,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LatticeReport {
    pub width: f32,
    pub height: f32,
    pub count: usize,
    pub grid_step: f32,
    pub center: [f32; 2],
    pub scale: f32,
    /// [min_x, min_y, max_x, max_y] of the anchors, absent when empty
    pub bounds: Option<[f32; 4]>,
}

pub fn report(args: &LatticeArgs) -> LatticeReport {
    let params = LatticeParams {
        width: args.width,
        height: args.height,
        center_y: args.center_y,
        density: args.density,
        font_scale: args.font_scale,
    };
    let mut rng = ParticleRng::new(1);
    let mut report = LatticeReport {
        width: args.width,
        height: args.height,
        count: 0,
        grid_step: grid_step(args.density, args.font_scale),
        center: [0.0, 0.0],
        scale: 0.0,
        bounds: None,
    };

    if let Some((frame, nodes)) = build_lattice(&params, &mut rng) {
        report.count = nodes.len();
        report.center = frame.center.to_array();
        report.scale = frame.scale;
        if !nodes.is_empty() {
            let (min, max) = nodes.iter().fold(
                (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
                |(min, max), n| (min.min(n.anchor), max.max(n.anchor)),
            );
            report.bounds = Some([min.x, min.y, max.x, max.y]);
        }
    }
    report
}

pub fn run(args: LatticeArgs) -> Result<()> {
    let report = report(&args);

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "text" => {
            println!("Surface:   {} x {}", report.width, report.height);
            println!("Nodes:     {}", report.count);
            println!("Grid step: {:.4}", report.grid_step);
            match report.bounds {
                Some([x0, y0, x1, y1]) => {
                    println!(
                        "Center:    ({:.1}, {:.1})  scale {:.1}",
                        report.center[0], report.center[1], report.scale
                    );
                    println!("Bounds:    ({:.1}, {:.1}) .. ({:.1}, {:.1})", x0, y0, x1, y1);
                }
                None => println!("Surface too small; no lattice built"),
            }
        }
        _ => anyhow::bail!("Unknown format: {}", args.format),
    }

    Ok(())
}
