//! Scripted simulation command

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use glyphwall_particles::{ConfigPatch, Mode, ParticleWall, WallConfig};
use glyphwall_runtime::{FrameLoop, PointerEvent, NOMINAL_FRAME_MS};
use serde::Serialize;
use tracing::info;

use super::ascii::AsciiSurface;

const ASCII_COLUMNS: usize = 72;

/// A scripted pointer-down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressSpec {
    pub x: f32,
    pub y: f32,
    pub at_ms: f64,
}

pub struct SimulateArgs {
    pub mode: Option<String>,
    pub frames: u64,
    pub width: f32,
    pub height: f32,
    pub press: Option<PressSpec>,
    pub release: Option<f64>,
    pub config: Option<String>,
    pub ascii: bool,
    pub seed: u32,
    pub format: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub mode: String,
    pub frames: u64,
    pub elapsed_ms: f64,
    pub nodes: usize,
    pub max_displacement: f32,
    pub mean_displacement: f32,
    /// Modes whose held flag is set on the last frame
    pub held: Vec<String>,
    pub ripples: usize,
    pub trails: usize,
    pub pulses: usize,
    /// Event counts by kind
    pub events: BTreeMap<&'static str, usize>,
}

/// Run the scripted session and return its report and final frame
pub fn simulate(args: &SimulateArgs) -> Result<(SimulationReport, AsciiSurface)> {
    let config = match &args.config {
        Some(path) => {
            WallConfig::load(path).with_context(|| format!("Failed to load config: {}", path))?
        }
        None => WallConfig::default(),
    };

    match (args.press, args.release) {
        (None, Some(_)) => anyhow::bail!("--release needs a --press"),
        (Some(press), Some(release)) if release < press.at_ms => anyhow::bail!(
            "release at {}ms precedes press at {}ms",
            release,
            press.at_ms
        ),
        _ => {}
    }

    let mut wall = ParticleWall::with_seed(config, args.seed);
    if let Some(name) = &args.mode {
        let mode: Mode = name.parse()?;
        wall.set_configuration(&ConfigPatch::default().with_mode(mode), 0.0)?;
    }

    let mut surface = AsciiSurface::new(args.width, args.height, ASCII_COLUMNS);
    let mut frame_loop = FrameLoop::new();
    frame_loop.start(&mut wall)?;

    let mut events: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut pressed = false;
    let mut released = false;
    let mut now = 0.0;

    for i in 0..args.frames {
        now = i as f64 * NOMINAL_FRAME_MS;
        if let Some(press) = args.press {
            if !pressed && now >= press.at_ms {
                wall.handle_pointer(&PointerEvent::down(press.x, press.y), now);
                pressed = true;
            }
            let release_due = args.release.is_some_and(|ms| now >= ms);
            if pressed && !released && release_due {
                wall.handle_pointer(&PointerEvent::up(press.x, press.y), now);
                released = true;
            }
        }

        frame_loop.tick(now, &mut wall, &mut surface)?;
        for event in wall.drain_events() {
            *events.entry(event.kind()).or_default() += 1;
        }
    }

    let ctx = wall.context();
    let displacements: Vec<f32> = ctx
        .particles
        .iter()
        .map(|n| n.displacement().length())
        .collect();
    let report = SimulationReport {
        mode: wall.config().mode.to_string(),
        frames: frame_loop.frames(),
        elapsed_ms: now,
        nodes: displacements.len(),
        max_displacement: displacements.iter().copied().fold(0.0, f32::max),
        mean_displacement: if displacements.is_empty() {
            0.0
        } else {
            displacements.iter().sum::<f32>() / displacements.len() as f32
        },
        held: ctx
            .held
            .active_modes()
            .iter()
            .map(|m| m.to_string())
            .collect(),
        ripples: ctx.ripples.len(),
        trails: ctx.trails.len(),
        pulses: ctx.pulses.len(),
        events,
    };

    frame_loop.cancel(&mut wall)?;
    info!(frames = report.frames, nodes = report.nodes, "simulation finished");
    Ok((report, surface))
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let (report, surface) = simulate(&args)?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "text" => {
            println!("Mode:         {}", report.mode);
            println!("Frames:       {} ({:.0}ms)", report.frames, report.elapsed_ms);
            println!("Nodes:        {}", report.nodes);
            println!(
                "Displacement: max {:.2}px, mean {:.2}px",
                report.max_displacement, report.mean_displacement
            );
            if !report.held.is_empty() {
                println!("Held:         {}", report.held.join(", "));
            }
            println!(
                "Effects:      {} ripples, {} trails, {} pulses",
                report.ripples, report.trails, report.pulses
            );
            for (kind, count) in &report.events {
                println!("  {:<16} {}", kind, count);
            }
        }
        _ => anyhow::bail!("Unknown format: {}", args.format),
    }

    if args.ascii {
        println!();
        println!("{}", surface.render());
    }

    Ok(())
}
