//! Mode listing command

use anyhow::Result;
use glyphwall_particles::Mode;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModeInfo {
    name: &'static str,
    stiffness: f32,
    damping: f32,
    auto_revert_ms: Option<f64>,
    hold: bool,
    release_window_ms: Option<f64>,
    description: &'static str,
}

fn describe(mode: Mode) -> ModeInfo {
    let profile = mode.spring_profile();
    ModeInfo {
        name: mode.name(),
        stiffness: profile.stiffness,
        damping: profile.damping,
        auto_revert_ms: profile.auto_revert_ms,
        hold: mode.has_hold(),
        release_window_ms: mode.release_window_ms(),
        description: mode.description(),
    }
}

pub fn run(format: &str) -> Result<()> {
    let modes: Vec<ModeInfo> = Mode::ALL.into_iter().map(describe).collect();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&modes)?),
        "text" => {
            println!(
                "{:<13} {:>6} {:>6} {:>7} {:>5} {:>7}  {}",
                "MODE", "K", "D", "REVERT", "HOLD", "WINDOW", "DESCRIPTION"
            );
            for m in &modes {
                let revert = m
                    .auto_revert_ms
                    .map(|ms| format!("{}ms", ms))
                    .unwrap_or_else(|| "-".into());
                let window = m
                    .release_window_ms
                    .map(|ms| format!("{}ms", ms))
                    .unwrap_or_else(|| "-".into());
                println!(
                    "{:<13} {:>6.3} {:>6.2} {:>7} {:>5} {:>7}  {}",
                    m.name,
                    m.stiffness,
                    m.damping,
                    revert,
                    if m.hold { "yes" } else { "no" },
                    window,
                    m.description
                );
            }
        }
        _ => anyhow::bail!("Unknown format: {}", format),
    }

    Ok(())
}
