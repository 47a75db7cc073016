//! Mode state machine
//!
//! Modes change only through the configuration interface. Within the selected
//! mode each press runs a small sub-state machine:
//!
//! ```text
//! down ──▶ immediate action + arm timer
//!            │ arm fires while still down      │ up before arm fires (tap)
//!            ▼                                 ▼
//!          held (anchor tracks moves)        release
//!            │ up / cancel
//!            ▼
//!          release ──▶ ring / tide / comet / flow start their decay window
//! ```
//!
//! Every timer captures the context's generation token when scheduled. Mode
//! switches and teardown bump the token, so a handler that fires afterwards
//! sees a mismatch and does nothing.

use glam::Vec2;
use glyphwall_runtime::{FiredTimer, PointerEvent, PointerPhase};
use tracing::{debug, trace};

use crate::config::WallConfig;
use crate::context::{DecayWindow, SimulationContext, TimerPurpose};
use crate::effects::{PulseMarker, RippleEvent};
use crate::event::WallEvent;
use crate::forces::{held_field, perp};
use crate::mode::Mode;
use crate::particle::CometPath;
use crate::spring::{SpringProfile, SpringState};

/// Press duration that separates a tap from a hold
pub const ARM_DELAY_MS: f64 = 220.0;
/// Period of the ripples that follow a held ripple press
pub const FOLLOW_INTERVAL_MS: f64 = 180.0;
/// How long a held ring press keeps boosting before handing over to its window
pub const RING_BOOST_MS: f64 = 1600.0;

/// Amplitude of follow ripples relative to a tap ripple
const FOLLOW_AMPLITUDE: f32 = 0.6;
const BURST_SPARKS: usize = 18;
const EXPLODE_SPARKS: usize = 36;

/// Spring state a freshly mounted wall starts with.
///
/// Modes with an auto-revert profile only loosen on interaction, so they start
/// settled at baseline.
pub fn initial_spring(mode: Mode) -> SpringState {
    let profile = mode.spring_profile();
    if profile.auto_revert_ms.is_some() {
        SpringState::settled(SpringProfile::BASELINE)
    } else {
        SpringState::settled(profile)
    }
}

/// Enter `mode`, dropping everything the previous mode left behind
pub fn select_mode(ctx: &mut SimulationContext, mode: Mode, now_ms: f64) {
    let from = ctx.mode;
    ctx.generation += 1;
    let cancelled = ctx.timers.clear_all();
    ctx.held.clear();
    ctx.windows.clear();
    ctx.clear_comet_paths();
    ctx.mode = mode;
    retune_spring(ctx, mode, now_ms);

    debug!(%from, to = %mode, cancelled, generation = ctx.generation, "mode selected");
    ctx.events.push(WallEvent::ModeChanged { from, to: mode });
}

/// Point the spring at `mode`'s profile and schedule its auto-revert
fn retune_spring(ctx: &mut SimulationContext, mode: Mode, now_ms: f64) {
    let profile = mode.spring_profile();
    ctx.spring.retarget(profile);
    if let Some(ms) = profile.auto_revert_ms {
        ctx.timers
            .schedule(TimerPurpose::AutoRevert, now_ms, ms, ctx.generation);
    }
}

/// Feed one pointer event through the press sub-state machine
pub fn handle_pointer(
    ctx: &mut SimulationContext,
    config: &WallConfig,
    event: &PointerEvent,
    now_ms: f64,
) {
    // An arm timer that came due between frames must land before the release
    run_due_timers(ctx, now_ms);
    ctx.pointer.process(event, now_ms);
    match event.phase {
        PointerPhase::Down => press(ctx, config, event.position, now_ms),
        PointerPhase::Move => {
            if ctx.held.any() {
                ctx.held.anchor = event.position;
            }
        }
        PointerPhase::Up => release(ctx, config, event.position, now_ms, true),
        PointerPhase::Cancel => release(ctx, config, event.position, now_ms, false),
    }
}

fn press(ctx: &mut SimulationContext, config: &WallConfig, at: Vec2, now_ms: f64) {
    ctx.held.anchor = at;
    ctx.press_generation = Some(ctx.generation);
    immediate_action(ctx, config, at, now_ms);
    if ctx.mode.has_hold() {
        ctx.timers
            .schedule(TimerPurpose::Arm, now_ms, ARM_DELAY_MS, ctx.generation);
    }
}

/// The pointer-down effect that lands whether the press turns into a hold or not
fn immediate_action(ctx: &mut SimulationContext, config: &WallConfig, at: Vec2, now_ms: f64) {
    let radius = config.press_radius_pixels;
    let strength = config.press_strength;
    match ctx.mode {
        Mode::Burst => {
            ctx.trails.spawn_burst(at, BURST_SPARKS, &mut ctx.rng);
            radial_impulse(ctx, at, radius, strength * 0.35);
            retune_spring(ctx, Mode::Burst, now_ms);
        }
        Mode::Explode => {
            ctx.trails.spawn_burst(at, EXPLODE_SPARKS, &mut ctx.rng);
            radial_impulse(ctx, at, radius * 2.2, strength * 0.9);
            retune_spring(ctx, Mode::Explode, now_ms);
        }
        Mode::Tornado => {
            tangential_impulse(ctx, at, radius * 1.6, strength * 0.5);
            retune_spring(ctx, Mode::Tornado, now_ms);
        }
        Mode::Ripple => trigger_ripple(ctx, at, now_ms, 1.0),
        Mode::Dna => ctx.pulses.push(PulseMarker::new(at, now_ms)),
        _ => {}
    }
}

fn radial_impulse(ctx: &mut SimulationContext, at: Vec2, width: f32, strength: f32) {
    for node in &mut ctx.particles {
        let (dir, g) = held_field(node.position, at, width);
        node.velocity += dir * strength * g;
    }
}

fn tangential_impulse(ctx: &mut SimulationContext, at: Vec2, width: f32, strength: f32) {
    for node in &mut ctx.particles {
        let (dir, g) = held_field(node.position, at, width);
        node.velocity += perp(dir) * strength * g;
    }
}

/// Start a ripple wavefront at `at`, scaled relative to the default amplitude
pub fn trigger_ripple(ctx: &mut SimulationContext, at: Vec2, now_ms: f64, scale: f32) {
    let mut ripple = RippleEvent::new(at, now_ms, ctx.frame);
    ripple.amplitude *= scale;
    ctx.ripples.push(ripple);
}

/// Spray a burst of trail sparks at `at`
pub fn spawn_burst(ctx: &mut SimulationContext, at: Vec2) {
    ctx.trails.spawn_burst(at, BURST_SPARKS, &mut ctx.rng);
}

fn release(
    ctx: &mut SimulationContext,
    config: &WallConfig,
    at: Vec2,
    now_ms: f64,
    completed: bool,
) {
    let mode = ctx.mode;
    let press_generation = ctx.press_generation.take();
    // A pending arm timer means the press never became a hold
    let tapped = ctx.timers.cancel(TimerPurpose::Arm);
    let boosting = ctx.timers.cancel(TimerPurpose::HoldRelease);
    ctx.timers.cancel(TimerPurpose::FollowInterval);

    if ctx.held.any() {
        ctx.held.clear();
        ctx.events.push(WallEvent::HeldReleased { mode });
    }
    if !completed {
        trace!(%mode, "press cancelled");
        return;
    }
    // A press that began under another mode never got this mode's down handling
    if press_generation != Some(ctx.generation) {
        trace!(%mode, "release of a press from another mode");
        return;
    }

    match mode {
        Mode::Ring => {
            if tapped {
                ctx.ring_direction = -ctx.ring_direction;
                start_window(ctx, mode, at, now_ms);
            } else if boosting {
                start_window(ctx, mode, at, now_ms);
            }
        }
        Mode::Comet => {
            assign_comet_paths(ctx, config, at);
            start_window(ctx, mode, at, now_ms);
        }
        Mode::Tide | Mode::Flow => start_window(ctx, mode, at, now_ms),
        _ => {}
    }
}

/// Give every node within reach of `at` a randomized comet flight path
fn assign_comet_paths(ctx: &mut SimulationContext, config: &WallConfig, at: Vec2) {
    let reach = config.press_radius_pixels * 3.0;
    let spread = config.press_radius_pixels * 0.5;
    for node in &mut ctx.particles {
        node.comet = if node.anchor.distance(at) <= reach {
            Some(CometPath {
                target: at + ctx.rng.point_in_disk(spread),
                arc: ctx.rng.range(20.0, 80.0),
            })
        } else {
            None
        };
    }
}

fn start_window(ctx: &mut SimulationContext, mode: Mode, origin: Vec2, now_ms: f64) {
    let Some(duration_ms) = mode.release_window_ms() else {
        return;
    };
    if let Some(slot) = ctx.windows.slot_mut(mode) {
        *slot = Some(DecayWindow::new(now_ms, duration_ms, origin));
    }
    ctx.timers
        .schedule(TimerPurpose::DecayWindow, now_ms, duration_ms, ctx.generation);
    ctx.events.push(WallEvent::WindowStarted { mode, duration_ms });
}

/// Poll the timer table and run every due handler in due order
pub fn run_due_timers(ctx: &mut SimulationContext, now_ms: f64) {
    for fired in ctx.timers.poll(now_ms) {
        fire_timer(ctx, fired, now_ms);
    }
}

/// Run one timer handler, unless the mode that scheduled it is gone
pub fn fire_timer(ctx: &mut SimulationContext, fired: FiredTimer<TimerPurpose>, now_ms: f64) {
    if fired.token != ctx.generation {
        trace!(
            purpose = ?fired.purpose,
            token = fired.token,
            generation = ctx.generation,
            "stale timer dropped"
        );
        return;
    }

    match fired.purpose {
        TimerPurpose::Arm => enter_held(ctx, now_ms),
        TimerPurpose::FollowInterval => {
            if ctx.held.ripple_follow {
                let at = ctx.held.anchor;
                trigger_ripple(ctx, at, now_ms, FOLLOW_AMPLITUDE);
            }
        }
        TimerPurpose::HoldRelease => {
            if ctx.held.ring_boost {
                ctx.held.ring_boost = false;
                let at = ctx.held.anchor;
                start_window(ctx, Mode::Ring, at, now_ms);
            }
        }
        TimerPurpose::AutoRevert => ctx.spring.retarget(SpringProfile::BASELINE),
        TimerPurpose::DecayWindow => end_expired_windows(ctx, now_ms),
    }
}

fn enter_held(ctx: &mut SimulationContext, now_ms: f64) {
    let mode = ctx.mode;
    if !mode.has_hold() || !ctx.pointer.is_down() {
        return;
    }
    let anchor = ctx.pointer.position();
    ctx.held.anchor = anchor;
    ctx.held.set(mode, true);

    match mode {
        Mode::Ripple => ctx.timers.schedule_interval(
            TimerPurpose::FollowInterval,
            now_ms,
            FOLLOW_INTERVAL_MS,
            ctx.generation,
        ),
        Mode::Ring => ctx.timers.schedule(
            TimerPurpose::HoldRelease,
            now_ms,
            RING_BOOST_MS,
            ctx.generation,
        ),
        _ => {}
    }

    debug!(%mode, x = anchor.x, y = anchor.y, "held");
    ctx.events.push(WallEvent::HeldEntered { mode, anchor });
}

fn end_expired_windows(ctx: &mut SimulationContext, now_ms: f64) {
    for mode in [Mode::Ring, Mode::Tide, Mode::Comet, Mode::Flow] {
        let Some(slot) = ctx.windows.slot_mut(mode) else {
            continue;
        };
        let expired = slot.is_some_and(|w| w.progress(now_ms).is_none());
        if !expired {
            continue;
        }
        *slot = None;
        if mode == Mode::Comet {
            ctx.clear_comet_paths();
        }
        ctx.events.push(WallEvent::WindowEnded { mode });
    }
}

/// Stop everything: every timer, flag, window and pool
pub fn teardown(ctx: &mut SimulationContext) {
    ctx.generation += 1;
    let cancelled = ctx.timers.clear_all();
    ctx.held.clear();
    ctx.windows.clear();
    ctx.clear_comet_paths();
    ctx.pointer.reset();
    ctx.press_generation = None;
    ctx.trails.clear();
    ctx.ripples.clear();
    ctx.pulses.clear();
    debug!(cancelled, "wall torn down");
    ctx.events.push(WallEvent::TornDown);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::ParticleNode;

    fn context(mode: Mode) -> (SimulationContext, WallConfig) {
        let mut ctx = SimulationContext::new(11);
        ctx.particles = (0..40)
            .map(|i| {
                let x = 200.0 + (i % 8) as f32 * 20.0;
                let y = 200.0 + (i / 8) as f32 * 20.0;
                ParticleNode::at_rest(i, Vec2::new(x, y))
            })
            .collect();
        let config = WallConfig {
            mode,
            ..Default::default()
        };
        select_mode(&mut ctx, mode, 0.0);
        ctx.events.drain();
        (ctx, config)
    }

    fn pointer(ctx: &mut SimulationContext, config: &WallConfig, event: PointerEvent, now: f64) {
        handle_pointer(ctx, config, &event, now);
        run_due_timers(ctx, now);
    }

    #[test]
    fn hold_past_arm_delay_enters_held() {
        let (mut ctx, config) = context(Mode::Press);
        pointer(&mut ctx, &config, PointerEvent::down(100.0, 120.0), 1000.0);
        assert!(!ctx.held.pressing);

        pointer(&mut ctx, &config, PointerEvent::moved(130.0, 140.0), 1100.0);
        run_due_timers(&mut ctx, 1300.0);
        assert!(ctx.held.pressing);
        assert_eq!(ctx.held.anchor, Vec2::new(130.0, 140.0));

        pointer(&mut ctx, &config, PointerEvent::moved(150.0, 90.0), 1350.0);
        assert_eq!(ctx.held.anchor, Vec2::new(150.0, 90.0));

        pointer(&mut ctx, &config, PointerEvent::up(150.0, 90.0), 1400.0);
        assert!(!ctx.held.pressing);
        let events = ctx.events.drain();
        assert!(events.contains(&WallEvent::HeldReleased { mode: Mode::Press }));
    }

    #[test]
    fn tap_never_holds() {
        let (mut ctx, config) = context(Mode::Press);
        pointer(&mut ctx, &config, PointerEvent::down(100.0, 100.0), 1000.0);
        pointer(&mut ctx, &config, PointerEvent::up(100.0, 100.0), 1080.0);
        for now in [1200.0, 1300.0, 2000.0] {
            run_due_timers(&mut ctx, now);
            assert!(!ctx.held.pressing);
        }
        assert!(ctx.timers.is_empty());
    }

    #[test]
    fn tap_still_runs_immediate_action() {
        let (mut ctx, config) = context(Mode::Burst);
        let before: Vec<Vec2> = ctx.particles.iter().map(|n| n.velocity).collect();
        pointer(&mut ctx, &config, PointerEvent::down(240.0, 240.0), 1000.0);
        pointer(&mut ctx, &config, PointerEvent::up(240.0, 240.0), 1050.0);
        assert_eq!(ctx.trails.len(), BURST_SPARKS);
        let kicked = ctx
            .particles
            .iter()
            .zip(&before)
            .filter(|(n, v)| n.velocity != **v)
            .count();
        assert!(kicked > 0);
        // Burst loosens the spring, then reverts to baseline
        assert_eq!(ctx.spring.k_target, Mode::Burst.spring_profile().stiffness);
        run_due_timers(&mut ctx, 1000.0 + 700.0);
        assert_eq!(ctx.spring.k_target, SpringProfile::BASELINE.stiffness);
    }

    #[test]
    fn switching_modes_clears_other_flags() {
        let (mut ctx, config) = context(Mode::Dna);
        pointer(&mut ctx, &config, PointerEvent::down(220.0, 220.0), 0.0);
        run_due_timers(&mut ctx, 300.0);
        assert!(ctx.held.dna_hold);

        for mode in Mode::ALL {
            select_mode(&mut ctx, mode, 400.0);
            assert!(ctx.held.active_modes().iter().all(|m| *m == mode));
            assert!(!ctx.held.any());
        }
    }

    #[test]
    fn stale_timers_are_ignored() {
        let (mut ctx, config) = context(Mode::Press);
        pointer(&mut ctx, &config, PointerEvent::down(100.0, 100.0), 0.0);
        let stale = FiredTimer {
            purpose: TimerPurpose::Arm,
            token: ctx.generation,
            due_ms: ARM_DELAY_MS,
        };
        select_mode(&mut ctx, Mode::Press, 50.0);
        fire_timer(&mut ctx, stale, 300.0);
        assert!(!ctx.held.pressing);
    }

    #[test]
    fn auto_revert_survives_only_its_mode() {
        let (mut ctx, _) = context(Mode::Explode);
        assert!(ctx.timers.is_pending(TimerPurpose::AutoRevert));
        select_mode(&mut ctx, Mode::Press, 100.0);
        assert!(!ctx.timers.is_pending(TimerPurpose::AutoRevert));
        assert_eq!(ctx.spring.k_target, Mode::Press.spring_profile().stiffness);
    }

    #[test]
    fn ring_tap_flips_direction_and_starts_window() {
        let (mut ctx, config) = context(Mode::Ring);
        pointer(&mut ctx, &config, PointerEvent::down(200.0, 200.0), 0.0);
        pointer(&mut ctx, &config, PointerEvent::up(200.0, 200.0), 100.0);
        assert_eq!(ctx.ring_direction, -1.0);
        assert!(ctx.windows.ring.is_some());

        run_due_timers(&mut ctx, 100.0 + 1400.0);
        assert!(ctx.windows.ring.is_none());
        let events = ctx.events.drain();
        assert!(events.contains(&WallEvent::WindowEnded { mode: Mode::Ring }));
    }

    #[test]
    fn ring_boost_hands_over_to_window() {
        let (mut ctx, config) = context(Mode::Ring);
        pointer(&mut ctx, &config, PointerEvent::down(200.0, 200.0), 0.0);
        run_due_timers(&mut ctx, ARM_DELAY_MS);
        assert!(ctx.held.ring_boost);
        assert_eq!(ctx.ring_direction, 1.0);

        run_due_timers(&mut ctx, ARM_DELAY_MS + RING_BOOST_MS);
        assert!(!ctx.held.ring_boost);
        assert!(ctx.windows.ring.is_some());

        // Releasing after the boost ran out does not restart the window
        let started = ctx.windows.ring.map(|w| w.started_ms);
        pointer(&mut ctx, &config, PointerEvent::up(200.0, 200.0), 2000.0);
        assert_eq!(ctx.windows.ring.map(|w| w.started_ms), started);
        assert_eq!(ctx.ring_direction, 1.0);
    }

    #[test]
    fn ripple_hold_follows_pointer() {
        let (mut ctx, config) = context(Mode::Ripple);
        pointer(&mut ctx, &config, PointerEvent::down(100.0, 100.0), 0.0);
        assert_eq!(ctx.ripples.len(), 1);

        run_due_timers(&mut ctx, ARM_DELAY_MS);
        assert!(ctx.held.ripple_follow);
        pointer(&mut ctx, &config, PointerEvent::moved(300.0, 100.0), 300.0);
        run_due_timers(&mut ctx, ARM_DELAY_MS + FOLLOW_INTERVAL_MS);
        assert_eq!(ctx.ripples.len(), 2);
        let follow = ctx.ripples.iter().last().cloned();
        assert_eq!(follow.map(|r| r.origin), Some(Vec2::new(300.0, 100.0)));

        pointer(&mut ctx, &config, PointerEvent::up(300.0, 100.0), 500.0);
        run_due_timers(&mut ctx, 2000.0);
        assert_eq!(ctx.ripples.len(), 2);
    }

    #[test]
    fn comet_release_assigns_paths_until_window_ends() {
        let (mut ctx, config) = context(Mode::Comet);
        pointer(&mut ctx, &config, PointerEvent::down(260.0, 240.0), 0.0);
        pointer(&mut ctx, &config, PointerEvent::up(260.0, 240.0), 50.0);
        let with_paths = ctx.particles.iter().filter(|n| n.comet.is_some()).count();
        assert_eq!(with_paths, ctx.particles.len());
        for node in &ctx.particles {
            let path = node.comet.unwrap();
            assert!(path.target.distance(Vec2::new(260.0, 240.0)) <= config.press_radius_pixels * 0.5 + 1e-3);
            assert!((20.0..=80.0).contains(&path.arc));
        }

        run_due_timers(&mut ctx, 50.0 + 1800.0);
        assert!(ctx.windows.comet.is_none());
        assert!(ctx.particles.iter().all(|n| n.comet.is_none()));
    }

    #[test]
    fn cancel_releases_without_window() {
        let (mut ctx, config) = context(Mode::Tide);
        pointer(&mut ctx, &config, PointerEvent::down(200.0, 200.0), 0.0);
        pointer(&mut ctx, &config, PointerEvent::cancel(200.0, 200.0), 500.0);
        assert!(ctx.windows.tide.is_none());

        pointer(&mut ctx, &config, PointerEvent::down(200.0, 200.0), 600.0);
        pointer(&mut ctx, &config, PointerEvent::up(200.0, 200.0), 700.0);
        assert!(ctx.windows.tide.is_some());
    }

    #[test]
    fn release_between_frames_after_arm_delay_is_a_hold() {
        let (mut ctx, config) = context(Mode::Ring);
        handle_pointer(&mut ctx, &config, &PointerEvent::down(200.0, 200.0), 0.0);
        // Last frame before the arm delay elapses
        run_due_timers(&mut ctx, 216.7);
        assert!(!ctx.held.ring_boost);

        handle_pointer(&mut ctx, &config, &PointerEvent::up(200.0, 200.0), 232.0);
        assert_eq!(ctx.ring_direction, 1.0);
        let events = ctx.events.drain();
        assert!(events.contains(&WallEvent::HeldEntered {
            mode: Mode::Ring,
            anchor: Vec2::new(200.0, 200.0),
        }));
        assert!(events.contains(&WallEvent::HeldReleased { mode: Mode::Ring }));
        // Released while boosting, so the window starts
        assert!(ctx.windows.ring.is_some());
    }

    #[test]
    fn release_after_mode_switch_starts_no_window() {
        let (mut ctx, config) = context(Mode::Press);
        pointer(&mut ctx, &config, PointerEvent::down(200.0, 200.0), 0.0);
        run_due_timers(&mut ctx, 300.0);
        select_mode(&mut ctx, Mode::Tide, 400.0);
        pointer(&mut ctx, &config, PointerEvent::up(200.0, 200.0), 500.0);
        assert!(ctx.windows.tide.is_none());

        select_mode(&mut ctx, Mode::Comet, 600.0);
        pointer(&mut ctx, &config, PointerEvent::up(200.0, 200.0), 700.0);
        assert!(ctx.windows.comet.is_none());
        assert!(ctx.particles.iter().all(|n| n.comet.is_none()));

        // The next full press in the new mode behaves normally
        pointer(&mut ctx, &config, PointerEvent::down(200.0, 200.0), 800.0);
        pointer(&mut ctx, &config, PointerEvent::up(200.0, 200.0), 850.0);
        assert!(ctx.windows.comet.is_some());
    }

    #[test]
    fn teardown_clears_everything() {
        let (mut ctx, config) = context(Mode::Ripple);
        pointer(&mut ctx, &config, PointerEvent::down(100.0, 100.0), 0.0);
        run_due_timers(&mut ctx, ARM_DELAY_MS);
        let generation = ctx.generation;

        teardown(&mut ctx);
        assert!(ctx.timers.is_empty());
        assert!(!ctx.held.any());
        assert!(ctx.ripples.is_empty());
        assert_eq!(ctx.generation, generation + 1);
        assert_eq!(ctx.events.drain().last(), Some(&WallEvent::TornDown));
    }
}
