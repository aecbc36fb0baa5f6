//! Per-frame simulation tick
//!
//! Core game loop that advances simulation deterministically. One call is one
//! fixed step: balls move by their full velocity, no delta-time scaling.

use glam::Vec2;

use super::autopilot;
use super::collision::{bounce_axis, circle_intersects_circle, circle_intersects_rect};
use super::state::{GameEvent, GameState, ItemKind, Particle, ParticleKind};
use super::turn;
use crate::consts::PARTICLE_GRAVITY;

/// Input intents for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Aim change in degrees (negative rotates left)
    pub aim_delta: f32,
    /// Fire a volley
    pub fire: bool,
    /// Idle/demo mode - autopilot aims and fires
    pub idle_mode: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.game_over {
        return;
    }

    // Intents are only applied at the tick boundary
    let input = if input.idle_mode {
        autopilot::steer(state)
    } else {
        input.clone()
    };
    turn::adjust_aim(state, input.aim_delta);
    if input.fire {
        turn::fire(state);
    }
    turn::release_due_launches(state);

    step_balls(state);
    collect_finished_balls(state);

    if turn::volley_finished(state) {
        turn::resolve_turn(state);
    }

    update_cosmetics(state);
    state.check_game_over();
    state.time_ticks += 1;
}

/// Move every ball and resolve walls, items and bricks
fn step_balls(state: &mut GameState) {
    let tuning = &state.tuning;
    let tick_seed = state.time_ticks as u32;
    let mut burst_id = 0u32;

    for ball in state.balls.iter_mut() {
        ball.record_trail(tuning.trail_length);
        ball.pos += ball.vel;

        // --- WALLS --- (no bottom wall: balls fall out of the field)
        let mut wall_hits: [Option<Vec2>; 3] = [None; 3];
        if ball.pos.x < ball.radius {
            ball.vel.x = ball.vel.x.abs();
            wall_hits[0] = Some(ball.pos + Vec2::new(4.0, 0.0));
        }
        if ball.pos.x > tuning.field_width - ball.radius {
            ball.vel.x = -ball.vel.x.abs();
            wall_hits[1] = Some(ball.pos - Vec2::new(4.0, 0.0));
        }
        if ball.pos.y < ball.radius {
            ball.vel.y = ball.vel.y.abs();
            wall_hits[2] = Some(ball.pos + Vec2::new(0.0, 4.0));
        }
        for pos in wall_hits.into_iter().flatten() {
            burst_id += 1;
            spawn_burst(
                &mut state.particles,
                tuning.max_particles,
                tick_seed,
                burst_id,
                pos,
                ParticleKind::Wall,
                6,
            );
            state.events.push(GameEvent::WallBounce { pos });
        }

        // --- ITEMS --- (reverse so removal keeps indices valid)
        for i in (0..state.items.len()).rev() {
            let item = &state.items[i];
            if !circle_intersects_circle(ball.pos, ball.radius, item.pos, item.radius) {
                continue;
            }
            let item = state.items.remove(i);
            match item.kind {
                ItemKind::ExtraBall => state.balls_to_shoot += 1,
            }
            burst_id += 1;
            spawn_burst(
                &mut state.particles,
                tuning.max_particles,
                tick_seed,
                burst_id,
                item.pos,
                ParticleKind::Pickup,
                10,
            );
            state.events.push(GameEvent::ItemCollected { pos: item.pos });
            state.events.push(GameEvent::HudChanged);
        }

        // --- BRICKS --- (first overlap wins)
        for i in (0..state.bricks.len()).rev() {
            let brick = &mut state.bricks[i];
            if !circle_intersects_rect(ball.pos, ball.radius, &brick.rect) {
                continue;
            }

            ball.vel = bounce_axis(ball.pos, &brick.rect).reflect(ball.vel);
            let destroyed = brick.hit();
            let hp_left = brick.hp;
            let center = brick.rect.center();
            state.score += 1;

            burst_id += 1;
            spawn_burst(
                &mut state.particles,
                tuning.max_particles,
                tick_seed,
                burst_id,
                ball.pos,
                ParticleKind::Hit,
                12,
            );
            state.events.push(GameEvent::BrickHit {
                pos: ball.pos,
                hp_left,
            });
            state.events.push(GameEvent::HudChanged);

            if destroyed {
                burst_id += 1;
                spawn_burst(
                    &mut state.particles,
                    tuning.max_particles,
                    tick_seed,
                    burst_id,
                    center,
                    ParticleKind::Shatter,
                    20,
                );
                state.bricks.remove(i);
                state.events.push(GameEvent::BrickDestroyed { pos: center });
            }
            break;
        }
    }
}

/// Record landing positions and drop balls that left the field
fn collect_finished_balls(state: &mut GameState) {
    let landing_depth = state.launcher.pos.y;
    let exit_y = state.tuning.field_height + state.tuning.exit_margin;
    let mut landing_x = state.landing_x;

    state.balls.retain(|ball| {
        if ball.pos.y >= landing_depth - ball.radius {
            landing_x = ball.pos.x;
        }
        ball.pos.y < exit_y
    });

    state.landing_x = landing_x;
}

/// Advance item wobble and particles
fn update_cosmetics(state: &mut GameState) {
    for item in &mut state.items {
        item.wobble += state.tuning.wobble_rate;
    }

    for particle in &mut state.particles {
        particle.pos += particle.vel;
        particle.vel.y += PARTICLE_GRAVITY;
        particle.life -= 1.0;
    }
    state.particles.retain(|p| p.life > 0.0);
}

/// Emit a burst of `count` particles at `pos`.
///
/// Spread comes from a hash of the tick and burst index, never from the
/// gameplay RNG, so particles cannot change spawns.
fn spawn_burst(
    particles: &mut Vec<Particle>,
    max_particles: usize,
    tick_seed: u32,
    burst_id: u32,
    pos: Vec2,
    kind: ParticleKind,
    count: u32,
) {
    if max_particles == 0 {
        return;
    }
    let seed = tick_seed
        .wrapping_mul(2654435761)
        .wrapping_add(burst_id.wrapping_mul(31337));

    for i in 0..count {
        if particles.len() >= max_particles {
            // Remove oldest particles to make room
            particles.remove(0);
        }
        let hash = seed.wrapping_add(i * 7919).wrapping_mul(2654435761);
        let r1 = (hash % 1000) as f32 / 1000.0;
        let r2 = ((hash >> 10) % 1000) as f32 / 1000.0;
        let r3 = ((hash >> 20) % 1000) as f32 / 1000.0;
        let r4 = ((hash >> 5) % 1000) as f32 / 1000.0;

        particles.push(Particle {
            pos,
            vel: Vec2::new((r1 - 0.5) * 6.0, (r2 - 0.8) * 6.0),
            kind,
            life: r3 * 30.0 + 20.0,
            size: r4 * 2.0 + 1.0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Rect;
    use crate::sim::state::{Ball, Brick, Item, MAX_PENDING_EVENTS, TurnPhase};
    use crate::tuning::Tuning;

    /// Session with the spawned row removed
    fn empty_state(seed: u64) -> GameState {
        let mut state = GameState::new(Tuning::default(), seed);
        state.bricks.clear();
        state.items.clear();
        state.drain_events();
        state
    }

    #[test]
    fn test_wall_bounce_flips_velocity_only() {
        let mut state = empty_state(1);
        state
            .balls
            .push(Ball::new(Vec2::new(3.0, 300.0), Vec2::new(-2.0, -3.0), 6.0));

        tick(&mut state, &TickInput::default());

        let ball = &state.balls[0];
        assert_eq!(ball.pos, Vec2::new(1.0, 297.0));
        assert_eq!(ball.vel, Vec2::new(2.0, -3.0));
        assert_eq!(ball.radius, 6.0);
        assert_eq!(ball.trail[0], Vec2::new(3.0, 300.0));
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::WallBounce { .. })));
    }

    #[test]
    fn test_right_and_top_walls() {
        let mut state = empty_state(1);
        state
            .balls
            .push(Ball::new(Vec2::new(396.0, 4.0), Vec2::new(3.0, -3.0), 6.0));

        tick(&mut state, &TickInput::default());

        let ball = &state.balls[0];
        assert_eq!(ball.vel, Vec2::new(-3.0, 3.0));
        assert!((ball.vel.length() - Vec2::new(3.0, 3.0).length()).abs() < 1e-6);
    }

    #[test]
    fn test_no_bottom_wall() {
        let mut state = empty_state(1);
        state
            .balls
            .push(Ball::new(Vec2::new(100.0, 745.0), Vec2::new(0.0, 7.0), 6.0));

        tick(&mut state, &TickInput::default());

        assert!(state.balls.is_empty());
    }

    #[test]
    fn test_brick_hp_counts_down_to_removal() {
        let mut state = empty_state(2);
        state
            .bricks
            .push(Brick::new(Rect::new(100.0, 200.0, 45.0, 38.0), 3));
        // A resting ball overlapping the brick hits it once per tick
        state
            .balls
            .push(Ball::new(Vec2::new(122.0, 240.0), Vec2::ZERO, 6.0));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.bricks[0].hp, 2);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.bricks[0].hp, 1);
        tick(&mut state, &TickInput::default());
        assert!(state.bricks.is_empty());
        assert_eq!(state.score, 3);
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::BrickDestroyed { .. })));
    }

    #[test]
    fn test_one_brick_per_ball_per_tick() {
        let mut state = empty_state(3);
        state
            .bricks
            .push(Brick::new(Rect::new(100.0, 200.0, 45.0, 38.0), 2));
        state
            .bricks
            .push(Brick::new(Rect::new(110.0, 210.0, 45.0, 38.0), 2));
        state
            .balls
            .push(Ball::new(Vec2::new(125.0, 225.0), Vec2::ZERO, 6.0));

        tick(&mut state, &TickInput::default());

        let total_hp: u32 = state.bricks.iter().map(|b| b.hp).sum();
        assert_eq!(total_hp, 3);
        assert_eq!(state.score, 1);
        // Reverse iteration: the last brick is checked first
        assert_eq!(state.bricks[1].hp, 1);
    }

    #[test]
    fn test_item_collected_once_by_two_balls() {
        let mut state = empty_state(4);
        state.items.push(Item {
            pos: Vec2::new(200.0, 300.0),
            radius: 12.0,
            kind: ItemKind::ExtraBall,
            wobble: 0.0,
        });
        state
            .balls
            .push(Ball::new(Vec2::new(200.0, 300.0), Vec2::ZERO, 6.0));
        state
            .balls
            .push(Ball::new(Vec2::new(202.0, 301.0), Vec2::ZERO, 6.0));

        tick(&mut state, &TickInput::default());

        assert_eq!(state.balls_to_shoot, 2);
        assert!(state.items.is_empty());
        let pickups = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::ItemCollected { .. }))
            .count();
        assert_eq!(pickups, 1);
    }

    #[test]
    fn test_two_balls_collect_two_items_same_tick() {
        let mut state = empty_state(4);
        for x in [100.0, 300.0] {
            state.items.push(Item {
                pos: Vec2::new(x, 300.0),
                radius: 12.0,
                kind: ItemKind::ExtraBall,
                wobble: 0.0,
            });
            state
                .balls
                .push(Ball::new(Vec2::new(x, 300.0), Vec2::ZERO, 6.0));
        }

        tick(&mut state, &TickInput::default());

        assert_eq!(state.balls_to_shoot, 3);
        assert!(state.items.is_empty());
        let pickups = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::ItemCollected { .. }))
            .count();
        assert_eq!(pickups, 2);
    }

    #[test]
    fn test_brick_side_hit_flips_horizontal_only() {
        let mut state = empty_state(7);
        state
            .bricks
            .push(Brick::new(Rect::new(100.0, 200.0, 45.0, 38.0), 3));
        // Moves to (95, 220): 5px left of the brick's left edge
        state
            .balls
            .push(Ball::new(Vec2::new(90.0, 219.0), Vec2::new(5.0, 1.0), 6.0));

        tick(&mut state, &TickInput::default());

        let ball = &state.balls[0];
        assert_eq!(ball.pos, Vec2::new(95.0, 220.0));
        assert_eq!(ball.vel, Vec2::new(-5.0, 1.0));
        assert_eq!(state.bricks[0].hp, 2);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_volley_of_three_is_staggered() {
        let mut state = empty_state(5);
        state.balls_to_shoot = 3;

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        let mut launch_ticks = Vec::new();
        let mut input = fire;
        for _ in 0..2000 {
            let now = state.time_ticks;
            tick(&mut state, &input);
            input = TickInput::default();

            let launched = state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::BallLaunched))
                .count();
            for _ in 0..launched {
                launch_ticks.push(now);
            }
            if state.phase == TurnPhase::Aiming {
                break;
            }
            assert_eq!(state.phase, TurnPhase::Shooting);
        }

        assert_eq!(launch_ticks, vec![0, 5, 10]);
        assert_eq!(state.phase, TurnPhase::Aiming);
        assert!(state.balls.is_empty());
        assert_eq!(state.round, 2);
        // Straight-up shots land where they started
        assert!((state.launcher.pos.x - 200.0).abs() < 0.01);
    }

    #[test]
    fn test_launcher_moves_to_last_landing() {
        let mut state = empty_state(6);
        state.launcher.aim = -60.0;
        tick(
            &mut state,
            &TickInput {
                fire: true,
                ..Default::default()
            },
        );
        for _ in 0..2000 {
            if state.phase == TurnPhase::Aiming {
                break;
            }
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.phase, TurnPhase::Aiming);
        assert!((state.launcher.pos.x - state.landing_x).abs() < f32::EPSILON);
        assert!(state.launcher.pos.x > 0.0 && state.launcher.pos.x < 400.0);
        assert_eq!(state.launcher.aim, -90.0);
    }

    #[test]
    fn test_game_over_latch_survives_clearing() {
        let mut state = empty_state(7);
        state
            .bricks
            .push(Brick::new(Rect::new(6.0, 606.0, 45.0, 44.0), 5));

        tick(&mut state, &TickInput::default());
        assert!(state.game_over);
        assert_eq!(state.phase, TurnPhase::GameOver);

        state.bricks.clear();
        let ticks = state.time_ticks;
        tick(
            &mut state,
            &TickInput {
                fire: true,
                ..Default::default()
            },
        );
        assert!(state.game_over);
        assert_eq!(state.time_ticks, ticks);
        assert!(state.launches.is_empty());
    }

    #[test]
    fn test_row_advance_triggers_game_over() {
        let mut state = empty_state(8);
        // Bottom at 620: one shift puts it at 670, past the line at 650
        state
            .bricks
            .push(Brick::new(Rect::new(6.0, 582.0, 45.0, 38.0), 50));
        state.phase = TurnPhase::Shooting;

        tick(&mut state, &TickInput::default());

        assert_eq!(state.round, 2);
        assert!(state.game_over);
        assert_eq!(state.phase, TurnPhase::GameOver);
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::GameOver(summary) if summary.rounds_survived == 1
        )));
    }

    #[test]
    fn test_round_one_end_to_end() {
        let tuning = Tuning::default();
        let mut state = GameState::new(tuning.clone(), 2024);
        assert_eq!(state.bricks.len(), 2);
        assert!(state.bricks.iter().all(|b| b.hp == 1));
        assert_eq!(state.items.len(), 1);

        // Lay the two bricks out so a -88 degree shot hits the upper one on the
        // way up and the lower one on the way down.
        state.bricks[0].rect = Rect::new(190.0, 56.0, 70.0, 38.0);
        state.bricks[1].rect = Rect::new(222.0, 380.0, 68.0, 80.0);
        state.items[0].pos.x = tuning.lane_width() / 2.0;

        tick(
            &mut state,
            &TickInput {
                aim_delta: 2.0,
                fire: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, TurnPhase::Shooting);
        assert_eq!(state.balls.len(), 1);

        for _ in 0..2000 {
            if state.phase != TurnPhase::Shooting {
                break;
            }
            tick(&mut state, &TickInput::default());
        }

        assert_eq!(state.phase, TurnPhase::Aiming);
        assert_eq!(state.score, 2);
        assert_eq!(state.round, 2);
        assert!(!state.game_over);
        // Only the new row remains
        assert!((1..=3).contains(&state.bricks.len()));
        assert!(state.bricks.iter().all(|b| b.hp == 2 && b.rect.origin.y == 56.0));
        // Uncollected item shifted down, plus the new row's item
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.balls_to_shoot, 1);
    }

    #[test]
    fn test_particles_expire() {
        let mut state = empty_state(9);
        spawn_burst(
            &mut state.particles,
            256,
            0,
            1,
            Vec2::new(50.0, 50.0),
            ParticleKind::Hit,
            12,
        );
        assert_eq!(state.particles.len(), 12);
        for _ in 0..60 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_particle_cap() {
        let mut particles = Vec::new();
        for id in 0..40 {
            spawn_burst(&mut particles, 100, 0, id, Vec2::ZERO, ParticleKind::Wall, 6);
        }
        assert_eq!(particles.len(), 100);
    }

    #[test]
    fn test_particles_do_not_touch_gameplay_rng() {
        let mut a = GameState::new(Tuning::default(), 77);
        let mut b = GameState::new(Tuning::default(), 77);
        b.tuning.max_particles = 0;

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut a, &fire);
        tick(&mut b, &fire);
        for _ in 0..3000 {
            tick(&mut a, &TickInput::default());
            tick(&mut b, &TickInput::default());
        }

        assert!(b.particles.is_empty());
        assert_eq!(a.round, b.round);
        assert_eq!(a.score, b.score);
        assert_eq!(a.bricks.len(), b.bricks.len());
        for (x, y) in a.bricks.iter().zip(&b.bricks) {
            assert_eq!(x.rect, y.rect);
            assert_eq!(x.hp, y.hp);
        }
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(Tuning::default(), 99999);
        let mut state2 = GameState::new(Tuning::default(), 99999);

        let inputs = [
            TickInput {
                aim_delta: -20.0,
                ..Default::default()
            },
            TickInput {
                fire: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..400 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.round, state2.round);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.balls.len(), state2.balls.len());
        assert_eq!(state1.launcher.pos, state2.launcher.pos);
    }

    #[test]
    fn test_idle_mode_plays_a_turn() {
        let mut state = GameState::new(Tuning::default(), 31);
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..5000 {
            tick(&mut state, &idle);
            if state.round > 1 || state.game_over {
                break;
            }
        }
        assert!(state.round >= 2);
    }

    #[test]
    fn test_undrained_events_stay_bounded() {
        let mut state = GameState::new(Tuning::default(), 31);
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..20_000 {
            tick(&mut state, &idle);
        }
        assert!(!state.events.is_empty());
        assert!(state.events.len() <= MAX_PENDING_EVENTS);
    }
}
