//! Fixed timestep simulation tick
//!
//! Advances every ball by one step. Balls are updated in place and in slot
//! order, so a ball processed later in the tick sees the effects of the
//! collisions already resolved for earlier ones. With three or more bodies
//! overlapping at once the outcome depends on that order.

use std::f32::consts::{PI, TAU};

use super::collision::{Motion, WallContact, circles_overlap, is_receding, wall_contact};
use super::state::{Arena, Ball, PointerBody, SimState};
use crate::tuning::Tuning;
use crate::{distance, heading_vector, wrap_angle};

/// Advance the simulation by one fixed timestep
pub fn tick(state: &mut SimState, dt: f32) {
    for i in 0..state.balls.len() {
        update_ball(
            &mut state.balls,
            i,
            &state.pointer,
            &state.arena,
            &state.tuning,
            dt,
        );
    }
    update_pointer(&mut state.pointer);
    state.time_ticks += 1;
}

/// Run the full rule set for the ball in slot `i`
pub fn update_ball(
    balls: &mut [Ball],
    i: usize,
    pointer: &PointerBody,
    arena: &Arena,
    tuning: &Tuning,
    dt: f32,
) {
    resolve_walls(&mut balls[i], arena, tuning);

    for j in 0..balls.len() {
        if j == i {
            continue;
        }
        let (me, other) = pair_mut(balls, i, j);
        if circles_overlap(&*me, &*other)
            && !is_receding(Motion::from(&*me), Motion::from(&*other))
        {
            resolve_peer(me, other, tuning);
        }
    }

    let ball = &mut balls[i];
    resolve_pointer(ball, pointer, tuning);
    ball.angle = wrap_angle(ball.angle);
    integrate(ball, tuning, dt);
}

/// Reflect off any touched wall, boosting once per wall axis
pub fn resolve_walls(ball: &mut Ball, arena: &Arena, tuning: &Tuning) -> WallContact {
    let contact = wall_contact(ball.pos, ball.radius, arena);
    if contact.horizontal {
        ball.angle = PI - ball.angle;
        ball.velocity = tuning.boost(ball.velocity, tuning.wall_boost);
    }
    if contact.vertical {
        ball.angle = TAU - ball.angle;
        ball.velocity = tuning.boost(ball.velocity, tuning.wall_boost);
    }
    contact
}

/// Resolve a hit between `me` (the ball being updated) and `other`.
///
/// The angle updates are sequential: `other` is mixed with the already
/// updated heading of `me`.
pub fn resolve_peer(me: &mut Ball, other: &mut Ball, tuning: &Tuning) {
    if me.velocity == 0.0 || other.velocity == 0.0 {
        // Knock the resting body straight back along the mover's line
        let (fluid_angle, stationary) = if me.velocity != 0.0 {
            (me.angle, &mut *other)
        } else {
            (other.angle, &mut *me)
        };
        stationary.angle = wrap_angle(fluid_angle + PI);
        stationary.velocity = tuning.boost(stationary.velocity, stationary.radius);
    }

    me.angle = wrap_angle(me.angle + other.angle);
    other.angle = wrap_angle(me.angle - other.angle);

    let (max, min) = if me.velocity >= other.velocity {
        (me, other)
    } else {
        (other, me)
    };
    let lever = max.velocity / tuning.lever_divisor;
    max.velocity = (max.velocity - lever).max(0.0);
    // Capped, so speed is injected rather than conserved near saturation
    min.velocity = tuning.boost(min.velocity, lever);
}

/// Push the ball directly away from the pointer centre on contact
pub fn resolve_pointer(ball: &mut Ball, pointer: &PointerBody, tuning: &Tuning) -> bool {
    if !circles_overlap(&*ball, pointer) {
        return false;
    }
    let away = ball.pos - pointer.pos;
    ball.angle = away.y.atan2(away.x);
    ball.velocity = tuning.boost(ball.velocity, tuning.pointer_boost * pointer.velocity);
    true
}

/// Move along the heading, then bleed off speed
pub fn integrate(ball: &mut Ball, tuning: &Tuning, dt: f32) {
    ball.pos += heading_vector(ball.angle) * ball.velocity * dt;
    ball.velocity = (ball.velocity - tuning.friction * dt).max(0.0);
}

/// Derive pointer speed from how far it moved since the last tick
pub fn update_pointer(pointer: &mut PointerBody) {
    pointer.velocity = distance(pointer.pos, pointer.prev_pos);
    pointer.prev_pos = pointer.pos;
}

/// Borrow two distinct slots mutably
fn pair_mut(balls: &mut [Ball], i: usize, j: usize) -> (&mut Ball, &mut Ball) {
    debug_assert_ne!(i, j);
    if i < j {
        let (lo, hi) = balls.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = balls.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use glam::Vec2;
    use proptest::prelude::*;

    const EPS: f32 = 1e-4;

    fn arena_state() -> SimState {
        SimState::empty(Tuning::default(), 800.0, 600.0)
    }

    #[test]
    fn test_head_on_collision() {
        // Centres 30 apart with radius 15 are exactly tangent: no contact
        let mut touching = arena_state();
        touching.push_ball(Vec2::new(100.0, 300.0), 50.0, 0.0);
        touching.push_ball(Vec2::new(130.0, 300.0), 50.0, PI);
        assert!(!circles_overlap(&touching.balls[0], &touching.balls[1]));

        let mut state = arena_state();
        state.push_ball(Vec2::new(100.0, 300.0), 50.0, 0.0);
        state.push_ball(Vec2::new(128.0, 300.0), 50.0, PI);
        assert!(circles_overlap(&state.balls[0], &state.balls[1]));

        tick(&mut state, SIM_DT);
        let (a, b) = (&state.balls[0], &state.balls[1]);

        // Ball 0 resolves: angles (0, π) -> (π, 0), the tie hands lever 10
        // to ball 1 (40 / 60), ball 0 moves 40·dt left and decays to 35.
        // Ball 1 resolves against the still-overlapping, opposed ball 0:
        // angles (0, π) -> (π, 0) for (ball 1, ball 0). Ball 1 is faster
        // (60 vs 35), lever 12 -> (48, 47), moves 48·dt left, decays to 43.
        assert!(a.angle.abs() < EPS);
        assert!((b.angle - PI).abs() < EPS);
        assert!((a.velocity - 47.0).abs() < EPS);
        assert!((b.velocity - 43.0).abs() < EPS);
        assert!((a.pos.x - (100.0 - 40.0 / 60.0)).abs() < EPS);
        assert!((b.pos.x - (128.0 - 48.0 / 60.0)).abs() < EPS);
    }

    #[test]
    fn test_left_wall_contact() {
        let tuning = Tuning::default();
        let arena = Arena::new(800.0, 600.0);
        let mut ball = Ball::new(1, Vec2::new(15.0, 300.0), 15.0, 50.0, PI);

        let contact = resolve_walls(&mut ball, &arena, &tuning);
        assert!(contact.horizontal && !contact.vertical);
        assert_eq!(ball.velocity, 80.0);
        assert_eq!(wrap_angle(ball.angle), 0.0);

        // Full tick: wall boost, then move right, then decay by 300·dt
        let mut state = arena_state();
        state.push_ball(Vec2::new(15.0, 300.0), 50.0, PI);
        tick(&mut state, SIM_DT);
        let ball = &state.balls[0];
        assert_eq!(ball.angle, 0.0);
        assert!((ball.velocity - 75.0).abs() < EPS);
        assert!((ball.pos.x - (15.0 + 80.0 / 60.0)).abs() < EPS);
    }

    #[test]
    fn test_corner_contact_reflects_both_axes() {
        let tuning = Tuning::default();
        let arena = Arena::new(800.0, 600.0);
        let start = 5.0 * PI / 4.0;
        let mut ball = Ball::new(1, Vec2::new(10.0, 10.0), 15.0, 50.0, start);

        let contact = resolve_walls(&mut ball, &arena, &tuning);
        assert!(contact.horizontal && contact.vertical);
        // π - a, then 2π - (π - a) = π + a
        assert!((wrap_angle(ball.angle) - wrap_angle(PI + start)).abs() < EPS);
        assert_eq!(ball.velocity, 100.0);
    }

    #[test]
    fn test_wall_boost_capped() {
        let tuning = Tuning::default();
        let arena = Arena::new(800.0, 600.0);
        let mut ball = Ball::new(1, Vec2::new(790.0, 300.0), 15.0, 90.0, 0.0);
        resolve_walls(&mut ball, &arena, &tuning);
        assert_eq!(ball.velocity, 100.0);
    }

    #[test]
    fn test_peer_knocks_stationary_ball() {
        let tuning = Tuning::default();
        let mut mover = Ball::new(1, Vec2::new(100.0, 300.0), 15.0, 50.0, 0.0);
        let mut still = Ball::new(2, Vec2::new(120.0, 300.0), 15.0, 0.0, 1.0);

        resolve_peer(&mut mover, &mut still, &tuning);

        // still: angle 0 + π, speed 0 + radius 15
        // mover: 0 + π = π; still: π - π = 0
        // lever 50 / 5 = 10 from mover to still
        assert!((mover.angle - PI).abs() < EPS);
        assert!(still.angle.abs() < EPS);
        assert!((mover.velocity - 40.0).abs() < EPS);
        assert!((still.velocity - 25.0).abs() < EPS);
    }

    #[test]
    fn test_peer_both_stationary() {
        let tuning = Tuning::default();
        let mut me = Ball::new(1, Vec2::new(100.0, 300.0), 15.0, 0.0, 0.5);
        let mut other = Ball::new(2, Vec2::new(110.0, 300.0), 15.0, 0.0, 2.0);

        resolve_peer(&mut me, &mut other, &tuning);

        // `me` is the stationary one and turns against `other`
        let me_angle = wrap_angle(wrap_angle(2.0 + PI) + 2.0);
        assert!((me.angle - me_angle).abs() < EPS);
        assert!((other.angle - wrap_angle(me_angle - 2.0)).abs() < EPS);
        // me: 15 then max (tie) -> 12; other: 0 + 3
        assert!((me.velocity - 12.0).abs() < EPS);
        assert!((other.velocity - 3.0).abs() < EPS);
    }

    #[test]
    fn test_lever_saturates_at_max_speed() {
        let tuning = Tuning::default();
        let mut me = Ball::new(1, Vec2::ZERO, 15.0, 95.0, 0.0);
        let mut other = Ball::new(2, Vec2::ZERO, 15.0, 100.0, PI);

        resolve_peer(&mut me, &mut other, &tuning);

        assert!((other.velocity - 80.0).abs() < EPS);
        assert_eq!(me.velocity, 100.0);
    }

    #[test]
    fn test_receding_pair_is_left_alone() {
        let mut state = arena_state();
        state.push_ball(Vec2::new(100.0, 300.0), 50.0, 0.0);
        state.push_ball(Vec2::new(110.0, 300.0), 50.0, 0.1);

        tick(&mut state, SIM_DT);

        assert_eq!(state.balls[0].angle, 0.0);
        assert!((state.balls[1].angle - 0.1).abs() < EPS);
        assert!((state.balls[0].velocity - 45.0).abs() < EPS);
        assert!((state.balls[1].velocity - 45.0).abs() < EPS);
    }

    #[test]
    fn test_pointer_pushes_ball_away() {
        let tuning = Tuning::default();
        let mut pointer = PointerBody::new(Vec2::new(400.0, 300.0), 40.0);
        let mut ball = Ball::new(1, Vec2::new(400.0, 330.0), 15.0, 10.0, 0.0);

        assert!(resolve_pointer(&mut ball, &pointer, &tuning));
        assert!((ball.angle - PI / 2.0).abs() < EPS);
        assert_eq!(ball.velocity, 10.0);

        pointer.velocity = 2.0;
        resolve_pointer(&mut ball, &pointer, &tuning);
        assert_eq!(ball.velocity, 70.0);

        let mut far = Ball::new(2, Vec2::new(100.0, 100.0), 15.0, 10.0, 1.0);
        assert!(!resolve_pointer(&mut far, &pointer, &tuning));
        assert_eq!(far.angle, 1.0);
    }

    #[test]
    fn test_pointer_speed_feeds_next_tick() {
        let mut state = arena_state();
        state.push_ball(Vec2::new(470.0, 300.0), 0.0, 0.0);

        // 3 units of pointer travel before the first tick
        state.move_pointer(403.0, 300.0);
        tick(&mut state, SIM_DT);
        assert_eq!(state.pointer.velocity, 3.0);
        assert_eq!(state.pointer.prev_pos, Vec2::new(403.0, 300.0));
        assert_eq!(state.balls[0].velocity, 0.0);

        // Sweep onto the ball; contact uses last tick's speed of 3
        state.move_pointer(430.0, 300.0);
        tick(&mut state, SIM_DT);
        let ball = &state.balls[0];
        assert!(ball.angle.abs() < EPS);
        assert!((ball.velocity - (90.0 - 300.0 * SIM_DT)).abs() < EPS);
        assert_eq!(state.pointer.velocity, 27.0);
    }

    #[test]
    fn test_update_pointer_at_rest() {
        let mut pointer = PointerBody::new(Vec2::new(10.0, 10.0), 40.0);
        update_pointer(&mut pointer);
        assert_eq!(pointer.velocity, 0.0);
    }

    #[test]
    fn test_velocity_floors_at_zero() {
        let mut state = arena_state();
        state.push_ball(Vec2::new(200.0, 200.0), 2.0, 1.0);
        tick(&mut state, SIM_DT);
        assert_eq!(state.balls[0].velocity, 0.0);
        tick(&mut state, SIM_DT);
        assert_eq!(state.balls[0].velocity, 0.0);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = SimState::new(Tuning::default(), 640.0, 480.0, 99999);
        let mut state2 = SimState::new(Tuning::default(), 640.0, 480.0, 99999);

        for i in 0..120 {
            let x = 320.0 + (i as f32 * 0.1).sin() * 200.0;
            state1.move_pointer(x, 240.0);
            state2.move_pointer(x, 240.0);
            tick(&mut state1, SIM_DT);
            tick(&mut state2, SIM_DT);
        }

        assert_eq!(state1.time_ticks, 120);
        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.balls, state2.balls);
        assert_eq!(state1.pointer, state2.pointer);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_invariants_hold_every_tick(
            seed in any::<u64>(),
            moves in proptest::collection::vec((0.0f32..300.0, 0.0f32..200.0), 60),
        ) {
            let tuning = Tuning { ball_count: 30, ..Default::default() };
            let mut state = SimState::new(tuning, 300.0, 200.0, seed);
            for (x, y) in moves {
                state.move_pointer(x, y);
                tick(&mut state, SIM_DT);
                for ball in &state.balls {
                    prop_assert!(ball.angle >= 0.0 && ball.angle < TAU, "angle {}", ball.angle);
                    prop_assert!(
                        ball.velocity >= 0.0 && ball.velocity <= 100.0,
                        "velocity {}",
                        ball.velocity
                    );
                }
            }
        }

        #[test]
        fn prop_left_wall_reverses_horizontal_heading(
            angle in (PI / 2.0 + 0.01)..(3.0 * PI / 2.0 - 0.01),
            speed in 0.0f32..100.0,
        ) {
            let tuning = Tuning::default();
            let arena = Arena::new(800.0, 600.0);
            let mut ball = Ball::new(1, Vec2::new(15.0, 300.0), 15.0, speed, angle);
            let before = heading_vector(ball.angle).x;
            resolve_walls(&mut ball, &arena, &tuning);
            let after = heading_vector(ball.angle).x;
            prop_assert!(before < 0.0);
            prop_assert!(after > 0.0);
            prop_assert!((after + before).abs() < 1e-5);
        }
    }
}
