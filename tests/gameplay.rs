//! End-to-end scenarios against the built-in level catalog

use ball_roller::Rules;
use ball_roller::consts::*;
use ball_roller::platform::{FrameClock, Key, KeyboardState};
use ball_roller::renderer::DrawList;
use ball_roller::sim::{
    Contact, Flow, GameEvent, GamePhase, GameState, LevelCatalog, TickInput, evaluate, tick,
};
use glam::Vec2;
use proptest::prelude::*;

fn new_game() -> GameState {
    GameState::new(LevelCatalog::builtin().unwrap())
}

/// Finish levels with no time left so the score is untouched
fn skip_to_level(state: &mut GameState, index: usize) {
    while state.level_index < index {
        state.timer_ms = 0.0;
        state.complete_level();
    }
    state.drain_events();
}

#[test]
fn reaching_first_goal_advances_with_time_bonus() {
    let mut state = new_game();
    state.ball = Vec2::new(700.0, 100.0);

    assert_eq!(evaluate(&mut state, &Rules::default()), Contact::Goal);
    assert_eq!(state.score, 60);
    assert_eq!(state.level_index, 1);
    assert_eq!(state.ball, Vec2::new(50.0, 550.0));
    assert_eq!(state.timer_ms, 60_000.0);
    assert_eq!(state.collectibles.len(), 4);
    assert_eq!(
        state.drain_events(),
        vec![GameEvent::LevelComplete {
            level: 0,
            time_bonus: 60
        }]
    );
}

#[test]
fn last_life_on_obstacle_is_game_over() {
    let mut state = new_game();
    state.lives = 1;
    state.ball = Vec2::new(300.0, 400.0);

    assert_eq!(evaluate(&mut state, &Rules::default()), Contact::Obstacle(0));
    assert_eq!(state.phase, GamePhase::GameOver);
    assert_eq!(state.lives, 0);

    let list = DrawList::build(&state, None);
    assert_eq!(list.hud[0], "Game Over!");
    assert!(list.circles.is_empty());
}

#[test]
fn leaving_the_playfield_costs_a_life() {
    let mut state = new_game();
    state.ball = Vec2::new(-1.0, 300.0);

    assert_eq!(evaluate(&mut state, &Rules::default()), Contact::OutOfBounds);
    assert_eq!(state.lives, 2);
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.ball, Vec2::new(100.0, 500.0));
}

#[test]
fn ten_gems_across_levels_grant_one_life() {
    let mut state = new_game();
    let rules = Rules::default();

    for _ in 0..3 {
        for gem in state.level().collectibles.clone() {
            state.ball = gem;
            assert_eq!(evaluate(&mut state, &rules), Contact::Clear);
        }
        assert!(state.collectibles.is_empty());
        state.ball = state.level().goal;
        assert_eq!(evaluate(&mut state, &rules), Contact::Goal);
    }

    let events = state.drain_events();
    let collected = events
        .iter()
        .filter(|e| matches!(e, GameEvent::Collected { .. }))
        .count();
    assert_eq!(collected, 10);
    assert!(events.contains(&GameEvent::ExtraLife { lives: 4 }));
    assert_eq!(state.lives, 4);
    assert_eq!(state.bonus_counter, 0);
    assert_eq!(state.level_index, 3);
    assert_eq!(state.score, 1000 + 3 * 60);
}

#[test]
fn final_goal_wins_with_floored_bonus() {
    for (timer, bonus) in [(4500.0, 4), (0.0, 0)] {
        let mut state = new_game();
        skip_to_level(&mut state, 9);
        assert_eq!(state.score, 0);

        state.timer_ms = timer;
        state.ball = Vec2::new(750.0, 50.0);
        assert_eq!(evaluate(&mut state, &Rules::default()), Contact::Goal);
        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(state.score, bonus);
        assert_eq!(state.level_index, 9);

        let list = DrawList::build(&state, None);
        assert_eq!(list.hud[0], "Congratulations! You Won!");
        assert_eq!(list.hud[1], format!("Final Score: {}", bonus));
    }
}

#[test]
fn retry_after_game_over_restarts_level_one() {
    let mut state = new_game();
    skip_to_level(&mut state, 4);
    state.score = 900;
    state.lives = 1;
    state.lose_life(false);
    assert_eq!(state.phase, GamePhase::GameOver);

    let rules = Rules::default();
    let mut keys = KeyboardState::new();
    keys.press(Key::Retry);
    assert_eq!(tick(&mut state, &keys.take_input(), TICK_MS, &rules), Flow::Continue);

    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.level_index, 0);
    assert_eq!(state.lives, INITIAL_LIVES);
    assert_eq!(state.score, 0);
    assert_eq!(state.ball, Vec2::new(100.0, 500.0));

    // The retry press was consumed; Q now only matters on a modal screen
    keys.press(Key::Quit);
    assert_eq!(tick(&mut state, &keys.take_input(), TICK_MS, &rules), Flow::Continue);
}

#[test]
fn moving_obstacle_patrols_its_segment() {
    let mut state = new_game();
    skip_to_level(&mut state, 2);
    let rules = Rules::default();
    let idle = TickInput::default();

    let mut reached_end = false;
    let mut returned = false;
    for _ in 0..220 {
        tick(&mut state, &idle, TICK_MS, &rules);
        let y = state.moving[0].pos.y;
        assert_eq!(state.moving[0].pos.x, 400.0);
        assert!((150.0..=350.0).contains(&y));
        if y == 350.0 {
            reached_end = true;
        }
        if reached_end && y == 150.0 {
            returned = true;
        }
    }
    assert!(reached_end && returned);
    assert_eq!(state.lives, INITIAL_LIVES);
    assert_eq!(state.ball, Vec2::new(100.0, 100.0));
}

#[test]
fn frame_clock_drives_the_countdown() {
    let mut state = new_game();
    let rules = Rules::default();
    let mut clock = FrameClock::new();
    let mut keys = KeyboardState::new();

    let step = 1000.0 / 60.0;
    let mut ticks = 0;
    for frame in 0..=30 {
        for _ in 0..clock.poll(frame as f64 * step) {
            tick(&mut state, &keys.take_input(), TICK_MS, &rules);
            ticks += 1;
        }
    }
    assert_eq!(ticks, 30);
    assert_eq!(state.time_ticks, 30);
    assert_eq!(state.remaining_secs(), 59);
    let list = DrawList::build(&state, Some(clock.fps()));
    assert!(list.hud.contains(&"Time: 59".to_string()));
}

#[test]
fn countdown_keeps_real_time_at_any_refresh_rate() {
    let rules = Rules::default();
    for hz in [75.0, 144.0] {
        let mut state = new_game();
        let mut clock = FrameClock::new();
        let mut keys = KeyboardState::new();

        // Ten seconds of frames
        let frames = (hz * 10.0) as u32;
        for frame in 0..=frames {
            for _ in 0..clock.poll(frame as f64 * 1000.0 / hz) {
                tick(&mut state, &keys.take_input(), TICK_MS, &rules);
            }
        }
        assert!(
            (598..=602).contains(&state.time_ticks),
            "{hz} Hz ran {} ticks",
            state.time_ticks
        );
        assert!((49..=50).contains(&state.remaining_secs()));
    }
}

fn input_from_bits(bits: u8) -> TickInput {
    TickInput {
        up: bits & 1 != 0,
        down: bits & 2 != 0,
        left: bits & 4 != 0,
        right: bits & 8 != 0,
        retry: bits & 16 != 0,
        ..Default::default()
    }
}

proptest! {
    #[test]
    fn prop_score_never_decreases_while_playing(
        moves in prop::collection::vec(0u8..32, 1..400),
        normalize in any::<bool>(),
    ) {
        let mut state = new_game();
        let rules = Rules { normalize_diagonal: normalize, ..Rules::default() };
        let mut last_score = 0;

        for bits in moves {
            let was_modal = state.phase.is_modal();
            let flow = tick(&mut state, &input_from_bits(bits), TICK_MS, &rules);
            prop_assert_eq!(flow, Flow::Continue);

            // Only a retry from a modal screen may reset the score
            if !was_modal {
                prop_assert!(state.score >= last_score);
            }
            last_score = state.score;

            prop_assert!(state.level_index < state.catalog().level_count());
            prop_assert!(state.timer_ms >= 0.0 && state.timer_ms <= LEVEL_TIME_MS);
            if state.phase == GamePhase::Playing {
                prop_assert!(state.lives > 0);
            }
        }
    }
}
