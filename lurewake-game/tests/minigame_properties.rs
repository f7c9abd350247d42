use lurewake_game::{ReelOutcome, ReelingMinigame};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const TICK_LIMIT: u64 = 500_000;
const ROD_POWERS: [f64; 5] = [1.0, 1.5, 2.2, 3.0, 4.5];

fn assert_clamped(game: &ReelingMinigame) {
    assert!((0.0..=100.0).contains(&game.tension()), "tension {}", game.tension());
    assert!(
        (0.0..=game.max_distance()).contains(&game.distance()),
        "distance {} of {}",
        game.distance(),
        game.max_distance()
    );
}

/// Random reel/tap inputs until the fight ends; returns every terminal observed.
fn fuzz_attempt(seed: u64) -> (ReelingMinigame, Vec<ReelOutcome>) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let rarity = rng.gen_range(1..=9);
    let boss = rng.gen_bool(0.2);
    let power = ROD_POWERS[rng.gen_range(0..ROD_POWERS.len())];
    let mut game = ReelingMinigame::new(seed, rarity, boss, power);
    let mut terminals = Vec::new();
    for _ in 0..TICK_LIMIT {
        game.set_reeling(rng.gen_bool(0.6));
        if rng.gen_bool(0.05) && game.tap_target() {
            if let Some(outcome) = game.outcome() {
                terminals.push(outcome);
            }
        }
        assert_clamped(&game);
        if let Some(outcome) = game.tick(&mut rng).outcome {
            terminals.push(outcome);
        }
        assert_clamped(&game);
        if game.outcome().is_some() && rng.gen_bool(0.5) {
            break;
        }
    }
    (game, terminals)
}

#[test]
fn every_attempt_reaches_exactly_one_terminal() {
    for seed in 0..300 {
        let (mut game, terminals) = fuzz_attempt(seed);
        assert_eq!(terminals.len(), 1, "seed {seed}: {terminals:?}");
        assert_eq!(game.outcome(), Some(terminals[0]));

        let mut rng = SmallRng::seed_from_u64(seed ^ 0xFFFF);
        let frozen = game.clone();
        for _ in 0..100 {
            game.set_reeling(true);
            assert_eq!(game.tick(&mut rng).outcome, None);
            assert!(!game.tap_target());
        }
        assert_eq!(game.tension(), frozen.tension());
        assert_eq!(game.distance(), frozen.distance());
        assert_eq!(game.ticks(), frozen.ticks());
    }
}

#[test]
fn tension_snap_takes_priority() {
    let mut rng = SmallRng::seed_from_u64(3);
    let mut game = ReelingMinigame::new(1, 9, true, 1.0);
    game.set_reeling(true);
    while game.outcome().is_none() {
        game.tick(&mut rng);
    }
    assert_eq!(game.outcome(), Some(ReelOutcome::Broken));
    assert!((game.tension() - 100.0).abs() < f64::EPSILON);
}

#[test]
fn released_line_lets_the_fish_escape() {
    let mut rng = SmallRng::seed_from_u64(4);
    let mut game = ReelingMinigame::new(1, 2, false, 1.0);
    while game.outcome().is_none() {
        game.tick(&mut rng);
    }
    assert_eq!(game.outcome(), Some(ReelOutcome::Escaped));
}

#[test]
fn boss_is_never_perfect() {
    let mut rng = SmallRng::seed_from_u64(5);
    let mut game = ReelingMinigame::new(1, 5, true, 1_000.0);
    game.set_reeling(true);
    while game.outcome().is_none() {
        game.tick(&mut rng);
    }
    assert_eq!(game.outcome(), Some(ReelOutcome::Caught));
    assert!(game.max_tension() < 50.0);
    assert!(!game.is_perfect());
}

#[test]
fn perfect_tracks_max_tension_not_final() {
    let mut rng = SmallRng::seed_from_u64(6);
    let mut game = ReelingMinigame::new(1, 1, false, 1.0);

    game.set_reeling(true);
    while game.tension() <= 55.0 {
        game.tick(&mut rng);
        assert!(game.outcome().is_none());
    }
    game.set_reeling(false);
    while game.tension() > 0.0 {
        game.tick(&mut rng);
        assert!(game.outcome().is_none());
    }
    while game.outcome().is_none() {
        let reel = game.tension() < 30.0;
        game.set_reeling(reel);
        game.tick(&mut rng);
    }

    assert_eq!(game.outcome(), Some(ReelOutcome::Caught));
    assert!(game.tension() < 50.0);
    assert!(game.max_tension() >= 50.0);
    assert!(!game.is_perfect());
}

#[test]
fn gentle_reeling_is_perfect() {
    let mut rng = SmallRng::seed_from_u64(8);
    let mut game = ReelingMinigame::new(1, 1, false, 1.0);
    while game.outcome().is_none() {
        let reel = game.tension() < 30.0;
        game.set_reeling(reel);
        game.tick(&mut rng);
    }
    assert_eq!(game.outcome(), Some(ReelOutcome::Caught));
    assert!(game.is_perfect());
}
