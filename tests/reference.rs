use glicko2_period::{
    to_internal_deviation, to_public_deviation, Error, Player, Rating, RatingSystem, Score,
};
use proptest::prelude::*;

fn assert_close(value: f64, expected: f64, tol: f64) {
    assert!(
        (value - expected).abs() <= tol,
        "value {value} differed from {expected} (tol {tol})"
    );
}

#[test]
fn glickman_example() {
    let mut a = Player::new(1500.0, 200.0, 0.06).unwrap();
    let b = Player::new(1400.0, 30.0, 0.06).unwrap();
    let c = Player::new(1550.0, 100.0, 0.06).unwrap();
    let d = Player::new(1700.0, 300.0, 0.06).unwrap();

    a.add_win(&b);
    a.add_loss(&c);
    a.add_result(&d, Score::LOSS);

    assert_eq!(f64::from(a.rating()), 1500.0);
    assert_eq!(f64::from(a.deviation()), 200.0);

    a.update().unwrap();
    assert_close(a.rating().0, 1464.05, 0.01);
    assert_close(a.deviation().0, 151.516, 0.01);
    assert!(!a.has_pending_results());

    a.update().unwrap();
    assert_close(a.rating().0, 1464.05, 0.01);
    assert_close(a.deviation().0, 151.875, 0.01);
}

#[test]
fn update_without_results_inflates_deviation() {
    let mut player = Player::new(1500.0, 200.0, 0.06).unwrap();
    player.update().unwrap();

    let internal = to_internal_deviation(200.0);
    let expected = to_public_deviation((internal * internal + 0.06 * 0.06).sqrt());
    assert_close(player.rating().0, 1500.0, 1e-9);
    assert_close(player.deviation().0, expected, 1e-9);
    assert_eq!(player.volatility().0, 0.06);
}

#[test]
fn fresh_player_update() {
    let mut player = Player::default();
    player.clear_results();
    player.update().unwrap();
    assert_close(player.rating().0, 1500.0, 1e-9);
    assert!(player.deviation().0 > 350.0);
}

#[test]
fn results_keep_opponent_snapshot() {
    let mut a = Player::new(1500.0, 200.0, 0.06).unwrap();
    let mut b = Player::new(1400.0, 30.0, 0.06).unwrap();
    let mut control = a.clone();

    a.add_win(&b);
    control.add_win(&b);

    b.set_rating(2400.0).unwrap();
    b.set_deviation(350.0).unwrap();

    a.update().unwrap();
    control.update().unwrap();
    assert_eq!(a, control);
}

#[test]
fn players_rated_against_each_other() {
    let mut a = Player::new(1500.0, 200.0, 0.06).unwrap();
    let mut b = Player::new(1500.0, 200.0, 0.06).unwrap();
    let (a_before, b_before) = (a.snapshot(), b.snapshot());

    a.add_result_against(b_before, Score::WIN);
    b.add_result_against(a_before, Score::LOSS);

    a.update().unwrap();
    b.update().unwrap();

    assert!(a.rating() > a_before.rating());
    assert!(b.rating() < b_before.rating());
    // Identical priors and a symmetric encounter.
    assert_close(
        a.rating().0 - a_before.rating().0,
        b_before.rating().0 - b.rating().0,
        1e-9,
    );
    assert_close(a.deviation().0, b.deviation().0, 1e-9);
}

#[test]
fn invalid_parameters_rejected() {
    for (deviation, volatility) in [(0.0, 0.06), (-1.0, 0.06), (350.0, 0.0), (350.0, -0.06)] {
        assert!(matches!(
            Player::new(1500.0, deviation, volatility),
            Err(Error::InvalidParameter { .. })
        ));
    }
    assert!(matches!(Score::new(1.5), Err(Error::InvalidParameter { .. })));
}

#[test]
fn player_and_pure_update_agree() {
    let mut player = Player::new(1620.0, 80.0, 0.07).unwrap();
    let opponents = [
        Rating::new(1580.0, 120.0, 0.06).unwrap(),
        Rating::new(1710.0, 45.0, 0.06).unwrap(),
    ];
    let results = vec![
        (opponents[0], Score::new(0.25).unwrap()),
        (opponents[1], Score::DRAW),
    ];
    for (opponent, score) in &results {
        player.add_result_against(*opponent, *score);
    }

    let system = RatingSystem::builder().tau(0.5).build().unwrap();
    let expected = system
        .rate(&Rating::new(1620.0, 80.0, 0.07).unwrap(), &results)
        .unwrap();
    player.update_with(&system).unwrap();
    assert_eq!(player.snapshot(), expected);
}

proptest! {
    #[test]
    fn update_commits_only_valid_ratings(
        rating in 0.0f64..3000.0,
        deviation in 1.0f64..500.0,
        volatility in 0.01f64..0.2,
        opponents in prop::collection::vec((0.0f64..3000.0, 1.0f64..500.0, 0.0f64..=1.0), 0..8),
    ) {
        let mut player = Player::new(rating, deviation, volatility).unwrap();
        for (opponent_rating, opponent_deviation, score) in opponents {
            let opponent = Rating::new(opponent_rating, opponent_deviation, 0.06).unwrap();
            player.add_result_against(opponent, Score::new(score).unwrap());
        }
        let before = player.snapshot();

        match player.update() {
            Ok(()) => {
                prop_assert!(player.rating().0.is_finite());
                prop_assert!(player.deviation().0.is_finite() && player.deviation().0 > 0.0);
                prop_assert!(player.volatility().0.is_finite() && player.volatility().0 > 0.0);
            }
            Err(_) => prop_assert_eq!(player.snapshot(), before),
        }
        prop_assert!(!player.has_pending_results());
    }
}
