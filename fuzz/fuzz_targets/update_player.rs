#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use glicko2_period::{Player, Rating, RatingSystem, Score};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct ArbitraryRating {
    rating: f64,
    deviation: f64,
    volatility: f64,
}

impl ArbitraryRating {
    fn into_clamped(self) -> Option<Rating> {
        if self.rating.is_nan() || self.deviation.is_nan() || self.volatility.is_nan() {
            None
        } else {
            Rating::new(
                self.rating.clamp(-10000.0, 10000.0),
                self.deviation.clamp(1e-3, 1000.0),
                self.volatility.clamp(1e-6, 1.0),
            )
            .ok()
        }
    }
}

#[derive(Arbitrary, Debug)]
struct Period {
    player: ArbitraryRating,
    results: Vec<(ArbitraryRating, f64)>,
    tau: f64,
}

fn assert_rating(player: &Player) {
    assert!(f64::from(player.rating()).is_finite());
    assert!(f64::from(player.deviation()) > 0.0);
    assert!(f64::from(player.volatility()) > 0.0);
    assert!(!player.has_pending_results());
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(period) = Period::arbitrary(&mut u) else {
        return;
    };
    let Some(rating) = period.player.into_clamped() else {
        return;
    };
    let Ok(rating_system) = RatingSystem::builder().tau(period.tau.clamp(0.01, 2.0)).build() else {
        return;
    };

    let mut player = Player::from(rating);
    for (opponent, score) in period.results {
        let (Some(opponent), Ok(score)) = (opponent.into_clamped(), Score::new(score)) else {
            continue;
        };
        player.add_result_against(opponent, score);
    }

    if player.update_with(&rating_system).is_err() {
        assert_eq!(player.snapshot(), rating);
    }
    assert_rating(&player);
});
