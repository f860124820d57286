use evothello_engine::{GameSession, Outcome, PLY_LIMIT, Player};

use crate::policy::MovePolicy;

/// Result of one finished match, from the referee's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome {
    pub outcome: Outcome,
    pub plies: usize,
}

impl MatchOutcome {
    /// Signed fitness deltas `(black, white)`.
    ///
    /// The winner gains its final disc count and the loser loses that same
    /// amount; a draw moves nothing. This is the score differential the
    /// evolution loop accumulates.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn score_deltas(&self) -> (f64, f64) {
        match self.outcome.winner() {
            Some(Player::Black) => {
                let margin = self.outcome.black as f64;
                (margin, -margin)
            }
            Some(Player::White) => {
                let margin = self.outcome.white as f64;
                (-margin, margin)
            }
            None => (0.0, 0.0),
        }
    }
}

/// Plays one match between two policies and returns the final score.
///
/// The [`GameSession`] is the sole referee: policies only ever see the
/// board and reply with a position or a pass. A policy that returns an
/// illegal move or passes with moves available violates the
/// [`MovePolicy`] contract.
///
/// # Panics
///
/// Panics if a policy breaks its contract, or if the game fails to reach a
/// terminal state within the engine's ply bound; either is an invariant
/// violation that must abort the generation loudly rather than feed a
/// wrong score into the population.
pub fn play_match<'a>(black: &'a mut dyn MovePolicy, white: &'a mut dyn MovePolicy) -> MatchOutcome {
    let mut session = GameSession::new();
    while session.state().is_in_progress() {
        assert!(
            session.plies() < PLY_LIMIT,
            "match exceeded {PLY_LIMIT} plies without terminating"
        );
        let player = session.current_player();
        let policy = match player {
            Player::Black => &mut *black,
            Player::White => &mut *white,
        };
        match policy.choose_move(session.board(), player) {
            Some(pos) => session
                .play_move(pos)
                .expect("policy returned an illegal move"),
            None => session
                .pass()
                .expect("policy passed while moves were available"),
        }
    }
    MatchOutcome {
        outcome: session.outcome().expect("terminal session has an outcome"),
        plies: session.plies(),
    }
}

#[cfg(test)]
mod tests {
    use evothello_engine::CELL_COUNT;
    use evothello_network::{ActivationPair, Network, WeightInit};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use crate::{
        encoding::INPUT_SIZE,
        policy::{NetworkPolicy, RandomPolicy},
    };

    use super::*;

    #[test]
    fn test_mixed_policy_match_reaches_terminal() {
        // Black and white are different policy types behind the trait
        // object, as in exploration-mode training.
        let mut rng = Pcg64Mcg::seed_from_u64(31);
        let nn = Network::random(
            INPUT_SIZE,
            8,
            CELL_COUNT,
            ActivationPair::SigmoidSigmoid,
            WeightInit::Centered,
            &mut rng,
        );
        let mut black = NetworkPolicy::new(&nn).unwrap();
        let mut white = RandomPolicy::new(Pcg64Mcg::seed_from_u64(32));
        let result = play_match(&mut black, &mut white);
        assert!(result.plies <= PLY_LIMIT);
        assert!(result.outcome.black + result.outcome.white <= CELL_COUNT);
    }

    #[test]
    fn test_random_match_reaches_terminal_and_counts_sum() {
        for seed in 0..20 {
            let mut black = RandomPolicy::new(Pcg64Mcg::seed_from_u64(seed));
            let mut white = RandomPolicy::new(Pcg64Mcg::seed_from_u64(seed + 1000));
            let result = play_match(&mut black, &mut white);
            assert!(result.plies <= PLY_LIMIT);
            assert!(result.outcome.black + result.outcome.white <= CELL_COUNT);
        }
    }

    #[test]
    fn test_score_deltas_are_zero_sum() {
        let mut black = RandomPolicy::new(Pcg64Mcg::seed_from_u64(9));
        let mut white = RandomPolicy::new(Pcg64Mcg::seed_from_u64(10));
        let result = play_match(&mut black, &mut white);
        let (b, w) = result.score_deltas();
        assert_eq!(b + w, 0.0);
        match result.outcome.winner() {
            Some(Player::Black) => assert!(b > 0.0),
            Some(Player::White) => assert!(w > 0.0),
            None => assert_eq!(b, 0.0),
        }
    }

    #[test]
    fn test_draw_moves_no_score() {
        let outcome = MatchOutcome {
            outcome: Outcome { black: 32, white: 32 },
            plies: 60,
        };
        assert_eq!(outcome.score_deltas(), (0.0, 0.0));
    }

    #[test]
    fn test_winner_gains_its_disc_count() {
        let outcome = MatchOutcome {
            outcome: Outcome { black: 40, white: 24 },
            plies: 60,
        };
        assert_eq!(outcome.score_deltas(), (40.0, -40.0));
        let outcome = MatchOutcome {
            outcome: Outcome { black: 10, white: 54 },
            plies: 60,
        };
        assert_eq!(outcome.score_deltas(), (-54.0, 54.0));
    }
}
