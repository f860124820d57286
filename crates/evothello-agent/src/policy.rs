use evothello_engine::{Board, CELL_COUNT, Player, Position};
use evothello_network::Network;
use rand::{Rng, seq::IndexedRandom as _};

use crate::{
    PolicyShapeError,
    encoding::{INPUT_SIZE, encode_board},
};

/// Something that can pick a move for one side of a match.
///
/// Returning `None` means pass; implementations must only pass when the
/// legal set is empty, and must only return legal moves.
pub trait MovePolicy {
    fn choose_move(&mut self, board: &Board, player: Player) -> Option<Position>;
}

/// Network-driven policy: evaluate the board once, then take the legal
/// move whose output activation is strictly greatest.
///
/// Ties break toward the lowest-indexed legal move; the scan order is
/// stable, so identical networks always choose identical moves.
#[derive(Debug, Clone, Copy)]
pub struct NetworkPolicy<'a> {
    network: &'a Network,
}

impl<'a> NetworkPolicy<'a> {
    /// Wraps a network whose input layer matches the board encoding and
    /// whose output layer covers the whole board. A mismatched shape is a
    /// configuration error surfaced here, never a mid-match panic.
    pub fn new(network: &'a Network) -> Result<Self, PolicyShapeError> {
        if network.input_size() != INPUT_SIZE {
            return Err(PolicyShapeError::InputWidth {
                got: network.input_size(),
            });
        }
        if network.output_size() < CELL_COUNT {
            return Err(PolicyShapeError::OutputWidth {
                got: network.output_size(),
            });
        }
        Ok(Self { network })
    }
}

impl MovePolicy for NetworkPolicy<'_> {
    fn choose_move(&mut self, board: &Board, player: Player) -> Option<Position> {
        let legal = board.legal_moves(player);
        let first = *legal.first()?;
        let output = self.network.forward(&encode_board(board, player));
        let mut best = first;
        for &pos in &legal[1..] {
            if output[pos.index()] > output[best.index()] {
                best = pos;
            }
        }
        Some(best)
    }
}

/// Exploration policy: a uniform draw from the legal set, bypassing any
/// network. Used to diversify a training pool, never for evaluation.
#[derive(Debug)]
pub struct RandomPolicy<R> {
    rng: R,
}

impl<R> RandomPolicy<R>
where
    R: Rng,
{
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R> MovePolicy for RandomPolicy<R>
where
    R: Rng,
{
    fn choose_move(&mut self, board: &Board, player: Player) -> Option<Position> {
        board.legal_moves(player).choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use evothello_network::{ActivationPair, WeightInit};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use crate::encoding::INPUT_SIZE;

    use super::*;

    fn test_network(rng: &mut Pcg64Mcg) -> Network {
        Network::random(
            INPUT_SIZE,
            16,
            CELL_COUNT,
            ActivationPair::SigmoidSigmoid,
            WeightInit::Centered,
            rng,
        )
    }

    #[test]
    fn test_network_policy_rejects_narrow_output() {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let narrow = Network::random(
            INPUT_SIZE,
            4,
            CELL_COUNT - 1,
            ActivationPair::SigmoidSigmoid,
            WeightInit::Unit,
            &mut rng,
        );
        assert_eq!(
            NetworkPolicy::new(&narrow).unwrap_err(),
            PolicyShapeError::OutputWidth { got: CELL_COUNT - 1 }
        );
    }

    #[test]
    fn test_network_policy_rejects_mismatched_input_width() {
        // An internally consistent network with the wrong input width
        // must be rejected up front, not panic on the first forward pass.
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let wrong = Network::random(
            10,
            4,
            CELL_COUNT,
            ActivationPair::SigmoidSigmoid,
            WeightInit::Unit,
            &mut rng,
        );
        assert_eq!(
            NetworkPolicy::new(&wrong).unwrap_err(),
            PolicyShapeError::InputWidth { got: 10 }
        );
    }

    #[test]
    fn test_network_policy_returns_legal_moves() {
        let mut rng = Pcg64Mcg::seed_from_u64(2);
        let nn = test_network(&mut rng);
        let mut policy = NetworkPolicy::new(&nn).unwrap();
        let board = Board::new();
        for player in [Player::Black, Player::White] {
            let chosen = policy.choose_move(&board, player).unwrap();
            assert!(board.legal_moves(player).contains(&chosen));
        }
    }

    #[test]
    fn test_network_policy_is_deterministic() {
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        let nn = test_network(&mut rng);
        let mut policy = NetworkPolicy::new(&nn).unwrap();
        let board = Board::new();
        let a = policy.choose_move(&board, Player::Black);
        let b = policy.choose_move(&board, Player::Black);
        assert_eq!(a, b);
    }

    #[test]
    fn test_tie_breaks_to_lowest_index() {
        // A constant-output network ties on every move; the lowest-indexed
        // legal move must win.
        let nn = Network::from_parts(
            INPUT_SIZE,
            1,
            CELL_COUNT,
            ActivationPair::SigmoidSigmoid,
            vec![0.0; INPUT_SIZE],
            vec![0.0; CELL_COUNT],
            vec![0.0],
            vec![0.0; CELL_COUNT],
        )
        .unwrap();
        let mut policy = NetworkPolicy::new(&nn).unwrap();
        let board = Board::new();
        let chosen = policy.choose_move(&board, Player::Black).unwrap();
        let lowest = *board.legal_moves(Player::Black).first().unwrap();
        assert_eq!(chosen, lowest);
    }

    #[test]
    fn test_policies_pass_when_no_moves() {
        // A board with no legal move for Black anywhere.
        let board = Board::from_ascii(
            r"
            ........
            ........
            ........
            ...BB...
            ...BB...
            ........
            ........
            ........
            ",
        );
        assert!(board.legal_moves(Player::Black).is_empty());
        let mut rng = Pcg64Mcg::seed_from_u64(4);
        let nn = test_network(&mut rng);
        let mut network_policy = NetworkPolicy::new(&nn).unwrap();
        assert_eq!(network_policy.choose_move(&board, Player::Black), None);
        let mut random_policy = RandomPolicy::new(Pcg64Mcg::seed_from_u64(5));
        assert_eq!(random_policy.choose_move(&board, Player::Black), None);
    }

    #[test]
    fn test_random_policy_stays_legal() {
        let board = Board::new();
        let mut policy = RandomPolicy::new(Pcg64Mcg::seed_from_u64(6));
        for _ in 0..32 {
            let chosen = policy.choose_move(&board, Player::White).unwrap();
            assert!(board.legal_moves(Player::White).contains(&chosen));
        }
    }
}
