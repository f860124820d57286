use std::path::PathBuf;

use anyhow::Context as _;
use evothello_agent::{MovePolicy, NetworkPolicy, RandomPolicy};
use evothello_engine::{GameSession, PLY_LIMIT, Player};
use evothello_network::Network;
use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Trained model playing black
    #[arg(long)]
    model: PathBuf,
    /// Second model playing white; white plays random moves when omitted
    #[arg(long)]
    opponent: Option<PathBuf>,
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: usize,
    /// Seed for the random opponent
    #[arg(long)]
    seed: Option<u64>,
    /// Print the final board of every game
    #[arg(long)]
    show_board: bool,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let black_net = load_network(&arg.model)?;
    let white_net = arg.opponent.as_deref().map(load_network).transpose()?;
    let mut rng = match arg.seed {
        Some(seed) => Pcg64Mcg::seed_from_u64(seed),
        None => Pcg64Mcg::from_os_rng(),
    };

    let mut black_wins = 0_usize;
    let mut white_wins = 0_usize;
    let mut draws = 0_usize;
    for game in 0..arg.games {
        let mut black = NetworkPolicy::new(&black_net)?;
        let session = match &white_net {
            Some(net) => {
                let mut white = NetworkPolicy::new(net)?;
                play_session(&mut black, &mut white)
            }
            None => {
                let mut white = RandomPolicy::new(&mut rng);
                play_session(&mut black, &mut white)
            }
        };
        let outcome = session.outcome().expect("finished game has an outcome");
        let verdict = match outcome.winner() {
            Some(Player::Black) => {
                black_wins += 1;
                "black wins"
            }
            Some(Player::White) => {
                white_wins += 1;
                "white wins"
            }
            None => {
                draws += 1;
                "draw"
            }
        };
        println!(
            "Game {game}: black {} - white {} ({verdict}, {} plies)",
            outcome.black,
            outcome.white,
            session.plies()
        );
        if arg.show_board {
            println!("{}", session.board());
        }
    }
    println!("Total: black {black_wins}, white {white_wins}, draws {draws}");

    Ok(())
}

fn load_network(path: &std::path::Path) -> anyhow::Result<Network> {
    let model = util::read_model_file(path)?;
    Network::from_snapshot(model.network)
        .with_context(|| format!("Invalid network in model file: {}", path.display()))
}

/// Plays one game to completion, keeping the session for display.
fn play_session<'a>(black: &'a mut dyn MovePolicy, white: &'a mut dyn MovePolicy) -> GameSession {
    let mut session = GameSession::new();
    while session.state().is_in_progress() {
        assert!(session.plies() < PLY_LIMIT, "game exceeded the ply bound");
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
    session
}
