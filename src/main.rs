use std::io::{self, Read, Write};
use std::os::fd::AsRawFd;

use anyhow::{Context, Result};
use clap::Parser;
use core_2048::{
    config::{DEFAULT_SIZE, DEFAULT_TARGET},
    BoardEngine, Direction, EngineConfig, SpawnPolicy,
};
use env_logger::Env;
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    input::{Command, KeyDecoder},
    render::{Message, RawMode},
};

mod input;
mod render;

#[derive(Parser)]
#[command(name = "term-2048", about = "The 2048 sliding tile puzzle in your terminal", version)]
struct Cli {
    /// Number of rows and columns on the board
    #[arg(short, long, default_value_t = DEFAULT_SIZE)]
    size: usize,

    /// Tile value that wins the game
    #[arg(short, long, default_value_t = DEFAULT_TARGET)]
    target: u64,

    /// Chance that a new tile is a 4 instead of a 2
    #[arg(long, default_value_t = SpawnPolicy::default().four_probability)]
    four_chance: f64,

    /// Seed for tile placement, to replay a game
    #[arg(long)]
    seed: Option<u64>,

    /// Let a random player make the moves
    #[arg(short, long)]
    random: bool,
}

fn play_interactive<R: Rng>(
    out: &mut impl Write,
    input: &mut (impl AsRawFd + Read),
    engine: &mut BoardEngine<R>,
) -> Result<()> {
    let _raw_mode = RawMode::enable(&*input, out).context("stdin is not a terminal")?;
    let mut decoder = KeyDecoder::new()?;

    let mut buf = [0u8; 128];
    let mut message = if engine.status().is_terminal() {
        Message::for_status(engine.status(), engine.config().target)
    } else {
        Message::NewGame
    };

    render::draw_board(out, engine, message)?;

    'game: loop {
        let len = input.read(&mut buf)?;

        // A timed-out read means the user paused, so a held escape was the Escape key.
        let commands = if len == 0 {
            decoder.flush()
        } else {
            decoder.feed(&buf[..len])
        };

        for command in commands {
            match command {
                Command::Move(direction) => {
                    if !engine.make_move(direction).changed {
                        continue;
                    }
                    message = Message::for_status(engine.status(), engine.config().target);
                }
                Command::Restart => {
                    engine.restart();
                    message = Message::NewGame;
                }
                Command::Quit => break 'game,
            }

            render::redraw_board(out, engine, message)?;
        }
    }

    info!("quit with score {}", engine.score());

    Ok(())
}

fn play_random<R: Rng>(
    out: &mut impl Write,
    rng: &mut impl Rng,
    engine: &mut BoardEngine<R>,
) -> Result<()> {
    render::draw_board(out, engine, Message::NewGame)?;

    loop {
        let legal = engine.legal_moves();
        let count = legal.iter().filter(|&&legal| legal).count();

        if count == 0 {
            break;
        }

        let Some(direction) = Direction::iter()
            .zip(legal)
            .filter_map(|(direction, legal)| legal.then_some(direction))
            .nth(rng.gen_range(0..count))
        else {
            break;
        };

        engine.make_move(direction);

        let message = Message::for_status(engine.status(), engine.config().target);
        render::redraw_board(out, engine, message)?;
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let config = EngineConfig {
        size: cli.size,
        target: cli.target,
        spawn: SpawnPolicy {
            four_probability: cli.four_chance,
        },
    };

    let mut rng = match cli.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut player_rng = ChaCha8Rng::from_rng(&mut rng).context("seeding random player")?;

    let mut engine = BoardEngine::new(config, rng).context("invalid game settings")?;

    let mut stdout = io::stdout().lock();

    if cli.random {
        play_random(&mut stdout, &mut player_rng, &mut engine)?;
    } else {
        let mut stdin = io::stdin().lock();
        play_interactive(&mut stdout, &mut stdin, &mut engine)?;
    }

    writeln!(
        stdout,
        "Final score: {}, highest tile: {}",
        engine.score(),
        engine.highest_tile()
    )?;

    Ok(())
}
