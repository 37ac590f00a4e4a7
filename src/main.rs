//! Line-oriented command interface to the library: sets up positions, plays
//! and navigates moves and runs perft. Reads one command per line from stdin
//! and writes responses to stdout, logs go to stderr.

use std::io::{self, BufRead, Write};

use clap::Parser;
use itertools::Itertools;
use tabiya::chess::perft;
use tabiya::{Game, Position};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Chess position and move legality toolkit.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Config {
    /// Starting position of the game in FEN, standard starting position if
    /// omitted.
    #[arg(long)]
    fen: Option<String>,
    /// Log verbosity used when `RUST_LOG` is not set.
    #[arg(long, default_value = "warn")]
    log_level: String,
    /// Print build information and exit.
    #[arg(long)]
    info: bool,
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if config.info {
        tabiya::print_engine_info();
        return Ok(());
    }

    let mut session = Session::new(tabiya::new_game(config.fen.as_deref())?);
    session.run(&mut io::stdin().lock(), &mut io::stdout().lock())
}

/// A game driven by text commands.
struct Session {
    game: Game,
}

impl Session {
    const fn new(game: Game) -> Self {
        Self { game }
    }

    /// Reads commands until `quit` or the end of input. Failed commands are
    /// reported as `error: <message>` and do not stop the loop.
    ///
    /// The supported commands are:
    ///     - position [startpos | fen <FEN>] [moves <move1> ... <move_i>]
    ///     - move <move1> ... <move_i>
    ///     - moves
    ///     - undo, redo
    ///     - claim
    ///     - state, fen, d, history
    ///     - perft <depth>, divide <depth>
    ///     - quit
    fn run(&mut self, input: &mut impl BufRead, output: &mut impl Write) -> anyhow::Result<()> {
        let mut line = String::new();
        loop {
            line.clear();
            // EOF reached.
            if input.read_line(&mut line)? == 0 {
                break;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            debug!(command = line.trim(), "received command");
            match tokens.as_slice() {
                ["quit", ..] => break,
                [] => {},
                [command, arguments @ ..] => {
                    if let Err(e) = self.execute(command, arguments, output) {
                        writeln!(output, "error: {e:#}")?;
                    }
                },
            }
            output.flush()?;
        }
        Ok(())
    }

    fn execute(
        &mut self,
        command: &str,
        arguments: &[&str],
        output: &mut impl Write,
    ) -> anyhow::Result<()> {
        match command {
            "position" => self.handle_position(arguments)?,
            "move" => {
                anyhow::ensure!(!arguments.is_empty(), "expected at least one move");
                // All moves are played or none of them.
                let mut game = self.game.clone();
                for notation in arguments {
                    let _ = game.make_move(notation)?;
                }
                self.game = game;
                writeln!(output, "{}", self.game.state())?;
            },
            "moves" => {
                let position = self.game.position();
                writeln!(
                    output,
                    "{}",
                    self.game
                        .legal_moves()
                        .iter()
                        .map(|legal| legal.to_san(position))
                        .join(" ")
                )?;
            },
            "undo" => writeln!(output, "{}", self.game.undo()?)?,
            "redo" => writeln!(output, "{}", self.game.redo()?)?,
            "claim" => writeln!(output, "{}", self.game.claim_draw()?)?,
            "state" => writeln!(output, "{}", self.game.state())?,
            "fen" => writeln!(output, "{}", self.game.to_fen())?,
            "d" => writeln!(output, "{:?}", self.game.position())?,
            "history" => writeln!(output, "{}", self.game.movetext())?,
            "perft" => {
                let depth = parse_depth(arguments)?;
                writeln!(output, "{}", perft::perft(self.game.position(), depth))?;
            },
            "divide" => {
                let depth = parse_depth(arguments)?;
                let split = perft::divide(self.game.position(), depth);
                for (root, nodes) in &split {
                    writeln!(output, "{root}: {nodes}")?;
                }
                writeln!(
                    output,
                    "total: {}",
                    split.iter().map(|(_, nodes)| nodes).sum::<u64>()
                )?;
            },
            _ => anyhow::bail!("unsupported command: {command}"),
        }
        Ok(())
    }

    fn handle_position(&mut self, arguments: &[&str]) -> anyhow::Result<()> {
        const FEN_SIZE: usize = 6;
        let (mut game, rest) = match arguments {
            ["startpos", rest @ ..] => (Game::new(), rest),
            ["fen", rest @ ..] => {
                anyhow::ensure!(
                    rest.len() >= FEN_SIZE,
                    "FEN consists of {FEN_SIZE} parts, got {}",
                    rest.len()
                );
                let (fen, rest) = rest.split_at(FEN_SIZE);
                (Game::from_position(Position::from_fen(&fen.join(" "))?), rest)
            },
            _ => anyhow::bail!(
                "expected position [startpos | fen <FEN>] [moves <move1> ... <move_i>]"
            ),
        };
        let moves = match rest {
            [] => rest,
            ["moves", moves @ ..] => moves,
            _ => anyhow::bail!("expected moves after the position, got {}", rest.join(" ")),
        };
        // Only replace the current game once the whole setup succeeded.
        for notation in moves {
            let _ = game.make_move(notation)?;
        }
        self.game = game;
        Ok(())
    }
}

fn parse_depth(arguments: &[&str]) -> anyhow::Result<u8> {
    match arguments {
        [depth] => Ok(depth.parse()?),
        _ => anyhow::bail!("expected a single depth argument"),
    }
}
