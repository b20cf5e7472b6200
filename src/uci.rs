// src/uci.rs

//! Universal Chess Interface front end.
//!
//! The loop is synchronous: `go` searches to completion before the next
//! command is read, so `stop` and `ponderhit` are accepted and ignored.

use shakmaty::{Chess, Position};
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{EngineError, PositionError};
use crate::game::search::time::TimeControl;
use crate::game::search::{Engine, SearchAlgorithm, SearchConfig, SearchOutcome};
use crate::game::{format_move, parse_move, SearchPosition};

const ENGINE_NAME: &str = concat!("rust-chess-engine ", env!("CARGO_PKG_VERSION"));
const ENGINE_AUTHOR: &str = "the rust-chess-engine developers";
/// Depth cap when the search is bounded by the clock instead.
const TIMED_MAX_DEPTH: u8 = 64;
/// Time limit for `go depth`, `go nodes` and `go infinite`.
const UNTIMED_SECONDS: f64 = 24.0 * 60.0 * 60.0;
const MIN_MOVE_SECONDS: f64 = 0.01;
/// Bytes per transposition table slot, for converting the `Hash` option.
const TT_SLOT_BYTES: usize = 16;

/// Search limits of a `go` command. Times are in milliseconds on the wire.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GoParams {
    pub depth: Option<u8>,
    pub nodes: Option<u64>,
    pub movetime: Option<Duration>,
    pub wtime: Option<Duration>,
    pub btime: Option<Duration>,
    pub winc: Option<Duration>,
    pub binc: Option<Duration>,
    pub movestogo: Option<u32>,
    pub infinite: bool,
}

fn millis(token: Option<&&str>) -> Option<Duration> {
    // GUIs occasionally send negative clocks when a flag is about to fall.
    token
        .and_then(|t| t.parse::<i64>().ok())
        .map(|ms| Duration::from_millis(ms.max(0) as u64))
}

/// Parses the arguments of a `go` command. Unknown tokens are skipped.
pub fn parse_go(line: &str) -> GoParams {
    let mut params = GoParams::default();
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            "depth" => {
                i += 1;
                params.depth = tokens.get(i).and_then(|t| t.parse().ok());
            }
            "nodes" => {
                i += 1;
                params.nodes = tokens.get(i).and_then(|t| t.parse().ok());
            }
            "movetime" => {
                i += 1;
                params.movetime = millis(tokens.get(i));
            }
            "wtime" => {
                i += 1;
                params.wtime = millis(tokens.get(i));
            }
            "btime" => {
                i += 1;
                params.btime = millis(tokens.get(i));
            }
            "winc" => {
                i += 1;
                params.winc = millis(tokens.get(i));
            }
            "binc" => {
                i += 1;
                params.binc = millis(tokens.get(i));
            }
            "movestogo" => {
                i += 1;
                params.movestogo = tokens.get(i).and_then(|t| t.parse().ok());
            }
            "infinite" => params.infinite = true,
            _ => {}
        }
        i += 1;
    }
    params
}

/// Parses `position [startpos | fen <fen>] [moves <uci>...]`.
///
/// Game moves are played into the position so that the search sees them as
/// repetition history.
pub fn parse_position(line: &str) -> Result<SearchPosition, EngineError> {
    let mut tokens = line.split_whitespace().peekable();
    if tokens.peek() == Some(&"position") {
        tokens.next();
    }

    let mut pos = match tokens.next() {
        Some("startpos") => SearchPosition::new(Chess::default()),
        Some("fen") => {
            let mut fen_parts = Vec::new();
            while let Some(part) = tokens.next_if(|t| *t != "moves") {
                fen_parts.push(part);
            }
            SearchPosition::from_fen(&fen_parts.join(" "))?
        }
        _ => {
            return Err(PositionError::InvalidFen {
                fen: line.to_string(),
                reason: "expected 'startpos' or 'fen'".to_string(),
            }
            .into())
        }
    };

    if tokens.next() == Some("moves") {
        for uci in tokens {
            let m = parse_move(pos.chess(), uci)?;
            pos.play(m);
        }
    }
    Ok(pos)
}

/// Renders one `info` line for a finished iteration.
pub fn info_line(outcome: &SearchOutcome) -> String {
    let score = match outcome.mate_in() {
        Some(moves) => format!("mate {}", moves),
        None => format!("cp {}", outcome.score),
    };
    let millis = outcome.elapsed.as_millis() as u64;
    let nps = outcome.nodes * 1000 / millis.max(1);
    let mut line = format!(
        "info depth {} seldepth {} score {} nodes {} nps {} time {}",
        outcome.depth, outcome.seldepth, score, outcome.nodes, nps, millis
    );
    if !outcome.pv.is_empty() {
        let pv: Vec<String> = outcome.pv.iter().map(|m| format_move(*m)).collect();
        line.push_str(" pv ");
        line.push_str(&pv.join(" "));
    }
    line
}

pub struct UciSession {
    engine: Engine,
    base_config: SearchConfig,
    position: SearchPosition,
}

impl UciSession {
    pub fn new(config: SearchConfig) -> Result<Self, EngineError> {
        Ok(Self {
            engine: Engine::new(config.clone())?,
            base_config: config,
            position: SearchPosition::new(Chess::default()),
        })
    }

    pub fn position(&self) -> &SearchPosition {
        &self.position
    }

    /// Handles one line of input. Returns `true` on `quit`.
    pub fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        let Some(command) = trimmed.split_whitespace().next() else {
            return Ok(false);
        };
        debug!(command = trimmed, "uci command");

        match command {
            "uci" => {
                writeln!(out, "id name {}", ENGINE_NAME)?;
                writeln!(out, "id author {}", ENGINE_AUTHOR)?;
                writeln!(out, "option name Hash type spin default 16 min 1 max 4096")?;
                writeln!(out, "option name Threads type spin default 1 min 0 max 256")?;
                writeln!(
                    out,
                    "option name Algorithm type combo default AlphaBeta var AlphaBeta var Mcts"
                )?;
                writeln!(out, "uciok")?;
            }
            "isready" => writeln!(out, "readyok")?,
            "ucinewgame" => {
                self.position = SearchPosition::new(Chess::default());
                self.engine.new_game();
            }
            "setoption" => {
                if let Err(err) = self.handle_setoption(trimmed) {
                    warn!(%err, "setoption rejected");
                    writeln!(out, "info string setoption error: {}", err)?;
                }
            }
            "position" => match parse_position(trimmed) {
                Ok(pos) => self.position = pos,
                Err(err) => {
                    warn!(%err, "position rejected");
                    writeln!(out, "info string position error: {}", err)?;
                }
            },
            "go" => self.handle_go(&parse_go(trimmed), out)?,
            "stop" | "ponderhit" | "debug" | "register" => {}
            "quit" => return Ok(true),
            _ => debug!(command, "ignoring unknown command"),
        }
        Ok(false)
    }

    fn handle_setoption(&mut self, line: &str) -> Result<(), String> {
        let mut name = Vec::new();
        let mut value = Vec::new();
        let mut target = None;
        for token in line.split_whitespace().skip(1) {
            match token {
                "name" => target = Some(&mut name),
                "value" => target = Some(&mut value),
                _ => {
                    if let Some(words) = target.as_mut() {
                        words.push(token);
                    }
                }
            }
        }
        let name = name.join(" ");
        let value = value.join(" ");

        let mut config = self.base_config.clone();
        if name.eq_ignore_ascii_case("Hash") {
            let mb: usize = value
                .parse()
                .map_err(|_| format!("invalid Hash value '{}'", value))?;
            config.transposition_table_capacity = (mb.max(1) << 20) / TT_SLOT_BYTES;
        } else if name.eq_ignore_ascii_case("Threads") {
            config.num_threads = value
                .parse()
                .map_err(|_| format!("invalid Threads value '{}'", value))?;
        } else if name.eq_ignore_ascii_case("Algorithm") {
            config.search_algorithm = match value.to_ascii_lowercase().as_str() {
                "alphabeta" => SearchAlgorithm::AlphaBeta,
                "mcts" => SearchAlgorithm::Mcts,
                _ => return Err(format!("unknown Algorithm '{}'", value)),
            };
        } else {
            return Err(format!("unknown option '{}'", name));
        }

        self.engine
            .set_config(config.clone())
            .map_err(|e| e.to_string())?;
        self.base_config = config;
        Ok(())
    }

    /// The configuration for one `go`, derived from the session defaults.
    pub fn search_config(&self, params: &GoParams) -> SearchConfig {
        let mut config = self.base_config.clone();
        let white = self.position.chess().turn().is_white();
        let (clock, increment) = if white {
            (params.wtime, params.winc)
        } else {
            (params.btime, params.binc)
        };

        if let Some(movetime) = params.movetime {
            config.max_time_seconds = movetime.as_secs_f64().max(MIN_MOVE_SECONDS);
            config.max_depth = TIMED_MAX_DEPTH;
        } else if let Some(time_left) = clock {
            let control = TimeControl {
                time_left,
                increment: increment.unwrap_or_default(),
                moves_to_go: params.movestogo,
                moves_played: self.position.chess().fullmoves().get() - 1,
            };
            config.max_time_seconds = control.allocate().as_secs_f64().max(MIN_MOVE_SECONDS);
            config.max_depth = TIMED_MAX_DEPTH;
        } else if params.infinite || params.depth.is_some() || params.nodes.is_some() {
            config.max_time_seconds = UNTIMED_SECONDS;
            if params.infinite {
                config.max_depth = TIMED_MAX_DEPTH;
            }
        }

        if let Some(depth) = params.depth {
            config.max_depth = depth.max(1);
        }
        if let Some(nodes) = params.nodes {
            config.max_nodes = Some(nodes);
            config.mcts_simulations = nodes.clamp(1, u64::from(u32::MAX)) as u32;
        }
        config
    }

    fn handle_go(&mut self, params: &GoParams, out: &mut impl Write) -> io::Result<()> {
        let config = self.search_config(params);
        if let Err(err) = self.engine.set_config(config) {
            warn!(%err, "search limits rejected");
            writeln!(out, "info string go error: {}", err)?;
            writeln!(out, "bestmove 0000")?;
            return out.flush();
        }

        let mut write_error = None;
        let outcome = self.engine.find_best_move_with(&self.position, &mut |progress| {
            let written = writeln!(out, "{}", info_line(progress)).and_then(|_| out.flush());
            if let Err(err) = written {
                write_error.get_or_insert(err);
            }
        });
        if let Some(err) = write_error {
            return Err(err);
        }

        if let Some(hashfull) = self.engine.hashfull() {
            writeln!(out, "info hashfull {}", hashfull)?;
        }
        match outcome.best_move {
            Some(best) => {
                let best = format_move(best);
                info!(best_move = %best, score = outcome.score, depth = outcome.depth, "bestmove");
                match outcome.pv.get(1) {
                    Some(ponder) => writeln!(out, "bestmove {} ponder {}", best, format_move(*ponder))?,
                    None => writeln!(out, "bestmove {}", best)?,
                }
            }
            None => writeln!(out, "bestmove 0000")?,
        }

        // Later searches start from the session defaults again.
        if let Err(err) = self.engine.set_config(self.base_config.clone()) {
            warn!(%err, "could not restore session configuration");
        }
        out.flush()
    }
}

/// Reads commands from `input` until `quit` or end of input.
pub fn run(session: &mut UciSession, input: impl BufRead, out: &mut impl Write) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        let quit = session.handle_command(&line, out)?;
        out.flush()?;
        if quit {
            break;
        }
    }
    Ok(())
}
