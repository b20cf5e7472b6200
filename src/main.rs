// src/main.rs

use clap::{Parser, ValueEnum};
use rust_chess_engine::config::{self, PROFILES_DIR};
use rust_chess_engine::uci::{self, info_line, UciSession};
use rust_chess_engine::{format_move, Engine, SearchAlgorithm, SearchConfig, SearchPosition};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{info, Level};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    AlphaBeta,
    Mcts,
}

impl From<Algorithm> for SearchAlgorithm {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::AlphaBeta => SearchAlgorithm::AlphaBeta,
            Algorithm::Mcts => SearchAlgorithm::Mcts,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Position to analyse
    #[arg(long, default_value = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")]
    fen: String,

    /// Maximum search depth in plies
    #[arg(long)]
    depth: Option<u8>,

    /// Time limit in seconds
    #[arg(long)]
    time: Option<f64>,

    /// Search threads; 0 uses every core
    #[arg(long)]
    threads: Option<usize>,

    /// Transposition table capacity in entries
    #[arg(long)]
    hash: Option<usize>,

    #[arg(long, value_enum)]
    algorithm: Option<Algorithm>,

    /// Load settings from a saved profile before applying other flags
    #[arg(long)]
    profile: Option<String>,

    /// Save the resulting settings under this profile name
    #[arg(long)]
    save_profile: Option<String>,

    /// List saved profiles and exit
    #[arg(long)]
    list_profiles: bool,

    #[arg(long, default_value = PROFILES_DIR)]
    profiles_dir: PathBuf,

    /// Speak UCI on stdin/stdout instead of analysing one position
    #[arg(long)]
    uci: bool,

    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn search_config(&self) -> Result<SearchConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.profile {
            Some(name) => config::load_profile(&self.profiles_dir, name)?,
            None => SearchConfig::default(),
        };
        if let Some(depth) = self.depth {
            config.max_depth = depth;
        }
        if let Some(time) = self.time {
            config.max_time_seconds = time;
        }
        if let Some(threads) = self.threads {
            config.num_threads = threads;
        }
        if let Some(hash) = self.hash {
            config.transposition_table_capacity = hash;
        }
        if let Some(algorithm) = self.algorithm {
            config.search_algorithm = algorithm.into();
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // stdout belongs to the UCI protocol.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();
    std::panic::set_hook(Box::new(tracing_panic::panic_hook));
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.list_profiles {
        for name in config::get_profiles(&args.profiles_dir)? {
            println!("{}", name);
        }
        return Ok(());
    }

    let config = args.search_config()?;
    if let Some(name) = &args.save_profile {
        config::save_profile(&args.profiles_dir, name, &config)?;
        info!(profile = %name, dir = %args.profiles_dir.display(), "profile saved");
    }

    if args.uci {
        let mut session = UciSession::new(config)?;
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        uci::run(&mut session, stdin.lock(), &mut stdout)?;
        return Ok(());
    }

    let root = SearchPosition::from_fen(&args.fen)?;
    let mut engine = Engine::new(config)?;
    let mut stdout = io::stdout();
    let outcome = engine.find_best_move_with(&root, &mut |progress| {
        let _ = writeln!(stdout, "{}", info_line(progress));
    });
    match outcome.best_move {
        Some(best) => println!("bestmove {}", format_move(best)),
        None => println!("bestmove 0000"),
    }
    Ok(())
}
