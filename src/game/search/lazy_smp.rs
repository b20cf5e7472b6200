// src/game/search/lazy_smp.rs

use crossbeam_channel::unbounded;
use crossbeam_utils::thread;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shakmaty::Position;
use std::sync::atomic::Ordering;
use tracing::{debug, warn};

use super::alpha_beta::{SearchContext, SharedTables};
use super::iterative_deepening::deepen;
use super::{SearchConfig, SearchOutcome};
use crate::game::SearchPosition;

/// Lazy SMP: helper threads run the same iterative deepening as the main
/// thread and only communicate through the shared transposition table and
/// history. Odd helpers skip the first depth and every helper orders quiet
/// moves with a little seeded noise, so they tend to fill different parts
/// of the table.
///
/// Only the main thread's result is used. When it finishes it raises the stop
/// flag and the helpers abandon their current iteration.
pub fn search(
    root: &SearchPosition,
    config: &SearchConfig,
    shared: SharedTables,
    threads: usize,
    report: &mut dyn FnMut(&SearchOutcome),
) -> SearchOutcome {
    let (node_tx, node_rx) = unbounded::<u64>();
    let mut main_outcome = None;

    let scope_result = thread::scope(|s| {
        for id in 1..threads {
            let node_tx = node_tx.clone();
            let mut pos = root.clone();
            s.spawn(move |_| {
                let rng = StdRng::seed_from_u64(id as u64);
                let mut ctx = SearchContext::helper(config, shared, rng);
                let start_depth = 1 + (id % 2) as u8;
                let outcome = deepen(&mut ctx, &mut pos, start_depth, &mut |_| {});
                debug!(helper = id, depth = outcome.depth, nodes = ctx.nodes, "helper finished");
                let _ = node_tx.send(ctx.nodes);
            });
        }

        let mut ctx = SearchContext::new(config, shared);
        let mut pos = root.clone();
        let outcome = deepen(&mut ctx, &mut pos, 1, report);
        shared.stop.store(true, Ordering::Relaxed);
        main_outcome = Some(outcome);
    });
    drop(node_tx);

    if scope_result.is_err() {
        warn!("a helper search thread panicked");
    }

    let helper_nodes: u64 = node_rx.iter().sum();
    let mut outcome = main_outcome.unwrap_or_else(|| SearchOutcome {
        best_move: root.chess().legal_moves().first().copied(),
        ..Default::default()
    });
    outcome.nodes += helper_nodes;
    outcome
}
