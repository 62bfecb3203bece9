// =============================================================================
// aggregator.rs — THE SCOUTING NETWORK DISPATCHER
// =============================================================================
//
// This is the part of the program that earns its salary. One worker task per
// club, each running the same two-step pipeline: fetch the page, extract the
// players. The interesting bits are around the edges:
//
// * Admission gate. A tokio semaphore bounds how many pipelines are in
//   flight at once. Permits are acquired BEFORE a worker spawns and ride
//   along inside the task, so RAII releases them on every exit path:
//   success, fetch failure, or a page full of nobodies.
//
// * Handoff. Workers push accepted players into a bounded crossbeam channel.
//   Exactly one collector task drains it. Workers never touch the shared
//   collection and the collector never touches the network; the channel is
//   the only shared mutable state in the run.
//
// * Completion protocol, in order: (1) join every worker, (2) drop the last
//   Sender, (3) the collector drains to Disconnected and returns. crossbeam
//   only reports Disconnected once the channel is empty AND senderless, so
//   a player handed off by a finishing worker cannot lose a race with the
//   collector shutting down. Every accepted player lands exactly once.
//
// A club that fails contributes nothing, affects nobody, and gets a warning
// in the log. The run itself cannot fail; the worst squad page in England
// cannot take down the other twenty-three.
// =============================================================================

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use futures::future::join_all;
use portable_atomic::{AtomicU64, Ordering};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::extractor;
use crate::fetcher::PageFetcher;
use crate::models::{Club, Player, RunReport};

/// Comfortably more players than an entire division produces, so workers
/// never block on a full channel in practice.
const CHANNEL_CAPACITY: usize = 1024;

/// How long the collector naps when the channel is momentarily empty.
const COLLECTOR_IDLE: Duration = Duration::from_millis(25);

/// Lock-free run counters, shared across workers. Same shape as the final
/// report but live, in case anyone is tailing the logs mid-run.
struct ScoutStats {
    clubs_scanned: AtomicU64,
    clubs_failed: AtomicU64,
    players_found: AtomicU64,
}

impl ScoutStats {
    fn new() -> Self {
        Self {
            clubs_scanned: AtomicU64::new(0),
            clubs_failed: AtomicU64::new(0),
            players_found: AtomicU64::new(0),
        }
    }
}

/// Run the full scouting batch: every club in the catalog, bounded
/// concurrency, one report at the end. This function does not fail;
/// individual clubs do, quietly, into the log.
pub async fn run(clubs: Vec<Club>, fetcher: Arc<dyn PageFetcher>, config: &Config) -> RunReport {
    let started_at = Utc::now();
    let clock = Instant::now();
    let stats = Arc::new(ScoutStats::new());
    let total_clubs = clubs.len();

    info!(
        clubs = total_clubs,
        concurrency = config.concurrency,
        min_potential = config.min_potential,
        min_growth = config.min_growth,
        "🔭 Scouting network deploying"
    );

    let (player_tx, player_rx) = bounded::<Player>(CHANNEL_CAPACITY);

    // Exactly one collector. Not two. One collector is a design;
    // two collectors is a race with extra steps.
    let collector = tokio::spawn(collect(player_rx));

    let gate = Arc::new(Semaphore::new(config.concurrency.max(1)));
    let mut workers = Vec::with_capacity(total_clubs);
    let min_potential = config.min_potential;
    let min_growth = config.min_growth;

    for club in clubs {
        // Acquire before spawn: the gate bounds in-flight pipelines, not
        // queued intentions. We never close the semaphore, so this cannot
        // actually fail.
        let permit = gate
            .clone()
            .acquire_owned()
            .await
            .expect("admission gate is never closed");

        let tx = player_tx.clone();
        let fetcher = Arc::clone(&fetcher);
        let stats = Arc::clone(&stats);

        workers.push(tokio::spawn(async move {
            // Held for the whole pipeline, released by drop on any exit path.
            let _permit = permit;
            scout_club(club, fetcher.as_ref(), tx, &stats, min_potential, min_growth).await;
        }));
    }

    // Phase one: every worker joins. Each worker drops its Sender clone as
    // it ends; dropping ours here means the collector's Disconnected can
    // only arrive after all producers are done.
    drop(player_tx);
    join_all(workers).await;

    // Phase two: the collector drains whatever is still buffered and hands
    // back the roster.
    let players = match collector.await {
        Ok(players) => players,
        Err(e) => {
            // A panicking collector would mean a bug in a 15-line loop.
            // Still: report an empty roster rather than poisoning the run.
            error!(error = %e, "collector task panicked — reporting an empty roster");
            Vec::new()
        }
    };

    let report = RunReport {
        players,
        clubs_scanned: stats.clubs_scanned.load(Ordering::Relaxed),
        clubs_failed: stats.clubs_failed.load(Ordering::Relaxed),
        started_at,
        elapsed: clock.elapsed(),
    };

    info!(
        found = report.found(),
        handed_off = stats.players_found.load(Ordering::Relaxed),
        clubs_scanned = report.clubs_scanned,
        clubs_failed = report.clubs_failed,
        elapsed = ?report.elapsed,
        "🏁 Scouting network recalled"
    );

    report
}

/// One club's pipeline: fetch, extract, hand off. Errors stop this club and
/// this club only.
async fn scout_club(
    club: Club,
    fetcher: &dyn PageFetcher,
    tx: Sender<Player>,
    stats: &ScoutStats,
    min_potential: i32,
    min_growth: i32,
) {
    let html = match fetcher.fetch(&club).await {
        Ok(html) => html,
        Err(e) => {
            stats.clubs_failed.fetch_add(1, Ordering::Relaxed);
            warn!(club = %club, error = %e, "fetch failed — this club scouts itself today");
            return;
        }
    };

    stats.clubs_scanned.fetch_add(1, Ordering::Relaxed);

    let players = extractor::extract_players(&club.name, &html, min_potential, min_growth);
    if players.is_empty() {
        debug!(club = %club.name, "page parsed, nobody worth a phone call");
        return;
    }

    let found = players.len() as u64;
    for player in players {
        // Bounded send: blocks only if the channel is full, which at this
        // capacity means something upstream has gone very wrong. A send
        // error means the collector is gone, which cannot happen while any
        // worker still holds a Sender, but we log rather than assume.
        if let Err(e) = tx.send(player) {
            error!(club = %club.name, error = %e, "collector hung up mid-handoff");
            return;
        }
    }

    stats.players_found.fetch_add(found, Ordering::Relaxed);
    info!(club = %club.name, found, "🎯 wonderkids spotted");
}

/// The one and only collector: drain the channel into the roster until every
/// Sender is gone and the buffer is empty. try_recv + nap instead of a
/// blocking recv, because parking an executor thread is rude.
async fn collect(rx: Receiver<Player>) -> Vec<Player> {
    let mut roster = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(player) => {
                debug!(profile = %player.profile, team = %player.team, "player collected");
                roster.push(player);
            }
            Err(TryRecvError::Empty) => tokio::time::sleep(COLLECTOR_IDLE).await,
            // Empty AND senderless: every handed-off player is in the roster.
            Err(TryRecvError::Disconnected) => break,
        }
    }
    roster
}
