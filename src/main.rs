// ██╗    ██╗ ██████╗ ███╗   ██╗██████╗ ███████╗██████╗ ██╗  ██╗██╗██████╗
// ██║    ██║██╔═══██╗████╗  ██║██╔══██╗██╔════╝██╔══██╗██║ ██╔╝██║██╔══██╗
// ██║ █╗ ██║██║   ██║██╔██╗ ██║██║  ██║█████╗  ██████╔╝█████╔╝ ██║██║  ██║
// ██║███╗██║██║   ██║██║╚██╗██║██║  ██║██╔══╝  ██╔══██╗██╔═██╗ ██║██║  ██║
// ╚███╔███╔╝╚██████╔╝██║ ╚████║██████╔╝███████╗██║  ██║██║  ██╗██║██████╔╝
//  ╚══╝╚══╝  ╚═════╝ ╚═╝  ╚═══╝╚═════╝ ╚══════╝╚═╝  ╚═╝╚═╝  ╚═╝╚═╝╚═════╝
//
// R A D A R
//
// The most overkill lower-league scouting operation ever conceived.
// Rust + Tokio + Crossbeam + jittered pacing + rotating disguises.
// All to find teenagers with big numbers on a football stats site.

mod aggregator;
mod config;
mod extractor;
mod fetcher;
mod models;
mod report;

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{club_catalog, Config};
use crate::fetcher::HttpFetcher;

fn print_banner() {
    let banner = r#"

    ╔══════════════════════════════════════════════════════════════════╗
    ║                                                                  ║
    ║   ██╗    ██╗ ██████╗ ███╗   ██╗██████╗ ███████╗██████╗          ║
    ║   ██║    ██║██╔═══██╗████╗  ██║██╔══██╗██╔════╝██╔══██╗         ║
    ║   ██║ █╗ ██║██║   ██║██╔██╗ ██║██║  ██║█████╗  ██████╔╝         ║
    ║   ██║███╗██║██║   ██║██║╚██╗██║██║  ██║██╔══╝  ██╔══██╗         ║
    ║   ╚███╔███╔╝╚██████╔╝██║ ╚████║██████╔╝███████╗██║  ██║         ║
    ║    ╚══╝╚══╝  ╚═════╝ ╚═╝  ╚═══╝╚═════╝ ╚══════╝╚═╝  ╚═╝         ║
    ║                                                                  ║
    ║             ⚽ WONDERKID RADAR — LEAGUE TWO EDITION ⚽           ║
    ║                                                                  ║
    ║   Sources:  24 squad pages, one shot each                        ║
    ║   Pacing:   jittered delays + rotating browser identities        ║
    ║   Handoff:  lock-free crossbeam channel, one collector           ║
    ║   Output:   one pretty JSON file of future superstars            ║
    ║                                                                  ║
    ║   "Sign them before Football Manager players do."                ║
    ║                                                                  ║
    ╚══════════════════════════════════════════════════════════════════╝

    "#;
    println!("{}", banner);
}

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_ansi(true)
        .init();

    print_banner();

    info!("⚽ WONDERKID RADAR initializing...");

    let config = Config::from_env();
    info!(
        min_potential = config.min_potential,
        min_growth = config.min_growth,
        concurrency = config.concurrency,
        output = %config.output_file,
        "✅ Configuration loaded"
    );

    let clubs = club_catalog();
    info!(clubs = clubs.len(), "✅ Club catalog loaded — the whole division is on notice");

    // The only fallible setup in the program. No HTTP client, no run.
    let fetcher = Arc::new(
        HttpFetcher::new(&config).context("failed to build the HTTP client")?,
    );
    info!("✅ Fetcher online — three disguises, zero retries");

    // One-shot batch: every club reports exactly once, then we go home.
    let run_report = aggregator::run(clubs, fetcher, &config).await;

    // Persistence failure is loud but never fatal: the summary below still
    // reflects everything we found in memory.
    if let Err(e) = report::write_report(&config.output_file, &run_report.players) {
        error!(error = %e, "failed to write the report file — summary below still stands");
    }

    info!("═══════════════════════════════════════════════════════");
    info!(
        "  🏁 Scouting completed in {:.1?} (kicked off {})",
        run_report.elapsed,
        run_report.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );
    info!(
        "  🎯 Found {} players with potential >= {} and growth >= {}",
        run_report.found(),
        config.min_potential,
        config.min_growth,
    );
    info!(
        "  📋 Clubs scanned: {} | failed: {}",
        run_report.clubs_scanned, run_report.clubs_failed,
    );
    info!("═══════════════════════════════════════════════════════");

    // Individual failures never fail the run. A fully dark radar can,
    // but only if you asked for that behavior.
    if config.fail_on_empty && run_report.clubs_scanned == 0 {
        anyhow::bail!("every fetch failed and WONDERKID_FAIL_ON_EMPTY is set");
    }

    Ok(())
}
