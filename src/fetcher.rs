// =============================================================================
// fetcher.rs — THE POLITE(ish) PAGE RETRIEVER
// =============================================================================
//
// One GET per squad page, dressed up to look like a human with a browser
// instead of a Rust binary with an agenda. Two tricks, both cheap:
//
// 1. Jittered pacing. Every fetch sleeps a random duration drawn from
//    [min_delay, max_delay) before touching the network. Each worker draws
//    independently from its own thread-local RNG; there is no global pacing
//    clock to serialize on, which would both bottleneck the pool and make
//    the traffic pattern MORE robotic, not less.
//
// 2. Identity rotation. Each request picks a User-Agent at random from a
//    small pool of real browser strings, plus the static content-negotiation
//    headers a real browser would send.
//
// No retries. A failed fetch means that club contributes zero players this
// run, gets a warning in the log, and life goes on. The site will still be
// there tomorrow. Probably.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::{header, StatusCode};
use tracing::debug;

use crate::config::Config;
use crate::models::Club;

/// Real browser identity strings. Three is enough to stop the traffic
/// looking like one very dedicated robot reading squad pages at 3 AM.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
];

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Everything that can go wrong fetching one squad page. Per-club and
/// non-fatal by design: the aggregator logs it, counts it, and moves on.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request never completed: DNS, TLS, timeout, cable dug up by a
    /// backhoe. reqwest knows the details.
    #[error("request to {club} failed: {source}")]
    Request {
        club: String,
        source: reqwest::Error,
    },

    /// The site answered, but not with a page we want.
    #[error("{club} answered with HTTP {status}")]
    Status { club: String, status: StatusCode },

    /// The status was fine and then the body fell over halfway through.
    #[error("reading body from {club} failed: {source}")]
    Body {
        club: String,
        source: reqwest::Error,
    },
}

/// The fetch seam. The aggregator only ever sees this trait, which means
/// tests get to hand it a stub that serves canned squad pages without a
/// single packet leaving the building.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one club's squad page as raw markup, or explain why not.
    async fn fetch(&self, club: &Club) -> Result<String, FetchError>;
}

/// The production fetcher: one shared reqwest client (connection pooling is
/// free, we take it), jittered pacing, rotating identities.
pub struct HttpFetcher {
    client: reqwest::Client,
    min_delay: Duration,
    max_delay: Duration,
}

impl HttpFetcher {
    /// Build the fetcher. This is the only fallible setup in the whole run:
    /// if we can't construct an HTTP client, there is no run.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            client,
            min_delay: config.min_delay,
            max_delay: config.max_delay,
        })
    }

    /// Draw this request's pacing delay: uniform in [min, max). A degenerate
    /// configuration (max <= min) collapses to the fixed min delay.
    fn pick_delay(&self) -> Duration {
        if self.max_delay > self.min_delay {
            let span_ms = (self.max_delay - self.min_delay).as_millis() as u64;
            self.min_delay + Duration::from_millis(rand::thread_rng().gen_range(0..span_ms))
        } else {
            self.min_delay
        }
    }

    /// Pick today's disguise.
    fn pick_user_agent() -> &'static str {
        let idx = rand::thread_rng().gen_range(0..USER_AGENTS.len());
        USER_AGENTS[idx]
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, club: &Club) -> Result<String, FetchError> {
        // Pace first, fetch second. The delay belongs to this call alone;
        // two workers sleeping at once is the whole point.
        let delay = self.pick_delay();
        debug!(club = %club.name, delay_ms = delay.as_millis() as u64, "pacing before fetch");
        tokio::time::sleep(delay).await;

        let response = self
            .client
            .get(club.url.clone())
            .header(header::USER_AGENT, Self::pick_user_agent())
            .header(header::ACCEPT, ACCEPT)
            .header(header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                club: club.name.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                club: club.name.clone(),
                status,
            });
        }

        response.text().await.map_err(|e| FetchError::Body {
            club: club.name.clone(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_names_the_club() {
        let err = FetchError::Status {
            club: "Crewe Alexandra".to_string(),
            status: StatusCode::TOO_MANY_REQUESTS,
        };
        let msg = err.to_string();
        assert!(msg.contains("Crewe Alexandra"));
        assert!(msg.contains("429"));
    }

    #[test]
    fn test_user_agent_pool_only_serves_from_the_pool() {
        for _ in 0..50 {
            let ua = HttpFetcher::pick_user_agent();
            assert!(USER_AGENTS.contains(&ua));
        }
    }

    #[test]
    fn test_delay_draw_stays_in_the_configured_interval() {
        let fetcher = HttpFetcher {
            client: reqwest::Client::new(),
            min_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(20),
        };
        for _ in 0..100 {
            let d = fetcher.pick_delay();
            assert!(d >= Duration::from_millis(10));
            assert!(d < Duration::from_millis(20));
        }
    }

    #[test]
    fn test_degenerate_delay_interval_falls_back_to_min() {
        let fetcher = HttpFetcher {
            client: reqwest::Client::new(),
            min_delay: Duration::from_millis(30),
            max_delay: Duration::from_millis(30),
        };
        assert_eq!(fetcher.pick_delay(), Duration::from_millis(30));
    }
}
