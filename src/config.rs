// =============================================================================
// config.rs — THE GRAND CONFIGURATION CATHEDRAL
// =============================================================================
//
// Every system needs configuration, but not every system needs THIS MUCH
// configuration for scraping two dozen squad pages. We have knobs for knobs.
//
// All values can be overridden via environment variables, because hardcoding
// configuration is how you end up on the front page of Hacker News for the
// wrong reasons.
//
// Default values have been carefully chosen through a rigorous process of
// "that seems about right" and "the site will probably rate-limit us if we
// go faster than this."
// =============================================================================

use std::env;
use std::time::Duration;

use url::Url;

use crate::models::Club;

/// The Grand Configuration Struct. Every tunable parameter in the entire
/// radar lives here. Think of it as the dugout of a football manager, except
/// instead of controlling substitutions, you're controlling how aggressively
/// we browse a football stats website while pretending to be three different
/// humans.
#[derive(Debug, Clone)]
pub struct Config {
    // =========================================================================
    // ADMISSION THRESHOLDS
    // The line between "wonderkid" and "lad who tries hard."
    // =========================================================================
    /// Minimum potential rating for a player to make the report. Inclusive:
    /// a player sitting exactly on the threshold is IN. Default: 70, which
    /// in League Two terms means "future Championship regular."
    pub min_potential: i32,

    /// Minimum growth (potential minus overall) for admission. Inclusive.
    /// Default: 12. Below that he's not a project, he's a finished article.
    pub min_growth: i32,

    // =========================================================================
    // CONCURRENCY & PACING
    // Because fetching 24 pages at once is how you get your IP banned
    // from the one website this entire program exists to read.
    // =========================================================================
    /// Maximum number of squad pages in flight at once. Deliberately low.
    /// Default: 3. We are a scouting network, not a DDoS.
    pub concurrency: usize,

    /// Lower bound of the per-request jitter delay. Each worker draws its
    /// own delay independently; there is no global pacing clock.
    /// Default: 2000 ms.
    pub min_delay: Duration,

    /// Upper bound (exclusive) of the jitter delay. Default: 5000 ms.
    /// If someone configures max <= min, the fetcher falls back to the
    /// fixed min delay instead of panicking mid-match.
    pub max_delay: Duration,

    /// Overall timeout for a single page fetch. Default: 30 seconds,
    /// which is an eternity, but lower-league websites are themselves
    /// lower-league.
    pub http_timeout: Duration,

    // =========================================================================
    // OUTPUT
    // =========================================================================
    /// Where the final JSON report lands. Overwritten wholesale each run.
    pub output_file: String,

    /// Exit policy when every single fetch failed. Default: false, i.e.
    /// shrug, write an empty report, exit 0. Set to true if you want a
    /// totally dark radar to page someone.
    pub fail_on_empty: bool,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    /// "Sensible" here meaning "will work out of the box without any env vars
    /// but will also respect your wishes if you set them."
    ///
    /// Every parameter can be overridden via environment variables prefixed
    /// with WONDERKID_. Because namespacing your env vars is what separates
    /// the professionals from the amateurs.
    pub fn from_env() -> Self {
        // Try to load .env if it exists. Fail silently if it doesn't,
        // because not everyone has their life together enough to create
        // a .env file.
        let _ = dotenvy::dotenv();

        Config {
            min_potential: env_or_default("WONDERKID_MIN_POTENTIAL", "70")
                .parse()
                .unwrap_or(70),
            min_growth: env_or_default("WONDERKID_MIN_GROWTH", "12")
                .parse()
                .unwrap_or(12),

            concurrency: env_or_default("WONDERKID_CONCURRENCY", "3")
                .parse()
                .unwrap_or(3),
            min_delay: Duration::from_millis(
                env_or_default("WONDERKID_MIN_DELAY_MS", "2000")
                    .parse()
                    .unwrap_or(2000),
            ),
            max_delay: Duration::from_millis(
                env_or_default("WONDERKID_MAX_DELAY_MS", "5000")
                    .parse()
                    .unwrap_or(5000),
            ),
            http_timeout: Duration::from_secs(
                env_or_default("WONDERKID_HTTP_TIMEOUT_SECS", "30")
                    .parse()
                    .unwrap_or(30),
            ),

            output_file: env_or_default("WONDERKID_OUTPUT_FILE", "high_potential_players.json"),
            fail_on_empty: env_or_default("WONDERKID_FAIL_ON_EMPTY", "false")
                .parse()
                .unwrap_or(false),
        }
    }
}

/// Returns the full list of squad pages we scout. These are REAL club pages
/// from a REAL stats site. All 24 clubs of English League Two, the division
/// where careers begin, careers end, and occasionally a genuine wonderkid
/// hides behind a 58 overall.
///
/// The catalog is static configuration: one fetch per club per run, no link
/// following, no pagination, no second chances.
pub fn club_catalog() -> Vec<Club> {
    let clubs = [
        ("Bradford City", "https://www.fifacm.com/25/team/1804/bradford-city"),
        ("Doncaster Rovers", "https://www.fifacm.com/25/team/142/doncaster-rovers"),
        ("Carlisle United", "https://www.fifacm.com/25/team/1480/carlisle-united"),
        ("Swindon Town", "https://www.fifacm.com/25/team/1934/swindon-town"),
        ("Chesterfield", "https://www.fifacm.com/25/team/1924/chesterfield"),
        ("Tranmere Rovers", "https://www.fifacm.com/25/team/15048/tranmere-rovers"),
        ("Crewe Alexandra", "https://www.fifacm.com/25/team/121/crewe-alexandra"),
        ("Walsall", "https://www.fifacm.com/25/team/1803/walsall"),
        ("Notts County", "https://www.fifacm.com/25/team/1937/notts-county"),
        ("Port Vale", "https://www.fifacm.com/25/team/1928/port-vale"),
        ("Grimsby Town", "https://www.fifacm.com/25/team/92/grimsby-town"),
        ("Gillingham", "https://www.fifacm.com/25/team/1802/gillingham"),
        ("Cheltenham Town", "https://www.fifacm.com/25/team/1936/cheltenham-town"),
        ("Milton Keynes Dons", "https://www.fifacm.com/25/team/1798/milton-keynes-dons"),
        ("AFC Wimbledon", "https://www.fifacm.com/25/team/112259/afc-wimbledon"),
        ("Salford City", "https://www.fifacm.com/25/team/113926/salford-city"),
        ("Newport County", "https://www.fifacm.com/25/team/112254/newport-county"),
        ("Bromley", "https://www.fifacm.com/25/team/112764/bromley"),
        ("Barrow", "https://www.fifacm.com/25/team/381/barrow"),
        ("Harrogate Town", "https://www.fifacm.com/25/team/112222/harrogate-town"),
        ("Fleetwood Town", "https://www.fifacm.com/25/team/112260/fleetwood-town"),
        ("Morecambe", "https://www.fifacm.com/25/team/357/morecambe"),
        ("Accrington Stanley", "https://www.fifacm.com/25/team/110313/accrington-stanley"),
        ("Colchester United", "https://www.fifacm.com/25/team/1935/colchester-united"),
    ];

    clubs
        .into_iter()
        .map(|(name, url)| {
            // The catalog is compiled in, so a bad URL is a programming
            // error, not a runtime condition.
            let url = Url::parse(url).expect("club catalog URL is valid");
            Club::new(name, url)
        })
        .collect()
}

/// Helper function to read an environment variable with a default fallback.
/// Because unwrap_or on env::var is ugly and we have standards.
fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_scouting_brief() {
        // None of the WONDERKID_ vars are set in the test environment,
        // so from_env must hand back the compiled-in defaults.
        let config = Config::from_env();
        assert_eq!(config.min_potential, 70);
        assert_eq!(config.min_growth, 12);
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.min_delay, Duration::from_millis(2000));
        assert_eq!(config.max_delay, Duration::from_millis(5000));
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.output_file, "high_potential_players.json");
        assert!(!config.fail_on_empty);
    }

    #[test]
    fn test_catalog_covers_the_whole_division() {
        let clubs = club_catalog();
        assert_eq!(clubs.len(), 24);
        // Every locator points at the same stats site.
        for club in &clubs {
            assert_eq!(club.url.host_str(), Some("www.fifacm.com"));
            assert!(!club.name.is_empty());
        }
    }

    #[test]
    fn test_env_or_default_falls_back() {
        assert_eq!(
            env_or_default("WONDERKID_THIS_VAR_DOES_NOT_EXIST", "42"),
            "42"
        );
    }
}
