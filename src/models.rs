// =============================================================================
// models.rs — THE SACRED DATA STRUCTURES OF TALENT IDENTIFICATION
// =============================================================================
//
// These structs represent the fundamental building blocks of our scouting
// system. Each field has been carefully chosen to capture every piece of
// information a lower-league director of football could possibly want about
// a teenager who may or may not become the next big thing.
//
// Is it overkill to model a 24-row squad table this rigorously?
// Yes. Do we care? Absolutely not.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

/// One club whose squad page we scout. Static configuration: clubs are
/// defined once at startup in the catalog and never mutated. Identity is
/// the URL, because club names are marketing and URLs are forever.
#[derive(Debug, Clone)]
pub struct Club {
    /// Display name, stamped onto every player we accept from this page.
    pub name: String,

    /// The squad page to fetch. Typed as a real Url so a typo in the
    /// catalog blows up at startup instead of as 24 mysterious 404s.
    pub url: Url,
}

impl Club {
    pub fn new(name: &str, url: Url) -> Self {
        Self {
            name: name.to_string(),
            url,
        }
    }
}

impl fmt::Display for Club {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.url)
    }
}

/// One accepted player. This is the struct that gets serialized into the
/// output report, so the field names below are a wire contract with whoever
/// consumes the JSON. Do not rename them on a whim.
///
/// Invariants, enforced by the extractor and nowhere else:
/// - `potential` is at least the configured minimum
/// - `growth` is at least the configured minimum
/// - `profile` does not contain the loan marker
///
/// Once a Player exists, it is immutable. Nobody edits a scouting report
/// after the scout has filed it. That would be corruption.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Player {
    /// Player name as shown in the squad table, markup stripped.
    pub profile: String,

    /// The club whose page we found him on.
    pub team: String,

    /// Asking price as free-form text. We do not parse currency strings,
    /// because currency strings on football sites are where parsers go to die.
    pub price: String,

    /// Age in years. Best-effort: a malformed cell becomes 0 rather than
    /// costing us the whole row.
    pub age: i32,

    /// Current overall rating. Same best-effort policy as age.
    pub overall: i32,

    /// Potential rating. This one is load-bearing: it gates admission,
    /// so it must have parsed cleanly and cleared the threshold.
    pub potential: i32,

    /// Potential minus overall, precomputed by the site. Also gates
    /// admission. A 70-potential 28-year-old is not a wonderkid,
    /// he is a Tuesday.
    pub growth: i32,
}

/// The outcome of one complete scouting run: every accepted player plus
/// enough metadata to brag about it in the logs. Built exactly once per run
/// by the aggregator, after every worker has reported and the collector has
/// drained the channel dry.
///
/// Player order is arrival order from concurrent workers. It is not stable
/// across runs and nothing downstream is allowed to assume it is.
#[derive(Debug)]
pub struct RunReport {
    /// Every player who survived the admission filters, in arrival order.
    pub players: Vec<Player>,

    /// Clubs whose pages fetched successfully.
    pub clubs_scanned: u64,

    /// Clubs whose fetch failed. These contributed zero players and
    /// received exactly zero sympathy.
    pub clubs_failed: u64,

    /// When the run started, for the record books.
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration of the whole run.
    pub elapsed: Duration,
}

impl RunReport {
    pub fn found(&self) -> usize {
        self.players.len()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} players from {} clubs ({} failed) in {:.1?}",
            self.players.len(),
            self.clubs_scanned,
            self.clubs_failed,
            self.elapsed
        )
    }
}
