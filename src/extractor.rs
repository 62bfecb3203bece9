// =============================================================================
// extractor.rs — THE SQUAD TABLE INTERROGATOR
// =============================================================================
//
// This module is where we do the actual "is this kid a wonderkid?"
// determination. The input is a raw squad page; the output is zero or more
// accepted players. Everything in between is filters.
//
// The page is treated as a sequence of <tr> rows, each holding <td> cells in
// a fixed column order: 0=profile, 1=overall, 2=potential, 3=growth, 4=age,
// 5=price. Rows that don't have at least six cells are headers, adverts, or
// other debris, and are skipped without comment. Skipping rows is the normal
// case here, not an error: a 30-man squad usually yields two or three
// players worth a phone call.
//
// This stage is deliberately pure: no I/O, no randomness, no clock. Feed it
// the same markup twice and you get the same players twice, which is exactly
// what makes it the easy module to test and the boring module to debug.
// =============================================================================

use std::sync::LazyLock;

use regex::Regex;

use crate::models::Player;

/// Substring in the profile cell marking a loaned player. Loanees belong to
/// someone else's academy; scouting them is window shopping.
pub const LOAN_MARKER: &str = "Loan";

/// Minimum number of cells for a row to be considered a squad entry.
const MIN_CELLS: usize = 6;

// Compiled once, used for every page. The (?s) flag lets `.` cross newlines,
// because real squad tables are pretty-printed across many lines.
static ROW_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<tr[^>]*>.*?</tr>").expect("row pattern compiles"));

static CELL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<td[^>]*>(.*?)</td>").expect("cell pattern compiles"));

static TAG_STRIPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag stripper compiles"));

/// SIMD-accelerated pre-check: does this page contain a table row at all?
/// Error pages, consent walls, and empty responses get bounced here before
/// the regex engine spends any effort on them.
fn has_table_rows(html: &str) -> bool {
    memchr::memmem::find(html.as_bytes(), b"<tr").is_some()
}

/// Remove markup tags and surrounding whitespace from a cell's content.
/// Idempotent: stripping an already-stripped string is a no-op, since the
/// first pass leaves no `<` ... `>` spans behind.
pub fn strip_tags(input: &str) -> String {
    TAG_STRIPPER.replace_all(input, "").trim().to_string()
}

/// Parse a squad page into the players worth reporting.
///
/// Admission pipeline per row, short-circuiting on the first failure
/// (the row is dropped, never the page):
///   1. the profile cell must not mention a loan
///   2. potential must parse and clear `min_potential` (inclusive)
///   3. growth must parse and clear `min_growth` (inclusive)
///   4. overall and age are best-effort: malformed cells become 0,
///      because losing a wonderkid over a glitchy age cell is unforgivable
///
/// Every accepted player is stamped with `team` so the final report knows
/// which car park to send the scout to.
pub fn extract_players(team: &str, html: &str, min_potential: i32, min_growth: i32) -> Vec<Player> {
    let mut players = Vec::new();

    if !has_table_rows(html) {
        return players;
    }

    for row in ROW_PATTERN.find_iter(html) {
        let cells: Vec<String> = CELL_PATTERN
            .captures_iter(row.as_str())
            .map(|cap| strip_tags(&cap[1]))
            .collect();

        if cells.len() < MIN_CELLS {
            continue;
        }

        let profile = &cells[0];
        if profile.contains(LOAN_MARKER) {
            continue;
        }

        let Ok(potential) = cells[2].parse::<i32>() else {
            continue;
        };
        if potential < min_potential {
            continue;
        }

        let Ok(growth) = cells[3].parse::<i32>() else {
            continue;
        };
        if growth < min_growth {
            continue;
        }

        let overall = cells[1].parse().unwrap_or(0);
        let age = cells[4].parse().unwrap_or(0);

        players.push(Player {
            profile: profile.clone(),
            team: team.to_string(),
            price: cells[5].clone(),
            age,
            overall,
            potential,
            growth,
        });
    }

    players
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a squad row the way the stats site renders one: name wrapped in
    /// a link, numbers wrapped in spans, whitespace everywhere.
    fn row(profile: &str, overall: &str, potential: &str, growth: &str, age: &str, price: &str) -> String {
        format!(
            "<tr class=\"squad-row\">\n  <td><a href=\"/player/1\">{profile}</a></td>\n  \
             <td><span class=\"rating\">{overall}</span></td>\n  <td><span>{potential}</span></td>\n  \
             <td>{growth}</td>\n  <td>{age}</td>\n  <td><b>{price}</b></td>\n</tr>"
        )
    }

    fn page(rows: &[String]) -> String {
        format!(
            "<html><body><table>\n<tr><th>Name</th><th>OVR</th></tr>\n{}\n</table></body></html>",
            rows.join("\n")
        )
    }

    #[test]
    fn test_qualifying_row_is_accepted_with_all_fields() {
        let html = page(&[row("Jimmy Wonder", "58", "75", "17", "17", "€2.3M")]);
        let players = extract_players("Walsall", &html, 70, 12);
        assert_eq!(players.len(), 1);
        let p = &players[0];
        assert_eq!(p.profile, "Jimmy Wonder");
        assert_eq!(p.team, "Walsall");
        assert_eq!(p.price, "€2.3M");
        assert_eq!(p.age, 17);
        assert_eq!(p.overall, 58);
        assert_eq!(p.potential, 75);
        assert_eq!(p.growth, 17);
    }

    #[test]
    fn test_short_rows_yield_nothing() {
        // Header rows and other sub-6-cell debris never become players.
        let html = "<table>\
            <tr><th>Name</th><th>OVR</th><th>POT</th></tr>\
            <tr><td>Lost Soul</td><td>60</td><td>80</td><td>20</td><td>18</td></tr>\
            </table>";
        assert!(extract_players("Barrow", html, 70, 12).is_empty());
    }

    #[test]
    fn test_thresholds_are_inclusive_at_the_boundary() {
        let html = page(&[row("Edge Case", "58", "70", "12", "18", "€1M")]);
        let players = extract_players("Bromley", &html, 70, 12);
        assert_eq!(players.len(), 1, "potential == min and growth == min are IN");
    }

    #[test]
    fn test_below_threshold_potential_is_excluded() {
        let html = page(&[row("Nearly Man", "55", "69", "14", "19", "€500K")]);
        assert!(extract_players("Morecambe", &html, 70, 12).is_empty());
    }

    #[test]
    fn test_below_threshold_growth_is_excluded() {
        let html = page(&[row("Peaked Early", "64", "75", "11", "24", "€900K")]);
        assert!(extract_players("Morecambe", &html, 70, 12).is_empty());
    }

    #[test]
    fn test_loanees_are_excluded_regardless_of_stats() {
        let html = page(&[row("Loan Player", "60", "85", "25", "18", "€4M")]);
        assert!(
            extract_players("Salford City", &html, 70, 12).is_empty(),
            "someone else's wonderkid is not our wonderkid"
        );
    }

    #[test]
    fn test_malformed_potential_drops_the_row() {
        let html = page(&[row("Glitch Kid", "60", "N/A", "15", "18", "€1M")]);
        assert!(extract_players("Gillingham", &html, 70, 12).is_empty());
    }

    #[test]
    fn test_malformed_growth_drops_the_row() {
        let html = page(&[row("Glitch Kid", "60", "75", "??", "18", "€1M")]);
        assert!(extract_players("Gillingham", &html, 70, 12).is_empty());
    }

    #[test]
    fn test_malformed_overall_and_age_default_to_zero() {
        let html = page(&[row("Mystery Youth", "—", "74", "16", "unknown", "€1.1M")]);
        let players = extract_players("Grimsby Town", &html, 70, 12);
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].overall, 0);
        assert_eq!(players[0].age, 0);
        assert_eq!(players[0].potential, 74);
    }

    #[test]
    fn test_three_rows_two_qualify() {
        // The canonical scouting trip: three names on the list, one of them
        // was never going to make it.
        let html = page(&[
            row("Starlet One", "60", "75", "15", "17", "€2M"),
            row("Starlet Two", "58", "70", "12", "18", "€1.5M"),
            row("Club Legend", "60", "60", "0", "33", "€200K"),
        ]);
        let players = extract_players("Notts County", &html, 70, 12);
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].profile, "Starlet One");
        assert_eq!(players[1].profile, "Starlet Two");
    }

    #[test]
    fn test_row_order_is_preserved_within_a_page() {
        let html = page(&[
            row("Alpha", "58", "80", "22", "17", "€3M"),
            row("Bravo", "59", "78", "19", "18", "€2M"),
            row("Charlie", "60", "76", "16", "19", "€1M"),
        ]);
        let names: Vec<_> = extract_players("Port Vale", &html, 70, 12)
            .into_iter()
            .map(|p| p.profile)
            .collect();
        assert_eq!(names, vec!["Alpha", "Bravo", "Charlie"]);
    }

    #[test]
    fn test_strip_tags_is_idempotent() {
        let raw = "  <a href=\"/p/9\"><b>Jimmy</b> Wonder</a>  ";
        let once = strip_tags(raw);
        let twice = strip_tags(&once);
        assert_eq!(once, "Jimmy Wonder");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rows_spanning_newlines_still_parse() {
        // Pretty-printed markup is the norm, not the exception.
        let html = "<table>\n<tr>\n<td>\n<a>Multiline Max</a>\n</td>\n<td>57</td>\n\
                    <td>\n72\n</td>\n<td>15</td>\n<td>16</td>\n<td>€800K</td>\n</tr>\n</table>";
        let players = extract_players("Barrow", html, 70, 12);
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].profile, "Multiline Max");
        assert_eq!(players[0].potential, 72);
    }

    #[test]
    fn test_pages_without_rows_short_circuit() {
        assert!(extract_players("Bromley", "", 70, 12).is_empty());
        assert!(extract_players("Bromley", "<html><body>503</body></html>", 70, 12).is_empty());
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let html = page(&[
            row("Starlet One", "60", "75", "15", "17", "€2M"),
            row("Loan Player", "61", "82", "21", "18", "€3M"),
            row("Starlet Two", "58", "70", "12", "18", "€1.5M"),
        ]);
        let first = extract_players("Swindon Town", &html, 70, 12);
        let second = extract_players("Swindon Town", &html, 70, 12);
        assert_eq!(first, second);
    }
}
