// =============================================================================
// report.rs — THE FILING CABINET
// =============================================================================
//
// The terminal sink of the pipeline: take the roster the collector drained,
// serialize it as a pretty-printed JSON array, and overwrite the output file
// with it. No append, no merge, no history. Each run produces the complete
// truth as of that run.
//
// Field names in the output (`profile`, `team`, `price`, `age`, `overall`,
// `potential`, `growth`) are a contract with downstream consumers. The
// 2-space indentation is a courtesy, not a contract.
// =============================================================================

use std::fs;

use tracing::info;

use crate::models::Player;

/// Failure to persist the report. Surfaced to main, logged, and pointedly
/// NOT allowed to crash the process: a run that found players but couldn't
/// write them still reports its summary from memory.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("serializing scouting report failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("writing report to {path} failed: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Write the roster to `path` as a pretty JSON array, replacing whatever
/// was there before.
pub fn write_report(path: &str, players: &[Player]) -> Result<(), ReportError> {
    let json = serde_json::to_vec_pretty(players)?;

    fs::write(path, &json).map_err(|source| ReportError::Write {
        path: path.to_string(),
        source,
    })?;

    info!(
        path = path,
        players = players.len(),
        bytes = json.len(),
        "💾 Scouting report filed"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn sample_player() -> Player {
        Player {
            profile: "Jimmy Wonder".to_string(),
            team: "Walsall".to_string(),
            price: "€2.3M".to_string(),
            age: 17,
            overall: 58,
            potential: 75,
            growth: 17,
        }
    }

    #[test]
    fn test_report_is_a_json_array_with_the_contracted_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.json");
        let path = path.to_str().expect("utf-8 path");

        write_report(path, &[sample_player()]).expect("write succeeds");

        let raw = std::fs::read_to_string(path).expect("report readable");
        let value: Value = serde_json::from_str(&raw).expect("report is valid JSON");

        let entries = value.as_array().expect("top level is an array");
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry["profile"], "Jimmy Wonder");
        assert_eq!(entry["team"], "Walsall");
        assert_eq!(entry["price"], "€2.3M");
        assert_eq!(entry["age"], 17);
        assert_eq!(entry["overall"], 58);
        assert_eq!(entry["potential"], 75);
        assert_eq!(entry["growth"], 17);

        // Pretty-printed, not a single-line blob.
        assert!(raw.contains('\n'));
    }

    #[test]
    fn test_empty_roster_writes_an_empty_array() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.json");
        let path = path.to_str().expect("utf-8 path");

        write_report(path, &[]).expect("write succeeds");

        let raw = std::fs::read_to_string(path).expect("report readable");
        let value: Value = serde_json::from_str(&raw).expect("valid JSON");
        assert_eq!(value, Value::Array(Vec::new()));
    }

    #[test]
    fn test_report_overwrites_the_previous_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.json");
        let path = path.to_str().expect("utf-8 path");

        write_report(path, &[sample_player()]).expect("first write");
        write_report(path, &[]).expect("second write");

        let raw = std::fs::read_to_string(path).expect("report readable");
        let value: Value = serde_json::from_str(&raw).expect("valid JSON");
        assert_eq!(value.as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn test_unwritable_path_reports_instead_of_panicking() {
        let err = write_report("/definitely/not/a/real/dir/report.json", &[sample_player()])
            .expect_err("write must fail");
        assert!(matches!(err, ReportError::Write { .. }));
        assert!(err.to_string().contains("/definitely/not/a/real/dir"));
    }
}
