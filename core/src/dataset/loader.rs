use crate::dataset::snapshot::RawSnapshot;
use crate::prelude::DatasetResult;
use std::fs;
use std::path::Path;

/// Parses a JSON array of `[start, end, frame]` triples.
pub fn parse_snapshots(json: &str) -> DatasetResult<Vec<RawSnapshot>> {
    Ok(serde_json::from_str(json)?)
}

pub fn parse_snapshot_bytes(bytes: &[u8]) -> DatasetResult<Vec<RawSnapshot>> {
    Ok(serde_json::from_slice(bytes)?)
}

pub fn load_snapshots<P: AsRef<Path>>(path: P) -> DatasetResult<Vec<RawSnapshot>> {
    let contents = fs::read(path.as_ref())?;
    parse_snapshot_bytes(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::DatasetError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PRODUCER_SAMPLE: &str = r#"[
        [-999999999, 0, {
            "Planet": {"time": 0, "timeStep": 0.01, "x": 0, "y": 0.1, "vx": 0.1, "vy": 0},
            "Satellite": {"time": 0, "timeStep": 0.01, "x": 0, "y": 1, "vx": 1, "vy": 0}
        }],
        [0, 0.01, {
            "Planet": {"time": 0.01, "timeStep": 0.05, "x": 0.001, "y": 0.1, "vx": 0.1, "vy": 0}
        }]
    ]"#;

    #[test]
    fn parse_accepts_producer_triples() {
        let snapshots = parse_snapshots(PRODUCER_SAMPLE).unwrap();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].interval_start, -999_999_999.0);
        assert_eq!(snapshots[1].interval_end, 0.01);

        let satellite = snapshots[0].frame["Satellite"];
        assert_eq!(satellite.y, 1.0);
        assert_eq!(satellite.vx, Some(1.0));
        assert_eq!(satellite.time, Some(0.0));
    }

    #[test]
    fn parse_keeps_producer_agent_order() {
        let json = r#"[[0, 1, {"Zeta": {"x": 1, "y": 2}, "Alpha": {"x": 3, "y": 4}}]]"#;
        let snapshots = parse_snapshots(json).unwrap();
        let order: Vec<&str> = snapshots[0].frame.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn parse_tolerates_missing_motion_fields() {
        let json = r#"[[0, 1, {"A": {"x": 0, "y": 0}}]]"#;
        let snapshots = parse_snapshots(json).unwrap();
        let sample = snapshots[0].frame["A"];
        assert_eq!(sample.vx, None);
        assert_eq!(sample.time, None);
    }

    #[test]
    fn parse_rejects_missing_position() {
        let json = r#"[[0, 1, {"A": {"y": 0}}]]"#;
        assert!(matches!(parse_snapshots(json), Err(DatasetError::Parse(_))));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(PRODUCER_SAMPLE.as_bytes()).unwrap();
        let path = temp.into_temp_path();
        let snapshots = load_snapshots(&path).unwrap();
        assert_eq!(snapshots.len(), 2);
    }

    #[test]
    fn load_reports_missing_file() {
        let result = load_snapshots("/nonexistent/trajectory.json");
        assert!(matches!(result, Err(DatasetError::Io(_))));
    }

    #[test]
    fn snapshots_serialize_back_to_triples() {
        let snapshots = parse_snapshots(r#"[[0, 1, {"A": {"x": 2, "y": 3}}]]"#).unwrap();
        let json = serde_json::to_string(&snapshots).unwrap();
        assert_eq!(json, r#"[[0.0,1.0,{"A":{"x":2.0,"y":3.0}}]]"#);
    }
}
