//! Load orchestrator.
//!
//! Drives one full-refresh load run: pick the newest CSV export, provision
//! and truncate the target collections, then map and insert row by row.
//! Row-scoped failures are recorded in the report and never abort the run;
//! store unavailability does.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use gdelt_core::mapper::map_row;
use gdelt_core::row::EventRow;

use crate::provision::CollectionSet;
use crate::store::{GraphStore, StoreError};

/// Run-scoped load failures. Row-scoped problems never surface here; they
/// land in [`LoadReport::failures`].
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("input error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not read input file: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One skipped row.
#[derive(Debug, Clone)]
pub struct RowFailure {
    /// Zero-based index of the row within the input file (header excluded).
    pub index: usize,
    pub error: String,
    /// Raw record content, for debugging. Empty when the record itself
    /// could not be read.
    pub raw: String,
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub source: PathBuf,
    pub attempted: usize,
    pub loaded: usize,
    pub failures: Vec<RowFailure>,
}

/// Result of a load attempt. Finding no input file is an expected condition,
/// not an error.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    NoInput,
    Completed(LoadReport),
}

/// Pick the most recently modified `.csv`/`.CSV` file in `input_dir`.
pub fn select_latest_csv(input_dir: &Path) -> std::io::Result<Option<PathBuf>> {
    let mut latest: Option<(std::time::SystemTime, PathBuf)> = None;
    for entry in fs::read_dir(input_dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if !is_csv || !entry.file_type()?.is_file() {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        if latest.as_ref().is_none_or(|(t, _)| modified > *t) {
            latest = Some((modified, path));
        }
    }
    Ok(latest.map(|(_, path)| path))
}

/// Run one full load against the store.
pub async fn run_load(
    store: &dyn GraphStore,
    input_dir: &Path,
) -> Result<LoadOutcome, LoadError> {
    let Some(source) = select_latest_csv(input_dir)? else {
        info!(dir = %input_dir.display(), "No CSV files found in input directory");
        return Ok(LoadOutcome::NoInput);
    };
    info!(file = %source.display(), "Processing file");

    let mut reader = csv::Reader::from_path(&source)?;
    let headers = reader.headers()?.clone();

    let collections = CollectionSet::provision(store).await?;
    collections.reset_all(store).await?;

    let mut report = LoadReport {
        source,
        attempted: 0,
        loaded: 0,
        failures: Vec::new(),
    };

    for (index, record) in reader.records().enumerate() {
        report.attempted += 1;

        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(row = index, error = %e, "Unreadable record, skipping");
                report.failures.push(RowFailure {
                    index,
                    error: e.to_string(),
                    raw: String::new(),
                });
                continue;
            }
        };
        let raw = record.iter().collect::<Vec<_>>().join(",");

        let row: EventRow = match record.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(e) => {
                warn!(row = index, error = %e, raw, "Row failed to deserialize, skipping");
                report.failures.push(RowFailure {
                    index,
                    error: e.to_string(),
                    raw,
                });
                continue;
            }
        };

        let entities = match map_row(&row) {
            Ok(entities) => entities,
            Err(e) => {
                warn!(row = index, error = %e, raw, "Row failed to map, skipping");
                report.failures.push(RowFailure {
                    index,
                    error: e.to_string(),
                    raw,
                });
                continue;
            }
        };

        debug!(row = index, event = %entities.event.key, "Inserting event");
        match insert_entities(store, &collections, &entities).await {
            Ok(()) => report.loaded += 1,
            Err(e) if e.is_row_scoped() => {
                warn!(row = index, error = %e, raw, "Store rejected row, skipping");
                report.failures.push(RowFailure {
                    index,
                    error: e.to_string(),
                    raw,
                });
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!(
        attempted = report.attempted,
        loaded = report.loaded,
        failed = report.failures.len(),
        "Load complete"
    );
    Ok(LoadOutcome::Completed(report))
}

/// Insert one row's entities: vertices strictly before the edges that
/// reference them. A failure mid-row leaves the earlier inserts in place;
/// partial rows are an accepted outcome.
async fn insert_entities(
    store: &dyn GraphStore,
    collections: &CollectionSet,
    entities: &gdelt_core::mapper::RowEntities,
) -> Result<(), StoreError> {
    store
        .insert_document(collections.events, &entities.event.to_json())
        .await?;
    store
        .insert_document(collections.actors, &entities.actor.to_json())
        .await?;
    if let Some(location) = &entities.location {
        store
            .insert_document(collections.locations, &location.to_json())
            .await?;
    }
    for edge in &entities.edges {
        store
            .insert_document(collections.relations, &edge.to_json())
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use gdelt_core::mapper::{ACTORS, EVENTS, LOCATIONS, RELATIONS};
    use serde_json::Value;
    use std::io::Write;

    const HEADER: &str = "GlobalEventID,EventCode,EventBaseCode,EventRootCode,QuadClass,GoldsteinScale,NumMentions,NumSources,NumArticles,AvgTone,Day,Year,MonthYear,FractionDate,Actor1Type1Code,Actor1Type2Code,Actor1Type3Code,Actor1CountryCode,Actor1Geo_Type,Actor1Geo_Fullname,Actor1Geo_CountryCode,Actor1Geo_ADM1Code,Actor1Geo_ADM2Code,Actor1Geo_Lat,Actor1Geo_Long,Actor1Geo_FeatureID";

    fn write_csv(dir: &Path, name: &str, rows: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        path
    }

    fn full_row() -> &'static str {
        "100,043,043,04,1,5.0,10,2,10,2.5,20240101,2024,202401,2024.0027,GOV,,,USA,3,Los Angeles,US,USCA,,34.05,-118.25,1662328"
    }

    async fn counts(store: &MemoryStore) -> [u64; 4] {
        let mut out = [0; 4];
        for (i, name) in [EVENTS, ACTORS, LOCATIONS, RELATIONS].iter().enumerate() {
            out[i] = store.document_count(name).await.unwrap();
        }
        out
    }

    #[tokio::test]
    async fn test_no_input_is_terminal_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();
        let outcome = run_load(&store, dir.path()).await.unwrap();
        assert!(matches!(outcome, LoadOutcome::NoInput));
        // nothing provisioned, nothing written
        assert!(!store.has_collection(EVENTS).await.unwrap());
    }

    #[tokio::test]
    async fn test_single_row_with_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "export.CSV", &[full_row()]);
        let store = MemoryStore::new();

        let LoadOutcome::Completed(report) = run_load(&store, dir.path()).await.unwrap()
        else {
            panic!("expected a completed run");
        };
        assert_eq!(report.attempted, 1);
        assert_eq!(report.loaded, 1);
        assert!(report.failures.is_empty());
        assert_eq!(counts(&store).await, [1, 1, 1, 2]);

        let events = store.documents(EVENTS);
        assert_eq!(events[0].get("_key"), Some(&Value::from("100")));
        assert_eq!(events[0].get("goldsteinScale"), Some(&Value::from(5.0)));
        assert_eq!(
            store.documents(ACTORS)[0].get("_key"),
            Some(&Value::from("actor_100"))
        );
        assert_eq!(
            store.documents(LOCATIONS)[0].get("_key"),
            Some(&Value::from("loc_100"))
        );
        let labels: Vec<_> = store
            .documents(RELATIONS)
            .iter()
            .map(|e| e.get("type").cloned().unwrap())
            .collect();
        assert_eq!(labels, vec![Value::from("HAS_ACTOR"), Value::from("OCCURRED_AT")]);
    }

    #[tokio::test]
    async fn test_missing_latitude_drops_location_only() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "export.CSV",
            &["100,043,043,04,1,5.0,10,2,10,2.5,20240101,2024,202401,2024.0027,GOV,,,USA,3,Los Angeles,US,USCA,,,-118.25,1662328"],
        );
        let store = MemoryStore::new();

        let LoadOutcome::Completed(report) = run_load(&store, dir.path()).await.unwrap()
        else {
            panic!("expected a completed run");
        };
        assert_eq!(report.loaded, 1);
        assert_eq!(counts(&store).await, [1, 1, 0, 1]);
        assert_eq!(
            store.documents(RELATIONS)[0].get("type"),
            Some(&Value::from("HAS_ACTOR"))
        );
    }

    #[tokio::test]
    async fn test_non_numeric_event_id_skips_row_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        // 26 columns: a non-numeric id, an event code, 24 empty cells
        let bad_row = format!("not-a-number,043{}", ",".repeat(24));
        write_csv(dir.path(), "export.CSV", &[&bad_row, full_row()]);
        let store = MemoryStore::new();

        let LoadOutcome::Completed(report) = run_load(&store, dir.path()).await.unwrap()
        else {
            panic!("expected a completed run");
        };
        assert_eq!(report.attempted, 2);
        assert_eq!(report.loaded, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 0);
        assert!(report.failures[0].raw.starts_with("not-a-number"));
        assert_eq!(store.document_count(EVENTS).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_header_only_file_completes_empty() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "export.CSV", &[]);
        let store = MemoryStore::new();

        let LoadOutcome::Completed(report) = run_load(&store, dir.path()).await.unwrap()
        else {
            panic!("expected a completed run");
        };
        assert_eq!(report.attempted, 0);
        assert_eq!(report.loaded, 0);
        assert_eq!(counts(&store).await, [0, 0, 0, 0]);
    }

    #[tokio::test]
    async fn test_duplicate_event_id_is_row_scoped() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "export.CSV", &[full_row(), full_row()]);
        let store = MemoryStore::new();

        let LoadOutcome::Completed(report) = run_load(&store, dir.path()).await.unwrap()
        else {
            panic!("expected a completed run");
        };
        assert_eq!(report.attempted, 2);
        assert_eq!(report.loaded, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].error.contains("duplicate key"));
    }

    #[tokio::test]
    async fn test_rerun_does_not_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "export.CSV", &[full_row()]);
        let store = MemoryStore::new();

        run_load(&store, dir.path()).await.unwrap();
        let first = counts(&store).await;
        run_load(&store, dir.path()).await.unwrap();
        assert_eq!(counts(&store).await, first);
    }

    #[tokio::test]
    async fn test_selects_newest_file() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "old.CSV", &[full_row()]);
        std::thread::sleep(std::time::Duration::from_millis(20));
        let newest = write_csv(dir.path(), "new.csv", &[full_row()]);
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let selected = select_latest_csv(dir.path()).unwrap();
        assert_eq!(selected, Some(newest));
    }
}
