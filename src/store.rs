//! SQLite persistence of traffic samples

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, SecondsFormat, Utc};
use corridorwatch_core::prelude::*;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS traffic_sample (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    corridor           TEXT    NOT NULL,
    avg_current_speed  REAL,
    avg_freeflow_speed REAL,
    min_current_speed  REAL,
    confidence         REAL,
    incidents_json     TEXT    NOT NULL,
    points_sampled     INTEGER NOT NULL,
    polled_at          TEXT    NOT NULL
);
CREATE INDEX IF NOT EXISTS traffic_sample_corridor_polled_at
    ON traffic_sample (corridor, polled_at);
";

/// A sample as read back from the database
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredSample {
    pub id: i64,
    #[serde(flatten)]
    pub sample: TrafficSample,
}

/// Cheap to clone; all clones share one connection
#[derive(Debug, Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::init(Connection::open(path).map_err(storage)?)
    }

    pub fn open_in_memory() -> Result<Self, Error> {
        Self::init(Connection::open_in_memory().map_err(storage)?)
    }

    fn init(conn: Connection) -> Result<Self, Error> {
        conn.execute_batch(SCHEMA).map_err(storage)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Most recent sample of `corridor` by poll time
    pub async fn latest(&self, corridor: &str) -> Result<Option<StoredSample>, Error> {
        let corridor = corridor.to_string();
        self.with_connection(move |conn| {
            conn.query_row(
                "SELECT id, corridor, avg_current_speed, avg_freeflow_speed, min_current_speed,
                        confidence, incidents_json, points_sampled, polled_at
                 FROM traffic_sample
                 WHERE corridor = ?1
                 ORDER BY polled_at DESC, id DESC
                 LIMIT 1",
                params![corridor],
                read_row,
            )
            .optional()
        })
        .await
    }

    async fn with_connection<F, R>(&self, f: F) -> Result<R, Error>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().unwrap_or_else(PoisonError::into_inner);
            f(&conn)
        })
        .await
        .map_err(|e| Error::StorageError(e.to_string()))?
        .map_err(storage)
    }
}

impl SampleStore for SqliteStore {
    async fn save(&self, sample: TrafficSample) -> Result<(), Error> {
        let points_sampled = i64::try_from(sample.points_sampled)
            .map_err(|e| Error::StorageError(e.to_string()))?;

        self.with_connection(move |conn| {
            conn.execute(
                "INSERT INTO traffic_sample (
                    corridor, avg_current_speed, avg_freeflow_speed, min_current_speed,
                    confidence, incidents_json, points_sampled, polled_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    sample.corridor,
                    sample.avg_current_speed,
                    sample.avg_freeflow_speed,
                    sample.min_current_speed,
                    sample.confidence,
                    sample.incidents_json,
                    points_sampled,
                    format_timestamp(&sample.polled_at),
                ],
            )
        })
        .await
        .map(|_| ())
    }
}

fn storage(error: rusqlite::Error) -> Error {
    Error::StorageError(error.to_string())
}

// Fixed-width UTC timestamps sort lexically in time order
fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<StoredSample> {
    let points_sampled: i64 = row.get(7)?;
    let polled_at: String = row.get(8)?;

    Ok(StoredSample {
        id: row.get(0)?,
        sample: TrafficSample {
            corridor: row.get(1)?,
            avg_current_speed: row.get(2)?,
            avg_freeflow_speed: row.get(3)?,
            min_current_speed: row.get(4)?,
            confidence: row.get(5)?,
            incidents_json: row.get(6)?,
            points_sampled: usize::try_from(points_sampled)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Integer, Box::new(e)))?,
            polled_at: DateTime::parse_from_rfc3339(&polled_at)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?
                .with_timezone(&Utc),
        },
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn sample(corridor: &str, speed: Option<f64>, polled_at: DateTime<Utc>) -> TrafficSample {
        TrafficSample {
            corridor: corridor.to_string(),
            avg_current_speed: speed,
            avg_freeflow_speed: speed.map(|s| s + 5.0),
            min_current_speed: speed,
            confidence: None,
            incidents_json: r#"{"incidents":[]}"#.to_string(),
            points_sampled: 12,
            polled_at,
        }
    }

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, minute, 0).unwrap()
    }

    #[tokio::test]
    async fn test_save_and_read_back() {
        let store = SqliteStore::open_in_memory().unwrap();
        let saved = sample("I-25", Some(57.5), at(0));
        store.save(saved.clone()).await.unwrap();

        let latest = store.latest("I-25").await.unwrap().unwrap();
        assert_eq!(latest.sample, saved);
        assert!(latest.id > 0);
    }

    #[tokio::test]
    async fn test_latest_is_most_recent_per_corridor() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.save(sample("I-25", Some(60.0), at(10))).await.unwrap();
        store.save(sample("I-25", Some(40.0), at(20))).await.unwrap();
        store.save(sample("I-25", Some(50.0), at(15))).await.unwrap();
        store.save(sample("I-70", Some(30.0), at(30))).await.unwrap();

        let latest = store.latest("I-25").await.unwrap().unwrap();
        assert_eq!(latest.sample.avg_current_speed, Some(40.0));
        assert_eq!(latest.sample.polled_at, at(20));
    }

    #[tokio::test]
    async fn test_nulls_survive_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.save(sample("I-25", None, at(0))).await.unwrap();

        let latest = store.latest("I-25").await.unwrap().unwrap();
        assert_eq!(latest.sample.avg_current_speed, None);
        assert_eq!(latest.sample.min_current_speed, None);
    }

    #[tokio::test]
    async fn test_unknown_corridor() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.latest("I-25").await.unwrap().is_none());
    }

    #[test]
    fn test_timestamps_sort_lexically() {
        let earlier = format_timestamp(&at(5));
        let later = format_timestamp(&(at(5) + Duration::microseconds(1)));
        assert!(earlier < later);
        assert_eq!(earlier.len(), later.len());
    }
}
