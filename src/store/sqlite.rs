//! SQLite-backed property store.
//!
//! A single `rusqlite::Connection` guarded by a mutex. Every query runs on the
//! blocking pool so the async runtime never waits on disk I/O. The schema is
//! created on open; there are no versioned migrations.
//!
//! `created_at` is stored as fixed-width RFC 3339 text in UTC, which sorts
//! lexicographically in time order.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use tracing::info;

use super::{PropertyRepository, StoreError, StoreResult};
use crate::models::{format_timestamp, NewProperty, Price, Property, PropertyPatch};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS properties (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        price_cents INTEGER NOT NULL CHECK (price_cents >= 0),
        location TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_properties_created_at
        ON properties (created_at DESC);
";

const SELECT_COLUMNS: &str =
    "SELECT id, title, description, price_cents, location, created_at FROM properties";

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                StoreError::Constraint(err.to_string())
            }
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqlitePropertyStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqlitePropertyStore {
    /// Opens (or creates) the database at `path`. `:memory:` gives a private
    /// in-memory database.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let conn = if path.as_os_str() == ":memory:" {
            Connection::open_in_memory()?
        } else {
            let conn = Connection::open(path)?;
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                row.get::<_, String>(0)
            })?;
            conn
        };
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        conn.execute_batch(SCHEMA)?;
        info!("SQLite property store ready at {}", path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::open(":memory:")
    }

    async fn with_conn<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StoreError::Backend("connection mutex poisoned".to_string()))?;
            f(&mut *guard)
        })
        .await
        .map_err(|e| StoreError::Backend(format!("blocking task failed: {}", e)))?
    }
}

fn row_to_property(row: &Row<'_>) -> rusqlite::Result<Property> {
    let price_cents: i64 = row.get(3)?;
    let created_at: String = row.get(5)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?
        .with_timezone(&Utc);

    Ok(Property {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        price: Price::from_cents(price_cents.max(0) as u64),
        location: row.get(4)?,
        created_at,
    })
}

fn select_one(conn: &Connection, id: i64) -> StoreResult<Property> {
    conn.query_row(
        &format!("{} WHERE id = ?1", SELECT_COLUMNS),
        params![id],
        row_to_property,
    )
    .optional()?
    .ok_or(StoreError::NotFound(id))
}

fn write_fields(conn: &Connection, id: i64, property: &NewProperty) -> StoreResult<()> {
    let changed = conn.execute(
        "UPDATE properties
            SET title = ?1, description = ?2, price_cents = ?3, location = ?4
          WHERE id = ?5",
        params![
            property.title,
            property.description,
            property.price.cents() as i64,
            property.location,
            id
        ],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound(id));
    }
    Ok(())
}

#[async_trait]
impl PropertyRepository for SqlitePropertyStore {
    async fn list_recent(&self) -> StoreResult<Vec<Property>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("{} ORDER BY created_at DESC, id DESC", SELECT_COLUMNS))?;
            let rows = stmt.query_map([], row_to_property)?;
            let properties = rows.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(properties)
        })
        .await
    }

    async fn get(&self, id: i64) -> StoreResult<Property> {
        self.with_conn(move |conn| select_one(conn, id)).await
    }

    async fn create(&self, property: NewProperty) -> StoreResult<Property> {
        self.with_conn(move |conn| {
            let created_at = Utc::now();
            conn.execute(
                "INSERT INTO properties (title, description, price_cents, location, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    property.title,
                    property.description,
                    property.price.cents() as i64,
                    property.location,
                    format_timestamp(&created_at)
                ],
            )?;
            let id = conn.last_insert_rowid();
            // Read back so the returned timestamp has the stored precision.
            select_one(conn, id)
        })
        .await
    }

    async fn replace(&self, id: i64, property: NewProperty) -> StoreResult<Property> {
        self.with_conn(move |conn| {
            write_fields(conn, id, &property)?;
            select_one(conn, id)
        })
        .await
    }

    async fn patch(&self, id: i64, patch: PropertyPatch) -> StoreResult<Property> {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let current = select_one(&tx, id)?;
            write_fields(&tx, id, &patch.apply_to(&current))?;
            let updated = select_one(&tx, id)?;
            tx.commit()?;
            Ok(updated)
        })
        .await
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        self.with_conn(move |conn| {
            let removed = conn.execute("DELETE FROM properties WHERE id = ?1", params![id])?;
            if removed == 0 {
                return Err(StoreError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
