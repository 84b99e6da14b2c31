//! DuckDB-backed generation store
//!
//! Generations live in a single `generations` table. Queries are blocking, so
//! the async store methods hand them to `spawn_blocking`.

use crate::error::{Error, Result};
use crate::pagination::page_offset;
use crate::store::{Generation, GenerationStore, NamedRef, TextRef, Visibility};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use duckdb::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const IN_MEMORY: &str = ":memory:";

const CREATE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS generations (
    id VARCHAR PRIMARY KEY,
    width BIGINT NOT NULL,
    height BIGINT NOT NULL,
    prompt_id VARCHAR NOT NULL,
    prompt_text VARCHAR NOT NULL,
    negative_prompt_id VARCHAR,
    negative_prompt_text VARCHAR,
    model_id VARCHAR NOT NULL,
    model_name VARCHAR NOT NULL,
    scheduler_id VARCHAR NOT NULL,
    scheduler_name VARCHAR NOT NULL,
    seed BIGINT NOT NULL,
    inference_steps BIGINT NOT NULL,
    guidance_scale DOUBLE NOT NULL,
    image_id VARCHAR NOT NULL,
    hidden BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL
);
";

const SELECT_COLUMNS: &str = "
    id, width, height,
    prompt_id, prompt_text,
    negative_prompt_id, negative_prompt_text,
    model_id, model_name,
    scheduler_id, scheduler_name,
    seed, inference_steps, guidance_scale, image_id, hidden,
    CAST(created_at AS VARCHAR), CAST(updated_at AS VARCHAR)";

const INSERT_GENERATION: &str = "
INSERT OR REPLACE INTO generations (
    id, width, height,
    prompt_id, prompt_text,
    negative_prompt_id, negative_prompt_text,
    model_id, model_name,
    scheduler_id, scheduler_name,
    seed, inference_steps, guidance_scale, image_id, hidden,
    created_at, updated_at
) VALUES (
    ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
    CAST(? AS TIMESTAMP), CAST(? AS TIMESTAMP)
)";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Generation store backed by a DuckDB database (file or in-memory)
#[derive(Clone)]
pub struct DuckDbStore {
    /// Shared DuckDB connection
    conn: Arc<Mutex<Connection>>,
    /// Database location (for logging)
    location: String,
}

impl std::fmt::Debug for DuckDbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDbStore")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl DuckDbStore {
    /// Open a database file, or an in-memory database for `:memory:`
    pub fn open(location: &str) -> Result<Self> {
        let conn = if location == IN_MEMORY {
            Connection::open_in_memory()
        } else {
            Connection::open(location)
        }
        .map_err(|e| Error::store(format!("Failed to open DuckDB database '{location}': {e}")))?;

        tracing::debug!(location, "Opened DuckDB database");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            location: location.to_string(),
        })
    }

    /// Open an empty in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::open(IN_MEMORY)
    }

    /// Database location this store was opened with
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Create the generations table if it does not exist
    pub fn init_schema(&self) -> Result<()> {
        self.lock()?.execute_batch(CREATE_SCHEMA)?;
        Ok(())
    }

    /// Insert (or replace) generations in a single transaction
    pub fn insert(&self, generations: &[Generation]) -> Result<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(INSERT_GENERATION)?;
            for g in generations {
                let created_at = format_timestamp(g.created_at);
                let updated_at = format_timestamp(g.updated_at);
                stmt.execute(params![
                    g.id,
                    i64::from(g.width),
                    i64::from(g.height),
                    g.prompt.id,
                    g.prompt.text,
                    g.negative_prompt.as_ref().map(|p| p.id.as_str()),
                    g.negative_prompt.as_ref().map(|p| p.text.as_str()),
                    g.model.id,
                    g.model.name,
                    g.scheduler.id,
                    g.scheduler.name,
                    g.seed,
                    i64::from(g.inference_steps),
                    g.guidance_scale,
                    g.image_id,
                    g.hidden,
                    created_at,
                    updated_at
                ])?;
            }
        }
        tx.commit()?;

        tracing::info!(
            count = generations.len(),
            location = %self.location,
            "Inserted generations"
        );
        Ok(generations.len())
    }

    /// Count generations passing the visibility filter
    pub fn count(&self, visibility: Visibility) -> Result<u64> {
        let sql = format!(
            "SELECT COUNT(*) FROM generations{}",
            where_clause(visibility)
        );
        let conn = self.lock()?;
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Blocking page query: `limit` rows starting at the page's offset
    pub fn fetch_page_blocking(
        &self,
        page: u64,
        limit: usize,
        visibility: Visibility,
    ) -> Result<Vec<Generation>> {
        let offset = i64::try_from(page_offset(page, limit)).unwrap_or(i64::MAX);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM generations{} \
             ORDER BY created_at DESC, id DESC LIMIT {limit} OFFSET {offset}",
            where_clause(visibility)
        );

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], RawGeneration::from_row)?;

        let mut generations = Vec::new();
        for row in rows {
            generations.push(row?.into_generation()?);
        }
        Ok(generations)
    }

    /// Blocking lookup by id
    pub fn get_blocking(&self, id: &str) -> Result<Option<Generation>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM generations WHERE id = ?");

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![id], RawGeneration::from_row)?;

        let first = rows.next().transpose()?;
        first.map(RawGeneration::into_generation).transpose()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::store("DuckDB connection lock poisoned"))
    }

    async fn run_blocking<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&DuckDbStore) -> Result<T> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || op(&store))
            .await
            .map_err(|e| Error::store(format!("DuckDB query task failed: {e}")))?
    }
}

#[async_trait]
impl GenerationStore for DuckDbStore {
    type Record = Generation;
    type Filter = Visibility;

    async fn fetch_page(
        &self,
        page: u64,
        limit: usize,
        filter: &Visibility,
    ) -> Result<Vec<Generation>> {
        let visibility = *filter;
        self.run_blocking(move |store| store.fetch_page_blocking(page, limit, visibility))
            .await
    }

    async fn get(&self, id: &str) -> Result<Option<Generation>> {
        let id = id.to_string();
        self.run_blocking(move |store| store.get_blocking(&id)).await
    }
}

fn where_clause(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::VisibleOnly => " WHERE hidden = false",
        Visibility::HiddenOnly => " WHERE hidden = true",
        Visibility::All => "",
    }
}

/// A row as read from DuckDB, before numeric and timestamp conversion
struct RawGeneration {
    id: String,
    width: i64,
    height: i64,
    prompt_id: String,
    prompt_text: String,
    negative_prompt_id: Option<String>,
    negative_prompt_text: Option<String>,
    model_id: String,
    model_name: String,
    scheduler_id: String,
    scheduler_name: String,
    seed: i64,
    inference_steps: i64,
    guidance_scale: f64,
    image_id: String,
    hidden: bool,
    created_at: String,
    updated_at: String,
}

impl RawGeneration {
    fn from_row(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            width: row.get(1)?,
            height: row.get(2)?,
            prompt_id: row.get(3)?,
            prompt_text: row.get(4)?,
            negative_prompt_id: row.get(5)?,
            negative_prompt_text: row.get(6)?,
            model_id: row.get(7)?,
            model_name: row.get(8)?,
            scheduler_id: row.get(9)?,
            scheduler_name: row.get(10)?,
            seed: row.get(11)?,
            inference_steps: row.get(12)?,
            guidance_scale: row.get(13)?,
            image_id: row.get(14)?,
            hidden: row.get(15)?,
            created_at: row.get(16)?,
            updated_at: row.get(17)?,
        })
    }

    fn into_generation(self) -> Result<Generation> {
        let id = self.id;
        let to_u32 = |field: &str, value: i64| {
            u32::try_from(value)
                .map_err(|_| Error::invalid_record(&id, format!("{field} out of range: {value}")))
        };

        let negative_prompt = match (self.negative_prompt_id, self.negative_prompt_text) {
            (Some(id), Some(text)) => Some(TextRef { id, text }),
            _ => None,
        };

        Ok(Generation {
            width: to_u32("width", self.width)?,
            height: to_u32("height", self.height)?,
            inference_steps: to_u32("inference_steps", self.inference_steps)?,
            created_at: parse_timestamp(&id, &self.created_at)?,
            updated_at: parse_timestamp(&id, &self.updated_at)?,
            prompt: TextRef {
                id: self.prompt_id,
                text: self.prompt_text,
            },
            negative_prompt,
            model: NamedRef {
                id: self.model_id,
                name: self.model_name,
            },
            scheduler: NamedRef {
                id: self.scheduler_id,
                name: self.scheduler_name,
            },
            seed: self.seed,
            guidance_scale: self.guidance_scale,
            image_id: self.image_id,
            hidden: self.hidden,
            id,
        })
    }
}

/// Timestamps are written truncated to microseconds, the precision DuckDB keeps
fn format_timestamp(value: DateTime<Utc>) -> String {
    value
        .trunc_subsecs(6)
        .naive_utc()
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

fn parse_timestamp(id: &str, value: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| Error::invalid_record(id, format!("bad timestamp '{value}': {e}")))
}
