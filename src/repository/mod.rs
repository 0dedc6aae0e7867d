mod embedded;

use embedded::migrations;

use async_trait::async_trait;
use deadpool_postgres::{
    Client, CreatePoolError, ManagerConfig, Pool, PoolConfig, PoolError, RecyclingMethod, Runtime,
};
use tokio_postgres::{NoTls, Row};

use crate::models::{Note, NoteCreate, NoteId, NoteUpdate, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to build connection pool: {0}")]
    CreatePool(#[from] CreatePoolError),

    #[error("failed to acquire database session: {0}")]
    Pool(#[from] PoolError),

    #[error("database query failed: {0}")]
    Query(#[from] tokio_postgres::Error),

    #[error("database migration failed: {0}")]
    Migration(#[from] refinery::Error),

    #[error("inserted note could not be read back")]
    MissingAfterInsert,

    #[error("stored row violates note invariants: {0}")]
    CorruptRow(#[from] ValidationError),
}

/// Persistence gateway for notes. Every call is one independent unit of work.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// All notes, most recently updated first, ties broken by id descending.
    async fn list(&self) -> Result<Vec<Note>, StoreError>;

    async fn get(&self, id: NoteId) -> Result<Option<Note>, StoreError>;

    /// Inserts a note and returns it as persisted, with store-assigned id and
    /// timestamps.
    async fn create(&self, note: NoteCreate) -> Result<Note, StoreError>;

    /// Merges `patch` into the stored note. `None` if no such note exists.
    async fn update(&self, id: NoteId, patch: NoteUpdate) -> Result<Option<Note>, StoreError>;

    /// Whether a row was actually removed.
    async fn delete(&self, id: NoteId) -> Result<bool, StoreError>;
}

pub struct PgNoteStore {
    pool: Pool,
}

impl PgNoteStore {
    pub fn new(database_dsn: &str, pool_size: usize) -> Result<Self, StoreError> {
        let mut cfg = deadpool_postgres::Config::new();
        cfg.url = Some(database_dsn.to_owned());
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        cfg.pool = Some(PoolConfig::new(pool_size));

        let pool = cfg.create_pool(Some(Runtime::Tokio1), NoTls)?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        let mut client = self.session().await?;
        let migrations_report = migrations::runner().run_async(&mut **client).await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }

    // Dropping the returned client hands the connection back to the pool.
    async fn session(&self) -> Result<Client, StoreError> {
        Ok(self.pool.get().await?)
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn list(&self) -> Result<Vec<Note>, StoreError> {
        let client = self.session().await?;
        let rows = client
            .query(
                "SELECT id, title, content, created_at, updated_at FROM notes \
                 ORDER BY updated_at DESC, id DESC",
                &[],
            )
            .await?;

        rows.iter().map(note_from_row).collect()
    }

    async fn get(&self, id: NoteId) -> Result<Option<Note>, StoreError> {
        let client = self.session().await?;
        let row = client
            .query_opt(
                "SELECT id, title, content, created_at, updated_at FROM notes WHERE id = $1",
                &[&id.get()],
            )
            .await?;

        row.as_ref().map(note_from_row).transpose()
    }

    async fn create(&self, note: NoteCreate) -> Result<Note, StoreError> {
        let client = self.session().await?;
        let row = client
            .query_opt(
                "INSERT INTO notes (title, content) VALUES ($1, $2) \
                 RETURNING id, title, content, created_at, updated_at",
                &[&note.title(), &note.content()],
            )
            .await?;

        match row {
            Some(row) => note_from_row(&row),
            None => {
                tracing::error!("insert into notes returned no row");
                Err(StoreError::MissingAfterInsert)
            }
        }
    }

    async fn update(&self, id: NoteId, patch: NoteUpdate) -> Result<Option<Note>, StoreError> {
        let mut client = self.session().await?;
        let tx = client.transaction().await?;

        let Some(row) = tx
            .query_opt(
                "SELECT id, title, content, created_at, updated_at FROM notes \
                 WHERE id = $1 FOR UPDATE",
                &[&id.get()],
            )
            .await?
        else {
            return Ok(None);
        };

        let merged = patch.merge(note_from_row(&row)?);

        // GREATEST keeps updated_at monotonic if the server clock steps back.
        let row = tx
            .query_one(
                "UPDATE notes SET title = $2, content = $3, \
                 updated_at = GREATEST(now(), updated_at) \
                 WHERE id = $1 RETURNING id, title, content, created_at, updated_at",
                &[&id.get(), &merged.title, &merged.content],
            )
            .await?;
        let updated = note_from_row(&row)?;

        tx.commit().await?;
        tracing::debug!(%id, "note updated");

        Ok(Some(updated))
    }

    async fn delete(&self, id: NoteId) -> Result<bool, StoreError> {
        let client = self.session().await?;
        let rows = client
            .execute("DELETE FROM notes WHERE id = $1", &[&id.get()])
            .await?;

        Ok(rows == 1)
    }
}

fn note_from_row(row: &Row) -> Result<Note, StoreError> {
    Ok(Note {
        id: NoteId::new(row.get("id"))?,
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
