//! SQLite chunk store.
//!
//! Ingest writes chunks here; the server reads them all back at startup to
//! build its in-memory retrieval index. Rows carry the source filename and
//! the chunk's position within it, so re-ingesting a document replaces its
//! rows instead of duplicating them.

use rusqlite::{params, Connection};
use std::collections::BTreeSet;
use std::path::Path;

use lexscope_core::types::ContractChunk;

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}

pub struct ChunkStore {
    conn: Connection,
}

impl ChunkStore {
    /// Open (or create) the store at `path`, creating parent directories and
    /// running migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;

            CREATE TABLE IF NOT EXISTS contract_chunks (
              id INTEGER PRIMARY KEY,
              filename TEXT NOT NULL,
              chunk_index INTEGER NOT NULL,
              content TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_contract_chunks_filename
              ON contract_chunks(filename);
            "#,
        )?;
        Ok(())
    }

    /// Insert chunks, replacing any existing rows for the filenames they
    /// cover. One transaction; either everything lands or nothing does.
    pub fn replace_chunks(&mut self, chunks: &[ContractChunk]) -> Result<usize, StoreError> {
        let filenames: BTreeSet<&str> = chunks.iter().map(|c| c.filename.as_str()).collect();

        let tx = self.conn.transaction()?;
        for filename in filenames {
            tx.execute("DELETE FROM contract_chunks WHERE filename=?1", params![filename])?;
        }
        for chunk in chunks {
            tx.execute(
                "INSERT INTO contract_chunks (filename, chunk_index, content) VALUES (?1, ?2, ?3)",
                params![chunk.filename, chunk.chunk_index as i64, chunk.content],
            )?;
        }
        tx.commit()?;
        Ok(chunks.len())
    }

    /// Load every stored chunk, ordered by filename then chunk position.
    pub fn load_all(&self) -> Result<Vec<ContractChunk>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT filename, chunk_index, content FROM contract_chunks
             ORDER BY filename, chunk_index",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ContractChunk {
                filename: row.get(0)?,
                chunk_index: row.get::<_, i64>(1)? as usize,
                content: row.get(2)?,
            })
        })?;
        let mut chunks = Vec::new();
        for row in rows {
            chunks.push(row?);
        }
        Ok(chunks)
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 =
            self.conn.query_row("SELECT COUNT(*) FROM contract_chunks", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
