//! `SQLite`-backed corpus store.

use super::connection::{acquire_lock, configure_connection};
use super::metrics::record_operation_metrics;
use crate::models::{CorpusEntry, DuplicateReport, EntryId, Scope, TextEntry};
use crate::storage::traits::CorpusStore;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;
use tracing::instrument;

const SELECT_ENTRY: &str = "SELECT id, owner, content, created_at, duplicates FROM text_entries";

/// Corpus store persisted in a single `SQLite` database.
///
/// Duplicate reports are stored as JSON alongside the text; timestamps as
/// nanoseconds since the Unix epoch so listing order is exact.
pub struct SqliteCorpusStore {
    /// Database connection (mutex for interior mutability).
    conn: Mutex<Connection>,
}

impl SqliteCorpusStore {
    /// Opens (or creates) a store at `path`.
    ///
    /// Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::operation("create_data_dir", e))?;
        }
        let conn = Connection::open(path).map_err(|e| Error::operation("open_corpus_database", e))?;
        Self::from_connection(conn)
    }

    /// Creates an in-memory store (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::operation("open_corpus_database_memory", e))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        configure_connection(&conn)?;
        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS text_entries (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                owner TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                duplicates TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_text_entries_owner ON text_entries(owner);
            CREATE INDEX IF NOT EXISTS idx_text_entries_created ON text_entries(created_at);
            ",
        )
        .map_err(|e| Error::operation("initialize_corpus_schema", e))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Runs `f` with the connection, recording metrics for the outcome.
    fn with_conn<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        let start = Instant::now();
        let conn = acquire_lock(&self.conn);
        let result = f(&conn);
        let status = if result.is_ok() { "success" } else { "error" };
        record_operation_metrics(operation, start, status);
        result
    }
}

/// Builds the `WHERE` clause and parameters for a scope.
fn scope_filter(scope: &Scope) -> (&'static str, Vec<Value>) {
    match scope {
        Scope::Owner(owner) => (" WHERE owner = ?", vec![Value::Text(owner.clone())]),
        Scope::All => ("", Vec::new()),
    }
}

fn to_db_timestamp(ts: DateTime<Utc>) -> Result<i64> {
    ts.timestamp_nanos_opt()
        .ok_or_else(|| Error::InvalidInput(format!("timestamp {ts} is out of range")))
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<(TextEntry, String)> {
    let id: String = row.get(0)?;
    let created_at: i64 = row.get(3)?;
    let duplicates: String = row.get(4)?;
    let entry = TextEntry {
        id: EntryId::new(id),
        owner: row.get(1)?,
        content: row.get(2)?,
        created_at: DateTime::from_timestamp_nanos(created_at),
        duplicates: DuplicateReport::default(),
    };
    Ok((entry, duplicates))
}

/// Attaches the decoded JSON report to a row.
fn decode((mut entry, duplicates): (TextEntry, String)) -> Result<TextEntry> {
    entry.duplicates = serde_json::from_str(&duplicates)
        .map_err(|e| Error::operation("decode_duplicates", e))?;
    Ok(entry)
}

fn encode_report(report: &DuplicateReport) -> Result<String> {
    serde_json::to_string(report).map_err(|e| Error::operation("encode_duplicates", e))
}

impl CorpusStore for SqliteCorpusStore {
    #[instrument(skip_all, fields(operation = "find_entries", scope = %scope))]
    fn find_entries(&self, scope: &Scope) -> Result<Vec<CorpusEntry>> {
        self.with_conn("find_entries", |conn| {
            let (filter, values) = scope_filter(scope);
            let sql = format!("SELECT id, content FROM text_entries{filter} ORDER BY seq");
            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| Error::operation("find_entries", e))?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(values), |row| {
                    Ok(CorpusEntry::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })
                .map_err(|e| Error::operation("find_entries", e))?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
                .map_err(|e| Error::operation("find_entries", e))
        })
    }

    #[instrument(skip_all, fields(operation = "save", id = %entry.id))]
    fn save(&self, entry: &TextEntry) -> Result<()> {
        let duplicates = encode_report(&entry.duplicates)?;
        let created_at = to_db_timestamp(entry.created_at)?;
        self.with_conn("save", |conn| {
            conn.execute(
                "INSERT INTO text_entries (id, owner, content, created_at, duplicates)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![entry.id.as_str(), entry.owner, entry.content, created_at, duplicates],
            )
            .map_err(|e| Error::operation("save", e))?;
            Ok(())
        })
    }

    #[instrument(skip_all, fields(operation = "update_duplicate_metadata", id = %id))]
    fn update_duplicate_metadata(&self, id: &EntryId, report: &DuplicateReport) -> Result<()> {
        let duplicates = encode_report(report)?;
        self.with_conn("update_duplicate_metadata", |conn| {
            let changed = conn
                .execute(
                    "UPDATE text_entries SET duplicates = ?1 WHERE id = ?2",
                    params![duplicates, id.as_str()],
                )
                .map_err(|e| Error::operation("update_duplicate_metadata", e))?;
            if changed == 0 {
                return Err(Error::NotFound(format!("text entry {id}")));
            }
            Ok(())
        })
    }

    #[instrument(skip_all, fields(operation = "get", id = %id, scope = %scope))]
    fn get(&self, id: &EntryId, scope: &Scope) -> Result<Option<TextEntry>> {
        let row = self.with_conn("get", |conn| {
            conn.query_row(
                &format!("{SELECT_ENTRY} WHERE id = ?1"),
                params![id.as_str()],
                entry_from_row,
            )
            .optional()
            .map_err(|e| Error::operation("get", e))
        })?;

        match row {
            Some(row) => {
                let entry = decode(row)?;
                Ok(scope.includes(&entry.owner).then_some(entry))
            },
            None => Ok(None),
        }
    }

    #[instrument(skip_all, fields(operation = "list", scope = %scope, offset = offset, limit = limit))]
    fn list(&self, scope: &Scope, offset: usize, limit: usize) -> Result<Vec<TextEntry>> {
        let rows = self.with_conn("list", |conn| {
            let (filter, mut values) = scope_filter(scope);
            values.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
            values.push(Value::Integer(i64::try_from(offset).unwrap_or(i64::MAX)));
            let sql =
                format!("{SELECT_ENTRY}{filter} ORDER BY created_at DESC, seq DESC LIMIT ? OFFSET ?");
            let mut stmt = conn.prepare(&sql).map_err(|e| Error::operation("list", e))?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(values), entry_from_row)
                .map_err(|e| Error::operation("list", e))?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
                .map_err(|e| Error::operation("list", e))
        })?;

        rows.into_iter().map(decode).collect()
    }

    #[instrument(skip_all, fields(operation = "count", scope = %scope))]
    fn count(&self, scope: &Scope) -> Result<usize> {
        self.with_conn("count", |conn| {
            let (filter, values) = scope_filter(scope);
            let count: i64 = conn
                .query_row(
                    &format!("SELECT COUNT(*) FROM text_entries{filter}"),
                    rusqlite::params_from_iter(values),
                    |row| row.get(0),
                )
                .map_err(|e| Error::operation("count", e))?;
            usize::try_from(count).map_err(|e| Error::operation("count", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExternalMatch, InternalMatch, MatchKind};
    use chrono::Duration;
    use tempfile::TempDir;

    fn report() -> DuplicateReport {
        DuplicateReport::new(
            vec![InternalMatch {
                index: 1,
                paragraph: "A.".to_string(),
                original_index: 0,
                kind: MatchKind::Exact,
            }],
            vec![ExternalMatch {
                source_id: EntryId::new("older"),
                source_paragraph_index: 2,
                paragraph: "B.".to_string(),
                new_text_index: 0,
                kind: MatchKind::Similar,
            }],
        )
    }

    #[test]
    fn test_save_and_get_preserves_entry() {
        let store = SqliteCorpusStore::in_memory().unwrap();
        let entry = TextEntry::new("alice", "A.\nA.").with_duplicates(report());
        store.save(&entry).unwrap();

        let loaded = store.get(&entry.id, &Scope::owner("alice")).unwrap();
        assert_eq!(loaded, Some(entry.clone()));
        assert!(store.get(&entry.id, &Scope::owner("bob")).unwrap().is_none());
        assert!(store.get(&EntryId::new("missing"), &Scope::All).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let store = SqliteCorpusStore::in_memory().unwrap();
        let entry = TextEntry::new("alice", "x");
        store.save(&entry).unwrap();
        assert!(matches!(store.save(&entry), Err(Error::OperationFailed { .. })));
    }

    #[test]
    fn test_find_entries_scope_and_order() {
        let store = SqliteCorpusStore::in_memory().unwrap();
        let entries = [
            TextEntry::new("alice", "one"),
            TextEntry::new("bob", "two"),
            TextEntry::new("alice", "three"),
        ];
        for e in &entries {
            store.save(e).unwrap();
        }

        let alice: Vec<_> = store
            .find_entries(&Scope::owner("alice"))
            .unwrap()
            .into_iter()
            .map(|e| e.content)
            .collect();
        assert_eq!(alice, vec!["one", "three"]);
        assert_eq!(store.find_entries(&Scope::All).unwrap().len(), 3);
        assert_eq!(store.count(&Scope::owner("bob")).unwrap(), 1);
        assert_eq!(store.count(&Scope::All).unwrap(), 3);
    }

    #[test]
    fn test_update_duplicate_metadata() {
        let store = SqliteCorpusStore::in_memory().unwrap();
        let entry = TextEntry::new("alice", "A.\nA.");
        store.save(&entry).unwrap();

        store.update_duplicate_metadata(&entry.id, &report()).unwrap();
        let loaded = store.get(&entry.id, &Scope::All).unwrap().unwrap();
        assert_eq!(loaded.duplicates, report());

        let missing = store.update_duplicate_metadata(&EntryId::new("nope"), &report());
        assert!(matches!(missing, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_list_pages_newest_first() {
        let store = SqliteCorpusStore::in_memory().unwrap();
        let now = Utc::now();
        for i in 0..5 {
            let mut e = TextEntry::new("alice", format!("text {i}"));
            e.created_at = now + Duration::seconds(i);
            store.save(&e).unwrap();
        }

        let first: Vec<_> = store
            .list(&Scope::owner("alice"), 0, 2)
            .unwrap()
            .into_iter()
            .map(|e| e.content)
            .collect();
        assert_eq!(first, vec!["text 4", "text 3"]);

        let last = store.list(&Scope::owner("alice"), 4, 2).unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].content, "text 0");
    }

    #[test]
    fn test_reopen_file_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("paradup.db");
        let entry = TextEntry::new("alice", "persisted");
        {
            let store = SqliteCorpusStore::new(&path).unwrap();
            store.save(&entry).unwrap();
        }

        let store = SqliteCorpusStore::new(&path).unwrap();
        assert_eq!(store.get(&entry.id, &Scope::All).unwrap(), Some(entry));
    }
}
