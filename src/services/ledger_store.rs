use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use crate::errors::{StorageError, StorageResult};
use crate::models::{EntryId, EntryScope, EntryView, NewEntry, NewUser, User, UserId};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT UNIQUE NOT NULL,
        password TEXT NOT NULL,
        name TEXT NOT NULL,
        role TEXT NOT NULL,
        hour_limit REAL NOT NULL
    );
    CREATE TABLE IF NOT EXISTS entries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id),
        work_type TEXT NOT NULL,
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL,
        description TEXT NOT NULL,
        hours REAL NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_entries_user_id ON entries(user_id);
    CREATE INDEX IF NOT EXISTS idx_entries_start_time ON entries(start_time);
";

const USER_COLUMNS: &str = "id, username, password, name, role, hour_limit";

const ENTRY_VIEW_SELECT: &str = "
    SELECT e.id, e.user_id, u.name, e.work_type, e.start_time, e.end_time, e.description, e.hours
    FROM entries e JOIN users u ON e.user_id = u.id";

// Most recent first; equal start times keep insertion order.
const ENTRY_ORDER: &str = "ORDER BY e.start_time DESC, e.id ASC";

/// SQLite-backed storage for users and their time entries.
///
/// One connection behind a mutex: every write in the process is serialised,
/// and `transaction` additionally takes SQLite's write lock up front.
#[derive(Clone)]
pub struct LedgerStore {
    conn: Arc<Mutex<Connection>>,
}

impl LedgerStore {
    /// Opens (or creates) the database at `path`. `:memory:` gives a private in-memory database.
    pub fn open(path: &str) -> StorageResult<Self> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Connection::open(path)?
        };

        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(Duration::from_secs(5))?;

        tracing::info!("Ledger store opened: {}", path);
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }

    pub fn init_schema(&self) -> StorageResult<()> {
        self.lock()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub fn find_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        let conn = self.lock()?;
        find_user_by_username(&conn, username)
    }

    pub fn find_user_by_id(&self, id: UserId) -> StorageResult<Option<User>> {
        let conn = self.lock()?;
        find_user_by_id(&conn, id)
    }

    pub fn list_entries(&self, scope: EntryScope) -> StorageResult<Vec<EntryView>> {
        let conn = self.lock()?;
        list_entries(&conn, scope)
    }

    pub fn sum_hours(&self, user_id: UserId) -> StorageResult<f64> {
        let conn = self.lock()?;
        sum_hours(&conn, user_id)
    }

    pub fn insert_entry(&self, entry: &NewEntry) -> StorageResult<EntryId> {
        let conn = self.lock()?;
        insert_entry(&conn, entry)
    }

    pub fn insert_user(&self, user: &NewUser) -> StorageResult<UserId> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO users (username, password, name, role, hour_limit) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user.username, user.password_hash, user.name, user.role, user.hour_limit],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn user_count(&self) -> StorageResult<usize> {
        let count: i64 = self
            .lock()?
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Runs `f` inside one IMMEDIATE transaction while holding the connection lock.
    /// Commits on `Ok`; any `Err` rolls everything back.
    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&LedgerTx<'_>) -> Result<T, E>,
        E: From<StorageError>,
    {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StorageError::from)?;

        let result = f(&LedgerTx { tx: &tx })?;

        tx.commit().map_err(StorageError::from)?;
        Ok(result)
    }
}

/// Read/write view of the ledger inside a transaction.
pub struct LedgerTx<'a> {
    tx: &'a Transaction<'a>,
}

impl LedgerTx<'_> {
    pub fn find_user_by_id(&self, id: UserId) -> StorageResult<Option<User>> {
        find_user_by_id(self.tx, id)
    }

    pub fn sum_hours(&self, user_id: UserId) -> StorageResult<f64> {
        sum_hours(self.tx, user_id)
    }

    pub fn insert_entry(&self, entry: &NewEntry) -> StorageResult<EntryId> {
        insert_entry(self.tx, entry)
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        password_hash: row.get("password")?,
        name: row.get("name")?,
        role: row.get("role")?,
        hour_limit: row.get("hour_limit")?,
    })
}

fn entry_view_from_row(row: &Row<'_>) -> rusqlite::Result<EntryView> {
    Ok(EntryView {
        id: row.get(0)?,
        user_id: row.get(1)?,
        user_name: row.get(2)?,
        work_type: row.get(3)?,
        start_time: row.get(4)?,
        end_time: row.get(5)?,
        description: row.get(6)?,
        hours: row.get(7)?,
    })
}

fn find_user_by_username(conn: &Connection, username: &str) -> StorageResult<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {} FROM users WHERE username = ?1", USER_COLUMNS),
            params![username],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

fn find_user_by_id(conn: &Connection, id: UserId) -> StorageResult<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
            params![id],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

fn list_entries(conn: &Connection, scope: EntryScope) -> StorageResult<Vec<EntryView>> {
    let entries = match scope {
        EntryScope::All => {
            let mut stmt = conn.prepare(&format!("{} {}", ENTRY_VIEW_SELECT, ENTRY_ORDER))?;
            let rows = stmt.query_map([], entry_view_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        }
        EntryScope::ForUser(user_id) => {
            let mut stmt = conn.prepare(&format!(
                "{} WHERE e.user_id = ?1 {}",
                ENTRY_VIEW_SELECT, ENTRY_ORDER
            ))?;
            let rows = stmt.query_map(params![user_id], entry_view_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        }
    };
    Ok(entries)
}

fn sum_hours(conn: &Connection, user_id: UserId) -> StorageResult<f64> {
    let total: f64 = conn.query_row(
        "SELECT COALESCE(SUM(hours), 0.0) FROM entries WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )?;
    Ok(total)
}

fn insert_entry(conn: &Connection, entry: &NewEntry) -> StorageResult<EntryId> {
    conn.execute(
        "INSERT INTO entries (user_id, work_type, start_time, end_time, description, hours)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            entry.user_id,
            entry.work_type,
            entry.start_time,
            entry.end_time,
            entry.description,
            entry.hours,
        ],
    )
    .map_err(|e| StorageError::from_entry_insert(e, entry.user_id))?;
    Ok(conn.last_insert_rowid())
}
