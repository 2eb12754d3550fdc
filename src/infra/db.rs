//! SQLite connection lifecycle and migrations.
//!
//! The pool holds at most one connection, built lazily from the configured
//! connection string on first use. Without a connection string (or when
//! construction fails) the pool stays empty: reads report
//! [`Availability::Unavailable`] and writes fail with [`AppError::Unavailable`].

use crate::error::AppError;
use rusqlite::Connection;
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

/// Connection string used by tests and by `DATABASE_URL=sqlite::memory:`.
pub const MEMORY_URL: &str = "sqlite::memory:";

/// Outcome of a read against a store that may not be configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability<T> {
    Ready(T),
    Unavailable,
}

impl<T> Availability<T> {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(v) => Some(v),
            Self::Unavailable => None,
        }
    }

    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        self.ready().unwrap_or_default()
    }
}

/// Where a connection string points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbSource {
    Memory,
    File(PathBuf),
}

impl DbSource {
    pub fn parse(url: &str) -> Result<Self, AppError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AppError::Config("empty connection string".into()));
        }
        if url == MEMORY_URL || url == ":memory:" {
            return Ok(Self::Memory);
        }
        if let Some(path) = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
        {
            if path.is_empty() {
                return Err(AppError::Config(format!("missing database path in {url}")));
            }
            return Ok(Self::File(PathBuf::from(path)));
        }
        if url.contains("://") {
            return Err(AppError::Config(format!(
                "unsupported connection string scheme: {url}"
            )));
        }
        Ok(Self::File(PathBuf::from(url)))
    }
}

pub struct DbPool {
    database_url: Option<String>,
    conn: Mutex<Option<Connection>>,
}

impl DbPool {
    /// Create a pool without touching storage. Blank URLs count as unset.
    pub fn new(database_url: Option<String>) -> Self {
        Self {
            database_url: database_url.filter(|u| !u.trim().is_empty()),
            conn: Mutex::new(None),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.database_url.is_some()
    }

    /// True once a connection has been built.
    pub fn is_connected(&self) -> bool {
        self.conn.lock().expect("db lock").is_some()
    }
}

/// Locked access to the pool's connection.
pub struct DbConn<'a>(MutexGuard<'a, Option<Connection>>);

impl Deref for DbConn<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.0.as_ref().expect("connection present")
    }
}

/// Return the shared connection, building it on first use.
///
/// `None` means no database: either no connection string is configured or
/// construction failed. Failures are logged and retried on the next call.
pub fn acquire_connection(pool: &DbPool) -> Option<DbConn<'_>> {
    let mut guard = pool.conn.lock().expect("db lock");
    if guard.is_none() {
        let url = pool.database_url.as_deref()?;
        match open_connection(url) {
            Ok(conn) => {
                log::info!("[Database] Connected ({})", url);
                *guard = Some(conn);
            }
            Err(e) => {
                log::warn!("[Database] Failed to connect: {}", e);
                return None;
            }
        }
    }
    Some(DbConn(guard))
}

/// Connection for writes: a missing database is an error.
pub(crate) fn get_connection(pool: &DbPool) -> Result<DbConn<'_>, AppError> {
    acquire_connection(pool).ok_or(AppError::Unavailable)
}

fn open_connection(url: &str) -> Result<Connection, AppError> {
    let mut conn = match DbSource::parse(url)? {
        DbSource::Memory => Connection::open_in_memory()?,
        DbSource::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Connection::open(&path)?
        }
    };
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    run_migrations(&mut conn)?;
    Ok(conn)
}

/// Schema scripts, applied in order. Each runs once and is recorded by version.
const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../../migrations/0001_init.sql"))];

fn run_migrations(conn: &mut Connection) -> Result<(), AppError> {
    let tx = conn.transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )?;

    let current: i64 =
        tx.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_migrations", [], |r| {
            r.get(0)
        })?;

    for (version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        log::info!("[Database] Applying migration {}", version);
        tx.execute_batch(sql)?;
        tx.execute("INSERT INTO schema_migrations (version) VALUES (?1)", [version])?;
    }

    tx.commit()?;
    Ok(())
}

/// In-memory pool with migrations applied, for tests.
pub fn init_test_db() -> DbPool {
    let pool = DbPool::new(Some(MEMORY_URL.to_string()));
    assert!(
        acquire_connection(&pool).is_some(),
        "in-memory database should open"
    );
    pool
}
