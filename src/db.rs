//! The handle to the application database and its schema.

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use rusqlite::Connection;

use crate::{Error, budget::create_budget_table, record::create_record_table};

/// How long a query waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A handle to the database that backs records and budgets.
///
/// A store is either connected, sharing a single SQLite connection, or
/// disconnected because the database could not be opened when the server
/// started. A disconnected store answers every request with
/// [Error::StoreUnavailable].
#[derive(Debug, Clone, Default)]
pub struct Store {
    connection: Option<Arc<Mutex<Connection>>>,
}

impl Store {
    /// Create a connected store, creating the tables if needed.
    ///
    /// # Errors
    /// Returns an error if the tables cannot be created.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self {
            connection: Some(Arc::new(Mutex::new(connection))),
        })
    }

    /// Create a store that has no database behind it.
    pub fn disconnected() -> Self {
        Self { connection: None }
    }

    /// Open the SQLite database at `path` and check that it is usable.
    ///
    /// This is the only attempt to reach the database. If it fails, the
    /// failure is logged and a disconnected store is returned so that the
    /// server can still report its status.
    pub fn open(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::warn!("No database path set, database features are unavailable");
            return Self::disconnected();
        };

        match probe(path).and_then(Self::new) {
            Ok(store) => {
                tracing::info!("Connected to the database at {}", path.display());
                store
            }
            Err(error) => {
                tracing::error!(
                    "Could not connect to the database at {}: {error}",
                    path.display()
                );
                Self::disconnected()
            }
        }
    }

    /// Whether the store has a database behind it.
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Acquire the database connection.
    ///
    /// # Errors
    /// Returns [Error::StoreUnavailable] if the store is disconnected, or
    /// [Error::DatabaseLockError] if the lock is poisoned.
    pub fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        let connection = self.connection.as_ref().ok_or(Error::StoreUnavailable)?;

        connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

fn probe(path: &Path) -> Result<Connection, Error> {
    let connection = Connection::open(path)?;
    connection.busy_timeout(BUSY_TIMEOUT)?;
    connection.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;

    Ok(connection)
}

/// Create all the tables used by the application.
///
/// # Errors
/// Returns an error if a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    create_record_table(connection)?;
    create_budget_table(connection)?;

    Ok(())
}
