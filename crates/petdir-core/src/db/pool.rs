use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::Semaphore;

use crate::db::Database;
use crate::error::{PetDirError, Result};

pub const DEFAULT_POOL_SIZE: usize = 10;

/// Bounded pool of SQLite connections, created once at startup and shared
/// by every request. Cloning is cheap and shares the same connections.
///
/// Each `run` holds one permit for its whole duration, so at most `size`
/// statements are in flight. Connections that fail at the connection level
/// are dropped instead of returned; the next caller opens a fresh one.
#[derive(Clone)]
pub struct PetPool {
    inner: Arc<PoolInner>,
}

struct PoolInner {
    path: String,
    size: usize,
    idle: Mutex<Vec<Database>>,
    permits: Arc<Semaphore>,
}

impl PoolInner {
    fn idle(&self) -> MutexGuard<'_, Vec<Database>> {
        // A panic inside a query never leaves the idle list half-written.
        self.idle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn checkout(&self) -> Result<Database> {
        if let Some(db) = self.idle().pop() {
            return Ok(db);
        }
        log::debug!("Opening new pooled connection to {}", self.path);
        Database::open(&self.path)
    }

    fn checkin(&self, db: Database) {
        let mut idle = self.idle();
        if idle.len() < self.size {
            idle.push(db);
        }
    }
}

impl PetPool {
    /// Open a pool on the database at `path`. One connection is opened
    /// eagerly so a bad path or schema failure surfaces at startup.
    pub fn open(path: &str, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(PetDirError::Pool("pool size must be at least 1".to_string()));
        }
        let first = Database::open(path)?;
        log::info!("Opened pet database at {} (pool size {})", path, size);
        Ok(Self {
            inner: Arc::new(PoolInner {
                path: path.to_string(),
                size,
                idle: Mutex::new(vec![first]),
                permits: Arc::new(Semaphore::new(size)),
            }),
        })
    }

    pub fn size(&self) -> usize {
        self.inner.size
    }

    pub fn idle_count(&self) -> usize {
        self.inner.idle().len()
    }

    /// Run `f` against a pooled connection on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.inner.permits)
            .acquire_owned()
            .await
            .map_err(|e| PetDirError::Pool(e.to_string()))?;
        let inner = Arc::clone(&self.inner);

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let db = inner.checkout()?;
            let result = f(&db);
            match &result {
                Err(e) if e.is_connection_failure() => {
                    log::warn!("Discarding pooled connection after error: {}", e);
                }
                _ => inner.checkin(db),
            }
            result
        })
        .await
        .map_err(|e| PetDirError::Pool(e.to_string()))?
    }
}
