//! Async wrapper around [`Ringshelf`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all shelf operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free. The
//! underlying operations are short blocking HTTP round trips, making this
//! approach efficient.
//!
//! # Example
//!
//! ```no_run
//! use ringshelf::AsyncRingshelf;
//!
//! #[tokio::main]
//! async fn main() {
//!     let shelf = AsyncRingshelf::builder().build().await.unwrap();
//!
//!     // Run any sync shelf method via closure
//!     let decks = shelf.run(|s| s.decks().list()).await.unwrap();
//! }
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{Result, RingshelfError};
use crate::store::Store;
use crate::{Ringshelf, RingshelfBuilder};

// ---------------------------------------------------------------------------
// AsyncRingshelfBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncRingshelf`] instance.
#[derive(Default)]
pub struct AsyncRingshelfBuilder {
    inner: RingshelfBuilder,
}

impl AsyncRingshelfBuilder {
    /// Set a custom cache directory.
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.inner = self.inner.cache_dir(path);
        self
    }

    /// Enable or disable offline mode.
    pub fn offline(mut self, offline: bool) -> Self {
        self.inner = self.inner.offline(offline);
        self
    }

    /// Set the HTTP request timeout for card-API downloads.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }

    /// Use a specific store implementation.
    pub fn store(mut self, store: Box<dyn Store>) -> Self {
        self.inner = self.inner.store(store);
        self
    }

    /// Use the hosted REST store.
    pub fn rest_store(mut self, base_url: &str, api_key: &str) -> Self {
        self.inner = self.inner.rest_store(base_url, api_key);
        self
    }

    /// Build the async shelf, initializing the cache off the event loop.
    pub async fn build(self) -> Result<AsyncRingshelf> {
        let inner = self.inner;
        tokio::task::spawn_blocking(move || {
            let shelf = inner.build()?;
            Ok(AsyncRingshelf {
                inner: Arc::new(Mutex::new(shelf)),
            })
        })
        .await
        .map_err(|e| RingshelfError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncRingshelf
// ---------------------------------------------------------------------------

/// Async wrapper around [`Ringshelf`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`]. The underlying [`Ringshelf`] is
/// protected by a [`Mutex`] since its card client uses `RefCell` internally.
pub struct AsyncRingshelf {
    inner: Arc<Mutex<Ringshelf>>,
}

impl AsyncRingshelf {
    /// Create a new builder for configuring the async shelf.
    pub fn builder() -> AsyncRingshelfBuilder {
        AsyncRingshelfBuilder::default()
    }

    /// Run a sync shelf operation on the blocking thread pool.
    ///
    /// The closure receives an `&Ringshelf` reference and should return a
    /// `Result<T>`. The operation runs on a dedicated blocking thread,
    /// keeping the async event loop free.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Ringshelf) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let shelf = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = shelf
                .lock()
                .map_err(|_| RingshelfError::InvalidArgument("shelf lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| RingshelfError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Clear the on-disk card-API cache.
    pub async fn clear_cache(&self) -> Result<()> {
        self.run(|s| s.clear_cache()).await
    }

    /// Close the shelf, releasing all resources.
    ///
    /// After calling this, subsequent operations will fail with a poisoned
    /// lock error.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            let shelf = self
                .inner
                .lock()
                .map_err(|_| RingshelfError::InvalidArgument("shelf lock poisoned".into()))?;
            // Dropping the MutexGuard drops the shelf
            drop(shelf);
            Ok(())
        })
        .await
        .map_err(|e| RingshelfError::InvalidArgument(format!("Task join error: {e}")))?
    }
}
