//! Family card-shelf toolkit for a cooperative LCG.
//!
//! Provides a high-level facade over two external collaborators: the public
//! card database API (read-only card and pack data, cached on disk) and the
//! household's hosted relational store (ownership counts, decks, campaign
//! logs). Everything game-data related is fetched live; only the family's
//! overlay is persisted.
//!
//! # Quick start
//!
//! ```no_run
//! use ringshelf::Ringshelf;
//!
//! let shelf = Ringshelf::builder().build().unwrap();
//!
//! // Create a deck and import a pasted list
//! let deck = shelf.decks().create("Leadership pile").unwrap();
//! let text = "Heroes (1):\n1x 01001 Aragorn\n\nALLY (3):\n3x 01012 Gandalf\n";
//! shelf.decks().import_text(&deck.id, text).unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
#[cfg(feature = "async")]
pub mod autosave;
pub mod cache;
pub mod client;
pub mod config;
pub mod decklist;
pub mod error;
pub mod models;
pub mod ops;
pub mod ordering;
pub mod query_builder;
pub mod session;
pub mod store;

#[cfg(feature = "async")]
pub use async_client::AsyncRingshelf;
pub use cache::ApiCache;
pub use client::CardsClient;
pub use error::{Result, RingshelfError};
pub use query_builder::QueryBuilder;
pub use session::SessionSigner;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use store::{MemoryStore, RestStore, Store};

// ---------------------------------------------------------------------------
// RingshelfBuilder
// ---------------------------------------------------------------------------

enum StoreChoice {
    Memory,
    Rest { base_url: String, api_key: String },
    Custom(Box<dyn Store>),
}

/// Builder for configuring and constructing a [`Ringshelf`] instance.
///
/// Use [`Ringshelf::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](RingshelfBuilder::build) to create the
/// shelf.
pub struct RingshelfBuilder {
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    store: StoreChoice,
}

impl Default for RingshelfBuilder {
    fn default() -> Self {
        Self {
            cache_dir: None,
            offline: false,
            timeout: Duration::from_secs(30),
            store: StoreChoice::Memory,
        }
    }
}

impl RingshelfBuilder {
    /// Set a custom cache directory for card-API responses.
    ///
    /// If not set, the platform-appropriate default cache directory is used
    /// (e.g. `~/.cache/ringshelf` on Linux, `~/Library/Caches/ringshelf`
    /// on macOS, `%LOCALAPPDATA%\ringshelf` on Windows).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    ///
    /// When offline, the card client never hits the network and only uses
    /// previously cached responses. Defaults to `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout for card-API and store round trips.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a specific [`Store`] implementation.
    pub fn store(mut self, store: Box<dyn Store>) -> Self {
        self.store = StoreChoice::Custom(store);
        self
    }

    /// Persist to the hosted REST store at `base_url` with `api_key`.
    ///
    /// Without this (or [`store()`](Self::store)), the shelf runs on an
    /// in-process memory store: useful for tests and demos, gone on drop.
    pub fn rest_store(mut self, base_url: &str, api_key: &str) -> Self {
        self.store = StoreChoice::Rest {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        };
        self
    }

    /// Build the shelf, initializing the response cache and store client.
    ///
    /// Does **not** fetch anything eagerly -- card data is downloaded
    /// lazily on first use.
    pub fn build(self) -> Result<Ringshelf> {
        let cache = ApiCache::new(
            self.cache_dir,
            self.offline,
            config::CACHE_MAX_AGE,
            self.timeout,
        )?;
        let cards = CardsClient::new(cache);
        let store: Box<dyn Store> = match self.store {
            StoreChoice::Memory => Box::new(MemoryStore::new()),
            StoreChoice::Rest { base_url, api_key } => {
                Box::new(RestStore::new(&base_url, &api_key, self.timeout)?)
            }
            StoreChoice::Custom(store) => store,
        };
        Ok(Ringshelf { store, cards })
    }
}

// ---------------------------------------------------------------------------
// Ringshelf
// ---------------------------------------------------------------------------

/// The main entry point for the family card shelf.
///
/// Owns the store client and the card-API client, and exposes
/// domain-specific operation interfaces as lightweight borrowing wrappers.
///
/// Created via [`Ringshelf::builder()`].
pub struct Ringshelf {
    store: Box<dyn Store>,
    cards: CardsClient,
}

impl Ringshelf {
    /// Create a new builder for configuring the shelf.
    pub fn builder() -> RingshelfBuilder {
        RingshelfBuilder::default()
    }

    // -- Operation accessors -----------------------------------------------

    /// Access deck operations (CRUD, replace, text import/export).
    pub fn decks(&self) -> ops::DeckOps<'_> {
        ops::DeckOps::new(self.store.as_ref(), &self.cards)
    }

    /// Access campaign operations (scenarios, runs, state, log).
    pub fn campaigns(&self) -> ops::CampaignOps<'_> {
        ops::CampaignOps::new(self.store.as_ref(), &self.cards)
    }

    /// Access collection operations (packs, owned counts, usage).
    pub fn collection(&self) -> ops::CollectionOps<'_> {
        ops::CollectionOps::new(self.store.as_ref(), &self.cards)
    }

    /// Access the card-API client directly.
    pub fn cards(&self) -> &CardsClient {
        &self.cards
    }

    /// Access the underlying [`Store`] for advanced usage.
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    // -- Utility methods ---------------------------------------------------

    /// Remove all cached card-API responses.
    pub fn clear_cache(&self) -> Result<()> {
        self.cards.cache.borrow().clear()
    }

    /// Consume the shelf and release all resources.
    ///
    /// This is called automatically when the shelf is dropped, but can be
    /// invoked explicitly for deterministic cleanup.
    pub fn close(self) {
        drop(self);
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for Ringshelf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.cards.cache.borrow();
        write!(
            f,
            "Ringshelf(cache_dir={}, offline={})",
            cache.cache_dir.display(),
            cache.offline
        )
    }
}
