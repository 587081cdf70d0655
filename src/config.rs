use std::path::PathBuf;
use std::time::Duration;

pub const API_BASE: &str = "https://ringsdb.com/api/public";
pub const PACKS_URL: &str = "https://ringsdb.com/api/public/packs/";

/// Packs a fresh household collection starts with enabled.
pub const DEFAULT_ENABLED_PACKS: &[&str] =
    &["Core", "DoG", "DoD", "EoL", "RoR", "TBR", "TRD"];

/// Card type codes that belong to the player card pool. Everything else
/// (encounter cards, quests) is filtered out of deckbuilding views.
pub const PLAYER_TYPE_CODES: &[&str] = &[
    "hero",
    "ally",
    "attachment",
    "event",
    "player-side-quest",
    "contract",
    "treasure",
];

/// Bucket order for deck-list text export. Heroes are emitted separately;
/// cards with no or unrecognized type metadata land in the trailing bucket.
pub const EXPORT_TYPE_ORDER: &[&str] = &[
    "ally",
    "attachment",
    "event",
    "player-side-quest",
    "contract",
    "treasure",
    "other",
];

pub const MAX_HEROES: usize = 3;

pub const SESSION_COOKIE: &str = "family_session";
pub const SESSION_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 30;

/// Quiet period after the last edit before an autosave fires.
pub const AUTOSAVE_DEBOUNCE: Duration = Duration::from_millis(800);
/// Upper bound on a single save attempt before it is abandoned.
pub const AUTOSAVE_MAX_WAIT: Duration = Duration::from_secs(15);

/// How long a cached card-API response is served before re-fetching.
pub const CACHE_MAX_AGE: Duration = Duration::from_secs(60 * 60 * 24);

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("ringshelf")
    } else {
        PathBuf::from(".ringshelf-cache")
    }
}

/// Cache file name for one pack's card listing.
pub fn pack_cache_file(pack_code: &str) -> String {
    format!("cards-{pack_code}.json")
}

/// Cache file name for a single card lookup.
pub fn card_cache_file(code: &str) -> String {
    format!("card-{code}.json")
}
