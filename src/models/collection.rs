use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Collection rows — household ownership overlay
// ---------------------------------------------------------------------------

/// One pack of the catalog with its household enablement flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackRow {
    pub pack_code: String,
    pub pack_name: String,
    pub enabled: bool,
}

/// Owned copies of one card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedRow {
    pub card_code: String,
    pub owned_qty: u32,
}
