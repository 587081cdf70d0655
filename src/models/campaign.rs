use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Campaign — the multi-session narrative/scoring container
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub ruleset: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Fields accepted when updating a campaign. `None` leaves a field alone;
/// `description` distinguishes "absent" from "set to null" via the double
/// `Option`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignPatch {
    pub name: Option<String>,
    #[serde(default, with = "double_option")]
    pub description: Option<Option<String>>,
    pub ruleset: Option<String>,
}

impl CampaignPatch {
    /// Render as a partial-update JSON object: absent fields are omitted,
    /// explicit clears become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        if let Some(name) = &self.name {
            obj.insert("name".into(), serde_json::json!(name));
        }
        if let Some(description) = &self.description {
            obj.insert("description".into(), serde_json::json!(description));
        }
        if let Some(ruleset) = &self.ruleset {
            obj.insert("ruleset".into(), serde_json::json!(ruleset));
        }
        serde_json::Value::Object(obj)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.ruleset.is_none()
    }
}

/// Campaign header plus aggregates from the summaries view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub id: String,
    pub name: String,
    pub ruleset: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    /// Named player slots in use.
    pub players: u32,
    /// Distinct decks linked across all logged runs.
    pub decks: u32,
    pub score_total: i64,
}

// ---------------------------------------------------------------------------
// Scenario — one ordered unit within a campaign
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub campaign_id: String,
    pub title: String,
    pub pack_code: Option<String>,
    pub scenario_code: Option<String>,
    pub position: i64,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewScenario {
    pub title: String,
    pub pack_code: Option<String>,
    pub scenario_code: Option<String>,
}

// ---------------------------------------------------------------------------
// Run — one logged play of a scenario
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunResult {
    Win,
    Loss,
    Concede,
}

impl RunResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunResult::Win => "win",
            RunResult::Loss => "loss",
            RunResult::Concede => "concede",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    pub campaign_id: String,
    pub scenario_id: Option<String>,
    pub played_at: Option<String>,
    pub result: RunResult,
    pub score: Option<i64>,
    pub threat_end: Option<i64>,
    pub rounds: Option<i64>,
    pub notes: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRun {
    pub scenario_id: Option<String>,
    pub played_at: Option<String>,
    pub result: RunResult,
    pub score: Option<i64>,
    pub threat_end: Option<i64>,
    pub rounds: Option<i64>,
    pub notes: Option<String>,
    #[serde(default)]
    pub deck_links: Vec<RunDeckLink>,
}

/// A deck that participated in a run, with an optional table role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunDeckLink {
    pub deck_id: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// One deck of the latest run, with its hero codes resolved to names where
/// the card API knows them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunDeckHeroes {
    pub id: String,
    pub name: String,
    pub role: Option<String>,
    pub heroes: Vec<HeroName>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroName {
    pub code: String,
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// CampaignState — one free-form narrative row per campaign
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignState {
    pub campaign_id: String,
    pub player1: Option<String>,
    pub player2: Option<String>,
    pub player3: Option<String>,
    pub player4: Option<String>,
    pub heroes_p1: Option<String>,
    pub heroes_p2: Option<String>,
    pub heroes_p3: Option<String>,
    pub heroes_p4: Option<String>,
    pub fallen_heroes: Option<String>,
    #[serde(default)]
    pub threat_penalty: i64,
    pub notes: Option<String>,
    pub boons: Option<String>,
    pub burdens: Option<String>,
    pub campaign_total_override: Option<i64>,
    pub updated_at: Option<String>,
}

/// Partial update for [`CampaignState`]. Each field uses the double-`Option`
/// convention: outer `None` = leave untouched, inner `None` = clear.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignStatePatch {
    #[serde(default, with = "double_option")]
    pub player1: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub player2: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub player3: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub player4: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub heroes_p1: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub heroes_p2: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub heroes_p3: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub heroes_p4: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub fallen_heroes: Option<Option<String>>,
    pub threat_penalty: Option<i64>,
    #[serde(default, with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub boons: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub burdens: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub campaign_total_override: Option<Option<i64>>,
}

impl CampaignStatePatch {
    /// Apply this patch to a state row in place.
    pub fn apply(&self, state: &mut CampaignState) {
        fn set<T: Clone>(slot: &mut T, patch: &Option<T>) {
            if let Some(v) = patch {
                *slot = v.clone();
            }
        }
        set(&mut state.player1, &self.player1);
        set(&mut state.player2, &self.player2);
        set(&mut state.player3, &self.player3);
        set(&mut state.player4, &self.player4);
        set(&mut state.heroes_p1, &self.heroes_p1);
        set(&mut state.heroes_p2, &self.heroes_p2);
        set(&mut state.heroes_p3, &self.heroes_p3);
        set(&mut state.heroes_p4, &self.heroes_p4);
        set(&mut state.fallen_heroes, &self.fallen_heroes);
        if let Some(v) = self.threat_penalty {
            state.threat_penalty = v;
        }
        set(&mut state.notes, &self.notes);
        set(&mut state.boons, &self.boons);
        set(&mut state.burdens, &self.burdens);
        set(&mut state.campaign_total_override, &self.campaign_total_override);
    }

    /// Render as a partial-update JSON object: absent fields are omitted,
    /// explicit clears become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        fn put<T: serde::Serialize>(
            obj: &mut serde_json::Map<String, serde_json::Value>,
            key: &str,
            field: &Option<T>,
        ) {
            if let Some(v) = field {
                obj.insert(key.to_string(), serde_json::json!(v));
            }
        }
        put(&mut obj, "player1", &self.player1);
        put(&mut obj, "player2", &self.player2);
        put(&mut obj, "player3", &self.player3);
        put(&mut obj, "player4", &self.player4);
        put(&mut obj, "heroes_p1", &self.heroes_p1);
        put(&mut obj, "heroes_p2", &self.heroes_p2);
        put(&mut obj, "heroes_p3", &self.heroes_p3);
        put(&mut obj, "heroes_p4", &self.heroes_p4);
        put(&mut obj, "fallen_heroes", &self.fallen_heroes);
        put(&mut obj, "threat_penalty", &self.threat_penalty);
        put(&mut obj, "notes", &self.notes);
        put(&mut obj, "boons", &self.boons);
        put(&mut obj, "burdens", &self.burdens);
        put(&mut obj, "campaign_total_override", &self.campaign_total_override);
        serde_json::Value::Object(obj)
    }
}

// ---------------------------------------------------------------------------
// LogEntry — append-only campaign event records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub campaign_id: String,
    pub run_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(default)]
    pub meta: serde_json::Value,
}

/// Serde helper for `Option<Option<T>>` fields: a field that is present but
/// `null` deserializes as `Some(None)`, while an absent field stays `None`.
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(de).map(Some)
    }
}
